mod bootstrap;
mod commands;

use anyhow::{bail, Result};
use history_core::settings::{Preferences, Settings};
use history_core::time_utils::TimezoneHandler;
use history_runtime::session::Session;
use history_ui::app::App;
use history_ui::themes::Theme;

use crate::commands::CliFilters;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load_with_preferences();

    let log_dir = bootstrap::ensure_directories()?;
    let log_file = bootstrap::log_destination(&settings.view, settings.log_file.as_deref(), &log_dir);
    bootstrap::setup_logging(&settings.log_level, log_file.as_deref())?;

    tracing::info!("Watch History v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "View: {}, Theme: {}, Timezone: {}",
        settings.view,
        settings.theme,
        settings.timezone
    );

    let tz = TimezoneHandler::new(&settings.timezone);
    let filters = CliFilters {
        years: &settings.years,
        channel: settings.channel.as_deref(),
        min_watches: settings.min_watches,
    };

    match settings.view.as_str() {
        "dashboard" => {
            let mut theme = Theme::from_name(&settings.theme);
            if let Some(accent) = settings.accent_color.as_deref() {
                theme = theme.with_accent(accent);
            }

            let app = App::new(
                theme,
                Session::new(tz, settings.min_watches),
                settings.export_dir.clone(),
            )
            .with_preferences_path(Preferences::config_path())
            .with_initial_filters(settings.years.clone(), settings.channel.clone());

            // Raw mode turns Ctrl+C into a key event; the loop quits on it and
            // restores the terminal before returning.
            app.run(settings.file.clone()).await?;
        }

        "summary" => {
            let Some(path) = settings.file.as_deref() else {
                bail!("the summary view needs a watch-history.json file or Takeout directory");
            };
            let session = commands::load_session(path, tz, &filters)?;
            for line in commands::summary_lines(&session) {
                println!("{line}");
            }
        }

        "export" => {
            let Some(path) = settings.file.as_deref() else {
                bail!("the export view needs a watch-history.json file or Takeout directory");
            };
            let session = commands::load_session(path, tz, &filters)?;
            let written = commands::export(&session, &settings.export_dir)?;
            println!(
                "Exported {} rewatched videos to {}",
                session.dashboard().rewatches.len(),
                written.display()
            );
        }

        unknown => {
            eprintln!("Unknown view mode: {}", unknown);
        }
    }

    Ok(())
}
