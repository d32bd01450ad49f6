//! Non-interactive views: a printed summary and a one-shot CSV export.

use std::path::{Path, PathBuf};

use history_core::formatting::format_count;
use history_core::time_utils::TimezoneHandler;
use history_data::export::export_rewatches;
use history_data::filter::ChannelFilter;
use history_data::loader::{find_history_file, load_history_file};
use history_runtime::session::Session;
use history_ui::components::metrics::{overview_cards, rewatch_cards};

/// Rows printed per ranking in the summary.
const SUMMARY_ROWS: usize = 10;

/// Command-line filter selection.
#[derive(Debug, Clone, Default)]
pub struct CliFilters<'a> {
    pub years: &'a [i32],
    pub channel: Option<&'a str>,
    pub min_watches: u32,
}

/// Load `path` synchronously into a new session and apply `filters`.
pub fn load_session(
    path: &Path,
    tz: TimezoneHandler,
    filters: &CliFilters,
) -> anyhow::Result<Session> {
    let resolved = find_history_file(path)?;
    let records = load_history_file(&resolved)?;

    let mut session = Session::new(tz, filters.min_watches);
    session.apply_load(resolved, &records);
    if !filters.years.is_empty() {
        session.set_years(filters.years.iter().copied());
    }
    if let Some(channel) = filters.channel {
        session.set_channel(ChannelFilter::Named(channel.to_string()));
    }
    Ok(session)
}

/// Plain-text report of the session's dashboard.
pub fn summary_lines(session: &Session) -> Vec<String> {
    let data = session.dashboard();
    let mut lines = Vec::new();

    if let (Some(source), Some(load)) = (session.source(), session.last_load()) {
        lines.push(format!(
            "{}: {} videos loaded, {} records skipped",
            source.display(),
            format_count(load.accepted as u64),
            format_count(load.rejected as u64)
        ));
        for (reason, count) in &load.rejection_counts {
            lines.push(format!("  skipped ({reason}): {count}"));
        }
    }
    lines.push(format!(
        "Filters: {} of {} videos, min watches {}",
        format_count(session.filtered().len() as u64),
        format_count(session.events().len() as u64),
        session.min_watches()
    ));
    lines.push(String::new());

    for card in overview_cards(&data.overview)
        .into_iter()
        .chain(rewatch_cards(&data.rewatch_summary))
    {
        lines.push(format!("{:<24}{}", format!("{}:", card.label), card.value));
    }

    lines.push(String::new());
    lines.push("Top channels:".to_string());
    for (i, c) in data.top_channels.iter().take(SUMMARY_ROWS).enumerate() {
        lines.push(format!("{:>4}. {} ({})", i + 1, c.channel, format_count(c.count)));
    }

    lines.push(String::new());
    lines.push("Top keywords:".to_string());
    for (i, k) in data.keywords.iter().take(SUMMARY_ROWS).enumerate() {
        lines.push(format!("{:>4}. {} ({})", i + 1, k.word, format_count(k.count)));
    }

    lines.push(String::new());
    lines.push("Most rewatched:".to_string());
    for (i, g) in data.rewatches.iter().take(SUMMARY_ROWS).enumerate() {
        lines.push(format!("{:>4}. {} ({}x)", i + 1, g.title, g.count));
    }

    lines
}

/// Write the session's rewatch list to `dir`.
pub fn export(session: &Session, dir: &Path) -> anyhow::Result<PathBuf> {
    Ok(export_rewatches(dir, &session.dashboard().rewatches)?)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
