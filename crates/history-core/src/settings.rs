use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Lowest accepted rewatch threshold.
pub const MIN_WATCHES_FLOOR: u32 = 1;
/// Highest accepted rewatch threshold.
pub const MIN_WATCHES_CEILING: u32 = 50;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Explore a YouTube watch-history export in the terminal
#[derive(Parser, Debug, Clone)]
#[command(
    name = "watch-history",
    about = "Explore a YouTube watch-history export in the terminal",
    version
)]
pub struct Settings {
    /// watch-history.json file, or an extracted Takeout directory
    pub file: Option<PathBuf>,

    /// View mode
    #[arg(long, default_value = "dashboard", value_parser = ["dashboard", "summary", "export"])]
    pub view: String,

    /// Timezone used for days, weekdays and hours (auto-detected if not specified)
    #[arg(long, default_value = "auto")]
    pub timezone: String,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Accent colour for charts (name like "magenta" or hex like "#667eea")
    #[arg(long)]
    pub accent_color: Option<String>,

    /// Minimum watch count for a video to count as rewatched
    #[arg(long, default_value = "2", value_parser = clap::value_parser!(u32).range(1..=50))]
    pub min_watches: u32,

    /// Only include these years (repeatable; default: all years)
    #[arg(long = "year")]
    pub years: Vec<i32>,

    /// Only include this channel (default: all channels)
    #[arg(long)]
    pub channel: Option<String>,

    /// Directory that receives rewatched_videos.csv
    #[arg(long, default_value = ".")]
    pub export_dir: PathBuf,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved preferences
    #[arg(long)]
    pub clear: bool,
}

// ── Preferences ────────────────────────────────────────────────────────────────

/// UI preferences persisted to `~/.watch-history/preferences.json`.
///
/// Nothing else is ever written to disk between runs.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Preferences {
    /// `"dark"` or `"light"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    /// Accent colour string.
    #[serde(rename = "themeColor", skip_serializing_if = "Option::is_none")]
    pub theme_color: Option<String>,
}

impl Preferences {
    /// Return the default path to the preferences file.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the preferences path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &std::path::Path) -> PathBuf {
        base_dir.join(".watch-history").join("preferences.json")
    }

    /// Load preferences from an explicit path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load_from(path: &std::path::Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        let mut prefs: Self = serde_json::from_str(&content).unwrap_or_default();
        if !prefs.theme.as_deref().is_some_and(is_persistable_theme) {
            prefs.theme = None;
        }
        prefs
    }

    /// Atomically write preferences to an explicit path.
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        // Write to a temp file then rename for atomicity.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the preferences file at an explicit path if it exists.
    pub fn clear_at(path: &std::path::Path) -> Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// Only the two toggleable themes are remembered between runs.
fn is_persistable_theme(theme: &str) -> bool {
    matches!(theme, "dark" | "light")
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, merge with persisted preferences where no explicit
    /// CLI value was provided, resolve `"auto"` values, and persist the result.
    pub fn load_with_preferences() -> Self {
        Self::load_with_preferences_impl(std::env::args_os().collect(), &Preferences::config_path())
    }

    /// Full implementation – accepts args and an explicit preferences path so
    /// that tests can redirect to a temporary directory.
    pub fn load_with_preferences_impl(
        args: Vec<std::ffi::OsString>,
        prefs_path: &std::path::Path,
    ) -> Self {
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            let _ = Preferences::clear_at(prefs_path);
            return Self::resolve_auto_values(settings);
        }

        let prefs = Preferences::load_from(prefs_path);

        // CLI always wins over persisted values.
        if !is_arg_explicitly_set(&matches, "theme") {
            if let Some(theme) = prefs.theme {
                settings.theme = theme;
            }
        }
        if settings.accent_color.is_none() {
            settings.accent_color = prefs.theme_color;
        }

        settings = Self::resolve_auto_values(settings);

        let _ = Preferences::from(&settings).save_to(prefs_path);

        settings
    }

    /// Resolve `"auto"` sentinel values and apply the `--debug` flag.
    fn resolve_auto_values(mut settings: Settings) -> Settings {
        if settings.timezone == "auto" {
            settings.timezone = crate::time_utils::get_system_timezone();
        }

        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }

        settings
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for Preferences {
    fn from(s: &Settings) -> Self {
        Preferences {
            theme: Some(s.theme.clone()).filter(|t| is_persistable_theme(t)),
            theme_color: s.accent_color.clone(),
        }
    }
}

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
