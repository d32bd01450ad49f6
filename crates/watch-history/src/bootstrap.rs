use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// File the dashboard logs to when no `--log-file` is given.
pub const DEFAULT_LOG_FILE: &str = "watch-history.log";

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Ensure `~/.watch-history/logs/` exists and return the logs directory.
pub fn ensure_directories() -> anyhow::Result<PathBuf> {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    ensure_directories_in(&home)
}

/// [`ensure_directories`] rooted at `home`.
pub fn ensure_directories_in(home: &Path) -> anyhow::Result<PathBuf> {
    let logs = home.join(".watch-history").join("logs");
    std::fs::create_dir_all(&logs)?;
    Ok(logs)
}

/// Where log output goes.
///
/// An explicit path always wins. The dashboard owns the terminal, so it logs
/// to a file in `log_dir`; the other views log to stderr.
pub fn log_destination(view: &str, explicit: Option<&Path>, log_dir: &Path) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None if view == "dashboard" => Some(log_dir.join(DEFAULT_LOG_FILE)),
        None => None,
    }
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a level name from the command line to an [`EnvFilter`] directive.
/// Unrecognised names pass through unchanged.
pub fn level_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        _ => log_level.to_string(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// With a `log_file` output is appended to that file without ANSI colours,
/// otherwise it goes to stderr. `RUST_LOG` is not consulted; the level comes
/// from `log_level` and falls back to `"info"` if it does not parse.
pub fn setup_logging(log_level: &str, log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_new(level_directive(log_level)).unwrap_or_else(|_| EnvFilter::new("info"));

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let layer = fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()?;
        }
        None => {
            let layer = fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()?;
        }
    }

    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // ── ensure_directories ────────────────────────────────────────────────────

    #[test]
    fn test_ensure_directories_in() {
        let tmp = TempDir::new().expect("tempdir");
        let logs = ensure_directories_in(tmp.path()).expect("should succeed");
        assert_eq!(logs, tmp.path().join(".watch-history").join("logs"));
        assert!(logs.is_dir(), "logs dir must exist");

        // Idempotent.
        ensure_directories_in(tmp.path()).expect("second call should succeed");
    }

    // ── log_destination ───────────────────────────────────────────────────────

    #[test]
    fn test_log_destination_explicit_wins() {
        let explicit = PathBuf::from("/tmp/custom.log");
        assert_eq!(
            log_destination("summary", Some(&explicit), Path::new("/logs")),
            Some(explicit)
        );
    }

    #[test]
    fn test_log_destination_dashboard_uses_file() {
        assert_eq!(
            log_destination("dashboard", None, Path::new("/logs")),
            Some(PathBuf::from("/logs").join(DEFAULT_LOG_FILE))
        );
        assert_eq!(log_destination("export", None, Path::new("/logs")), None);
    }

    // ── level_directive ───────────────────────────────────────────────────────

    #[test]
    fn test_level_directive() {
        assert_eq!(level_directive("DEBUG"), "debug");
        assert_eq!(level_directive("warning"), "warn");
        assert_eq!(level_directive("CRITICAL"), "error");
        assert_eq!(level_directive("trace"), "trace");
    }
}
