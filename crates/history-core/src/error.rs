use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the watch-history tool.
#[derive(Error, Debug)]
pub enum HistoryError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The history document is not valid JSON.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// The document parsed but does not have the shape of a watch-history export.
    #[error("Not a watch-history export: {0}")]
    Schema(String),

    /// No `watch-history.json` was found under the given directory.
    #[error("No watch-history.json found in {0}")]
    NoHistoryFile(PathBuf),

    /// The CSV export could not be written.
    #[error("Failed to write export {path}: {source}")]
    Export {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A CSV document could not be encoded or decoded.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HistoryError {
    /// Short message suitable for the blocking error dialog.
    pub fn user_message(&self) -> String {
        match self {
            HistoryError::JsonParse(_) | HistoryError::Schema(_) => {
                "Error parsing JSON file. Please make sure it's a valid YouTube history file."
                    .to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Convenience alias used throughout the history crates.
pub type Result<T> = std::result::Result<T, HistoryError>;
