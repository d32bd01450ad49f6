//! Watch-history file discovery and loading.
//!
//! Reads the JSON array exported by Google Takeout and hands the raw
//! elements to the normalizer. Nothing here inspects individual records.

use std::path::{Path, PathBuf};

use history_core::error::{HistoryError, Result};
use serde_json::Value;
use tracing::{debug, info};

/// File name Takeout uses for the YouTube watch history.
pub const HISTORY_FILE_NAME: &str = "watch-history.json";

// ── Public API ────────────────────────────────────────────────────────────────

/// Resolve the history file to load from a user-supplied path.
///
/// A regular file is returned unchanged. A directory (typically an extracted
/// Takeout archive) is searched recursively for [`HISTORY_FILE_NAME`]; the
/// first match in sorted path order wins.
pub fn find_history_file(path: &Path) -> Result<PathBuf> {
    if path.is_file() {
        return Ok(path.to_path_buf());
    }
    if !path.is_dir() {
        return Err(HistoryError::FileRead {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file or directory"),
        });
    }

    let mut candidates: Vec<PathBuf> = walkdir::WalkDir::new(path)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .file_name()
                    .to_str()
                    .map(|name| name.eq_ignore_ascii_case(HISTORY_FILE_NAME))
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    candidates.sort();
    debug!(
        "Found {} history file candidate(s) under {}",
        candidates.len(),
        path.display()
    );

    candidates
        .into_iter()
        .next()
        .ok_or_else(|| HistoryError::NoHistoryFile(path.to_path_buf()))
}

/// Parse the text of a history export into its raw JSON elements.
///
/// The document must be a JSON array; anything else is a schema error.
pub fn parse_history_json(text: &str) -> Result<Vec<Value>> {
    let text = text.trim_start_matches('\u{feff}');
    match serde_json::from_str::<Value>(text)? {
        Value::Array(items) => Ok(items),
        other => Err(HistoryError::Schema(format!(
            "expected a JSON array, found {}",
            json_kind(&other)
        ))),
    }
}

/// Read `path` fully as UTF-8 text and parse it with [`parse_history_json`].
pub fn load_history_file(path: &Path) -> Result<Vec<Value>> {
    let text = std::fs::read_to_string(path).map_err(|source| HistoryError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let items = parse_history_json(&text)?;
    info!("Loaded {} raw records from {}", items.len(), path.display());
    Ok(items)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
