//! Background file loading.
//!
//! [`FileLoader::spawn_load`] reads and parses a history file in a tokio task
//! and sends a [`LoadOutcome`] through an `mpsc` channel, so the TUI event
//! loop can pick it up with `try_recv` without blocking. Loads are not
//! cancelled or serialized: when several are in flight, the caller applies
//! outcomes in arrival order and the last one to finish wins.

use std::path::PathBuf;

use history_core::error::{HistoryError, Result};
use history_data::loader::{find_history_file, parse_history_json};
use serde_json::Value;
use tokio::sync::mpsc;

// ── Public types ──────────────────────────────────────────────────────────────

/// A parsed history file.
#[derive(Debug, Clone)]
pub struct LoadedFile {
    /// The file actually read (resolved from a Takeout directory if needed).
    pub path: PathBuf,
    /// Raw elements of the top-level JSON array.
    pub records: Vec<Value>,
}

/// Result of one background load, forwarded to the UI layer.
#[derive(Debug)]
pub struct LoadOutcome {
    /// Sequence number returned by [`FileLoader::spawn_load`].
    pub request_id: u64,
    /// Path as the user supplied it.
    pub requested: PathBuf,
    pub result: Result<LoadedFile>,
}

// ── FileLoader ────────────────────────────────────────────────────────────────

/// Spawns file loads and owns the sending side of the outcome channel.
pub struct FileLoader {
    tx: mpsc::Sender<LoadOutcome>,
    next_request: u64,
}

impl FileLoader {
    /// Create a loader and the receiver its outcomes arrive on.
    pub fn channel() -> (Self, mpsc::Receiver<LoadOutcome>) {
        let (tx, rx) = mpsc::channel(8);
        (
            Self {
                tx,
                next_request: 0,
            },
            rx,
        )
    }

    /// Start reading `path` in a tokio task.
    ///
    /// Must be called from within a tokio runtime. Returns the request id the
    /// outcome will carry.
    pub fn spawn_load(&mut self, path: PathBuf) -> u64 {
        self.next_request += 1;
        let request_id = self.next_request;
        let tx = self.tx.clone();

        tracing::debug!(request_id, path = %path.display(), "spawning history load");

        tokio::spawn(async move {
            let result = read_history(path.clone()).await;
            let outcome = LoadOutcome {
                request_id,
                requested: path,
                result,
            };
            if let Err(e) = tx.send(outcome).await {
                tracing::warn!(error = %e, "failed to deliver load outcome; receiver dropped");
            }
        });

        request_id
    }
}

// ── Private helpers ───────────────────────────────────────────────────────────

/// Resolve, read and parse one history file.
async fn read_history(path: PathBuf) -> Result<LoadedFile> {
    // Directory walks are blocking I/O.
    let resolved = tokio::task::spawn_blocking(move || find_history_file(&path))
        .await
        .map_err(|e| HistoryError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))??;

    let text = tokio::fs::read_to_string(&resolved)
        .await
        .map_err(|source| HistoryError::FileRead {
            path: resolved.clone(),
            source,
        })?;
    let records = parse_history_json(&text)?;

    tracing::info!(
        "Read {} raw records from {}",
        records.len(),
        resolved.display()
    );

    Ok(LoadedFile {
        path: resolved,
        records,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    async fn recv(rx: &mut mpsc::Receiver<LoadOutcome>) -> LoadOutcome {
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for load outcome")
            .expect("channel closed before receiving outcome")
    }

    // ── successful loads ──────────────────────────────────────────────────

    #[tokio::test]
    async fn test_load_file_sends_records() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("watch-history.json");
        std::fs::write(
            &path,
            r#"[{"title":"Watched a","time":"2024-01-01T00:00:00Z"},{"title":"Watched b"}]"#,
        )
        .unwrap();

        let (mut loader, mut rx) = FileLoader::channel();
        assert_eq!(loader.spawn_load(path.clone()), 1);

        let outcome = recv(&mut rx).await;
        assert_eq!(outcome.request_id, 1);
        assert_eq!(outcome.requested, path);
        let loaded = outcome.result.unwrap();
        assert_eq!(loaded.path, path);
        assert_eq!(loaded.records.len(), 2);
    }

    #[tokio::test]
    async fn test_load_directory_resolves_takeout_file() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("Takeout/YouTube/history");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("watch-history.json"), "[]").unwrap();

        let (mut loader, mut rx) = FileLoader::channel();
        loader.spawn_load(dir.path().to_path_buf());

        let loaded = recv(&mut rx).await.result.unwrap();
        assert_eq!(loaded.path, nested.join("watch-history.json"));
        assert!(loaded.records.is_empty());
    }

    // ── failures ──────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_load_invalid_json_reports_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();

        let (mut loader, mut rx) = FileLoader::channel();
        loader.spawn_load(path);

        let err = recv(&mut rx).await.result.unwrap_err();
        assert!(matches!(err, HistoryError::JsonParse(_)));
    }

    #[tokio::test]
    async fn test_load_missing_path_reports_error() {
        let dir = TempDir::new().unwrap();
        let (mut loader, mut rx) = FileLoader::channel();
        loader.spawn_load(dir.path().join("nope.json"));

        let err = recv(&mut rx).await.result.unwrap_err();
        assert!(matches!(err, HistoryError::FileRead { .. }));
    }

    // ── sequencing ────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_request_ids_increase() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("h.json");
        std::fs::write(&path, "[]").unwrap();

        let (mut loader, mut rx) = FileLoader::channel();
        assert_eq!(loader.spawn_load(path.clone()), 1);
        assert_eq!(loader.spawn_load(path), 2);

        let mut ids = vec![recv(&mut rx).await.request_id, recv(&mut rx).await.request_id];
        ids.sort();
        assert_eq!(ids, vec![1, 2]);
    }
}
