//! CSV export of rewatch groups.
//!
//! The file is named [`EXPORT_FILE_NAME`], starts with a fixed header row and
//! quotes every field. Dates are written as `M/D/YYYY` in the display
//! timezone the events were built with.

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use history_core::error::{HistoryError, Result};
use history_core::formatting::format_short_date;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::aggregator::RewatchGroup;

/// File name of the rewatch export.
pub const EXPORT_FILE_NAME: &str = "rewatched_videos.csv";

/// Header row of the rewatch export.
pub const EXPORT_HEADER: [&str; 6] = [
    "Video Title",
    "Channel",
    "Watch Count",
    "First Watched",
    "Last Watched",
    "Days Span",
];

/// One data row of the rewatch export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewatchRow {
    #[serde(rename = "Video Title")]
    pub title: String,
    #[serde(rename = "Channel")]
    pub channel: String,
    #[serde(rename = "Watch Count")]
    pub watch_count: u64,
    #[serde(rename = "First Watched")]
    pub first_watched: String,
    #[serde(rename = "Last Watched")]
    pub last_watched: String,
    #[serde(rename = "Days Span")]
    pub days_span: u64,
}

impl From<&RewatchGroup> for RewatchRow {
    fn from(group: &RewatchGroup) -> Self {
        Self {
            title: group.title.clone(),
            channel: group.channel_name.clone(),
            watch_count: group.count,
            first_watched: format_short_date(group.first_date),
            last_watched: format_short_date(group.last_date),
            days_span: group.day_span,
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Write the header and one row per group, in the given order.
pub fn write_rewatch_csv<W: Write>(out: W, groups: &[RewatchGroup]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(out);

    writer.write_record(EXPORT_HEADER)?;
    for group in groups {
        writer.serialize(RewatchRow::from(group))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write [`EXPORT_FILE_NAME`] into `dir` and return its path.
///
/// An existing export in the same directory is overwritten.
pub fn export_rewatches(dir: &Path, groups: &[RewatchGroup]) -> Result<PathBuf> {
    let path = dir.join(EXPORT_FILE_NAME);
    let export_err = |source: std::io::Error| HistoryError::Export {
        path: path.clone(),
        source,
    };

    std::fs::create_dir_all(dir).map_err(export_err)?;
    let file = File::create(&path).map_err(export_err)?;
    write_rewatch_csv(file, groups)?;

    info!("Exported {} rewatch rows to {}", groups.len(), path.display());
    Ok(path)
}

/// Read a rewatch export back into rows.
///
/// The header must match [`EXPORT_HEADER`] exactly.
pub fn parse_rewatch_csv<R: Read>(input: R) -> Result<Vec<RewatchRow>> {
    let mut reader = csv::Reader::from_reader(input);

    let headers = reader.headers()?.clone();
    if headers.iter().ne(EXPORT_HEADER.iter().copied()) {
        let found: Vec<&str> = headers.iter().collect();
        return Err(HistoryError::Schema(format!(
            "unexpected rewatch export header: {}",
            found.join(",")
        )));
    }

    reader
        .deserialize::<RewatchRow>()
        .map(|row| row.map_err(HistoryError::from))
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::find_rewatches;
    use crate::test_support::event;
    use tempfile::TempDir;

    fn groups() -> Vec<RewatchGroup> {
        let events = vec![
            event("Rust, \"the\" Book", Some("u1"), "Ferris", "2024-01-01T10:00:00Z"),
            event("Rust, \"the\" Book", Some("u1"), "Ferris", "2024-03-04T09:00:00Z"),
            event("Intro", Some("u2"), "Chan", "2024-02-01T00:00:00Z"),
            event("Intro", Some("u2"), "Chan", "2024-02-02T00:00:00Z"),
            event("Intro", Some("u2"), "Chan", "2024-02-03T00:00:00Z"),
        ];
        find_rewatches(&events, 2)
    }

    fn render(groups: &[RewatchGroup]) -> String {
        let mut buf = Vec::new();
        write_rewatch_csv(&mut buf, groups).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_header_only_when_empty() {
        assert_eq!(
            render(&[]),
            "\"Video Title\",\"Channel\",\"Watch Count\",\"First Watched\",\"Last Watched\",\"Days Span\"\n"
        );
    }

    #[test]
    fn test_rows_fully_quoted_in_order() {
        let text = render(&groups());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[1],
            "\"Intro\",\"Chan\",\"3\",\"2/1/2024\",\"2/3/2024\",\"2\""
        );
        assert_eq!(
            lines[2],
            "\"Rust, \"\"the\"\" Book\",\"Ferris\",\"2\",\"1/1/2024\",\"3/4/2024\",\"62\""
        );
    }

    #[test]
    fn test_parse_recovers_every_column() {
        let groups = groups();
        let rows = parse_rewatch_csv(render(&groups).as_bytes()).unwrap();
        let expected: Vec<RewatchRow> = groups.iter().map(RewatchRow::from).collect();
        assert_eq!(rows, expected);
        assert_eq!(rows[1].title, "Rust, \"the\" Book");
    }

    #[test]
    fn test_parse_rejects_foreign_header() {
        let err = parse_rewatch_csv("a,b,c\n1,2,3\n".as_bytes()).unwrap_err();
        assert!(matches!(err, HistoryError::Schema(_)));
    }

    #[test]
    fn test_export_rewatches_writes_named_file() {
        let dir = TempDir::new().unwrap();
        let path = export_rewatches(dir.path(), &groups()).unwrap();
        assert_eq!(path, dir.path().join(EXPORT_FILE_NAME));

        let file = File::open(&path).unwrap();
        let rows = parse_rewatch_csv(file).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_export_rewatches_into_missing_dir() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("out/exports");
        let path = export_rewatches(&nested, &[]).unwrap();
        assert!(path.exists());
    }
}
