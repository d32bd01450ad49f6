//! Conversion of raw export records into [`WatchEvent`]s.
//!
//! Malformed records are dropped rather than reported as errors; every drop
//! is recorded in [`NormalizeOutcome::rejected`] so callers and tests can see
//! what was skipped.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use chrono::{Datelike, Timelike};
use history_core::models::{RawWatchRecord, Rejection, WatchEvent, UNKNOWN_CHANNEL};
use history_core::time_utils::TimezoneHandler;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

/// Watch-URL prefixes that leak into titles of videos that were removed
/// from YouTube. The first is the JSON-escaped spelling kept verbatim.
const WATCH_URL_PREFIXES: [&str; 2] = [
    r"https://www.youtube.com/watch?v\u003d",
    "https://www.youtube.com/watch?v=",
];

/// Result of normalizing one export.
#[derive(Debug, Clone, Default)]
pub struct NormalizeOutcome {
    /// Accepted events, sorted ascending by timestamp.
    pub events: Vec<WatchEvent>,
    /// `(index in the input array, reason)` for every dropped record.
    pub rejected: Vec<(usize, Rejection)>,
}

impl NormalizeOutcome {
    /// Number of input records this outcome accounts for.
    pub fn input_len(&self) -> usize {
        self.events.len() + self.rejected.len()
    }

    /// Drop counts grouped by reason.
    pub fn rejection_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for (_, reason) in &self.rejected {
            *counts.entry(reason.to_string()).or_insert(0) += 1;
        }
        counts
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Normalize raw export elements into a sorted list of [`WatchEvent`]s.
///
/// Derived calendar fields use the timezone of `tz`.
pub fn normalize(records: &[Value], tz: &TimezoneHandler) -> NormalizeOutcome {
    let mut outcome = NormalizeOutcome::default();

    for (index, value) in records.iter().enumerate() {
        let raw: RawWatchRecord = match value {
            Value::Object(_) => match serde_json::from_value(value.clone()) {
                Ok(raw) => raw,
                Err(e) => {
                    debug!("Record {} has unexpected field types: {}", index, e);
                    outcome.rejected.push((index, Rejection::WrongFieldType));
                    continue;
                }
            },
            _ => {
                outcome.rejected.push((index, Rejection::NotAnObject));
                continue;
            }
        };

        match build_event(raw, tz) {
            Ok(event) => outcome.events.push(event),
            Err(reason) => {
                debug!("Dropping record {}: {}", index, reason);
                outcome.rejected.push((index, reason));
            }
        }
    }

    // Stable, so records with identical timestamps keep export order.
    outcome.events.sort_by_key(|e| e.time);

    debug!(
        "Normalized {} events, dropped {}",
        outcome.events.len(),
        outcome.rejected.len()
    );

    outcome
}

/// Validate one raw record and build its [`WatchEvent`].
pub fn build_event(raw: RawWatchRecord, tz: &TimezoneHandler) -> Result<WatchEvent, Rejection> {
    let raw_title = raw
        .title
        .filter(|t| !t.is_empty())
        .ok_or(Rejection::MissingTitle)?;
    let raw_time = raw
        .time
        .filter(|t| !t.is_empty())
        .ok_or(Rejection::MissingTime)?;

    let title = normalize_title(&raw_title);
    if title.trim().is_empty() {
        return Err(Rejection::EmptyTitle);
    }

    let time = tz
        .parse_timestamp(&raw_time)
        .ok_or(Rejection::InvalidTimestamp)?;
    let local = tz.to_local(time);

    let channel = raw
        .subtitles
        .as_ref()
        .and_then(|subs| subs.first())
        .cloned()
        .unwrap_or_default();
    let channel_name = channel
        .name
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| UNKNOWN_CHANNEL.to_string());

    Ok(WatchEvent {
        title,
        title_url: raw.title_url,
        channel_name,
        channel_url: channel.url,
        time,
        year: local.year(),
        month: local.month0(),
        weekday: local.weekday(),
        hour: local.hour(),
        date: local.date_naive(),
    })
}

/// Clean a raw export title.
///
/// Removes a leading case-insensitive `"watched "`, trims, then deletes any
/// embedded watch-URL prefix.
pub fn normalize_title(raw: &str) -> String {
    static WATCHED_PREFIX: OnceLock<Regex> = OnceLock::new();
    let re = WATCHED_PREFIX.get_or_init(|| Regex::new(r"(?i)^watched\s+").expect("regex is valid"));

    let mut title = re.replace(raw, "").trim().to_string();
    for prefix in WATCH_URL_PREFIXES {
        title = title.replace(prefix, "");
    }
    title
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use serde_json::json;

    fn utc() -> TimezoneHandler {
        TimezoneHandler::utc()
    }

    fn record(title: &str, time: &str, channel: Option<&str>) -> Value {
        let mut v = json!({
            "header": "YouTube",
            "title": title,
            "titleUrl": format!("https://www.youtube.com/watch?v={}", title.len()),
            "time": time,
            "products": ["YouTube"],
        });
        if let Some(name) = channel {
            v["subtitles"] = json!([{ "name": name, "url": "https://www.youtube.com/channel/c" }]);
        }
        v
    }

    // ── normalize_title ───────────────────────────────────────────────────────

    #[test]
    fn test_normalize_title_strips_watched_prefix() {
        assert_eq!(normalize_title("Watched Rust in 100 Seconds"), "Rust in 100 Seconds");
        assert_eq!(normalize_title("WATCHED   Loud Title "), "Loud Title");
        assert_eq!(normalize_title("watched\tTabbed"), "Tabbed");
    }

    #[test]
    fn test_normalize_title_keeps_inner_watched() {
        assert_eq!(normalize_title("I Watched Everything"), "I Watched Everything");
    }

    #[test]
    fn test_normalize_title_strips_both_url_variants() {
        assert_eq!(
            normalize_title("Watched https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            "dQw4w9WgXcQ"
        );
        assert_eq!(
            normalize_title(r"Watched https://www.youtube.com/watch?v\u003dabc123"),
            "abc123"
        );
    }

    // ── build_event ───────────────────────────────────────────────────────────

    #[test]
    fn test_build_event_derives_fields() {
        let raw: RawWatchRecord = serde_json::from_value(record(
            "Watched Intro",
            "2024-01-01T14:30:00.000Z",
            Some("Chan"),
        ))
        .unwrap();
        let event = build_event(raw, &utc()).unwrap();

        assert_eq!(event.title, "Intro");
        assert_eq!(event.channel_name, "Chan");
        assert_eq!(event.year, 2024);
        assert_eq!(event.month, 0);
        assert_eq!(event.weekday, Weekday::Mon);
        assert_eq!(event.weekday_name(), "Monday");
        assert_eq!(event.hour, 14);
        assert_eq!(event.date.to_string(), "2024-01-01");
    }

    #[test]
    fn test_build_event_uses_display_timezone() {
        let raw: RawWatchRecord = serde_json::from_value(record(
            "Watched Late Night",
            "2024-01-01T03:00:00Z",
            None,
        ))
        .unwrap();
        let event = build_event(raw, &TimezoneHandler::new("America/Los_Angeles")).unwrap();
        // 03:00 UTC is 19:00 on Dec 31 in Los Angeles.
        assert_eq!(event.year, 2023);
        assert_eq!(event.month, 11);
        assert_eq!(event.hour, 19);
        assert_eq!(event.weekday, Weekday::Sun);
    }

    #[test]
    fn test_build_event_unknown_channel_fallback() {
        let raw: RawWatchRecord =
            serde_json::from_value(record("Watched Gone", "2024-01-01T00:00:00Z", None)).unwrap();
        let event = build_event(raw, &utc()).unwrap();
        assert_eq!(event.channel_name, UNKNOWN_CHANNEL);
        assert!(event.channel_url.is_none());
    }

    #[test]
    fn test_build_event_rejections() {
        let missing_title: RawWatchRecord =
            serde_json::from_value(json!({"time": "2024-01-01T00:00:00Z"})).unwrap();
        assert_eq!(build_event(missing_title, &utc()), Err(Rejection::MissingTitle));

        let empty_title: RawWatchRecord =
            serde_json::from_value(json!({"title": "", "time": "2024-01-01T00:00:00Z"})).unwrap();
        assert_eq!(build_event(empty_title, &utc()), Err(Rejection::MissingTitle));

        let missing_time: RawWatchRecord =
            serde_json::from_value(json!({"title": "Watched x"})).unwrap();
        assert_eq!(build_event(missing_time, &utc()), Err(Rejection::MissingTime));

        let only_prefix: RawWatchRecord = serde_json::from_value(
            json!({"title": "Watched https://www.youtube.com/watch?v=", "time": "2024-01-01T00:00:00Z"}),
        )
        .unwrap();
        assert_eq!(build_event(only_prefix, &utc()), Err(Rejection::EmptyTitle));

        let bad_time: RawWatchRecord =
            serde_json::from_value(json!({"title": "Watched x", "time": "last tuesday"})).unwrap();
        assert_eq!(build_event(bad_time, &utc()), Err(Rejection::InvalidTimestamp));
    }

    // ── normalize ─────────────────────────────────────────────────────────────

    #[test]
    fn test_normalize_sorts_ascending() {
        let records = vec![
            record("Watched C", "2024-03-01T00:00:00Z", Some("x")),
            record("Watched A", "2024-01-01T00:00:00Z", Some("x")),
            record("Watched B", "2024-02-01T00:00:00Z", Some("x")),
        ];
        let outcome = normalize(&records, &utc());
        let titles: Vec<&str> = outcome.events.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B", "C"]);
        assert!(outcome.events.windows(2).all(|w| w[0].time <= w[1].time));
    }

    #[test]
    fn test_normalize_accounts_for_every_record() {
        let records = vec![
            record("Watched ok", "2024-01-01T00:00:00Z", Some("x")),
            json!({"title": "Watched no time"}),
            json!({"time": "2024-01-01T00:00:00Z"}),
            json!({"title": "Watched bad", "time": "not a date"}),
            json!("just a string"),
            json!({"title": 42, "time": "2024-01-01T00:00:00Z"}),
            record("Watched ok too", "2023-01-01T00:00:00Z", None),
        ];
        let outcome = normalize(&records, &utc());

        assert_eq!(outcome.events.len(), 2);
        assert_eq!(outcome.rejected.len(), 5);
        assert_eq!(outcome.input_len(), records.len());
        assert!(outcome.events.iter().all(|e| !e.title.is_empty()));

        let indices: Vec<usize> = outcome.rejected.iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_rejection_counts_grouped() {
        let records = vec![
            json!({"title": "Watched a"}),
            json!({"title": "Watched b"}),
            json!({"title": "Watched c", "time": "??"}),
        ];
        let counts = normalize(&records, &utc()).rejection_counts();
        assert_eq!(counts.get("missing time"), Some(&2));
        assert_eq!(counts.get("invalid timestamp"), Some(&1));
    }

    #[test]
    fn test_normalize_separates_wrong_types_from_non_objects() {
        let records = vec![
            json!({"title": 42, "time": "2024-01-01T00:00:00Z"}),
            json!({"title": "Watched a", "time": "2024-01-01T00:00:00Z", "subtitles": "Ferris"}),
            json!(["Watched b", "2024-01-01T00:00:00Z"]),
        ];
        let outcome = normalize(&records, &utc());
        assert!(outcome.events.is_empty());
        assert_eq!(
            outcome.rejected,
            vec![
                (0, Rejection::WrongFieldType),
                (1, Rejection::WrongFieldType),
                (2, Rejection::NotAnObject),
            ]
        );
    }

    #[test]
    fn test_normalize_empty_input() {
        let outcome = normalize(&[], &utc());
        assert!(outcome.events.is_empty());
        assert!(outcome.rejected.is_empty());
    }
}
