use chrono::{DateTime, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// Channel name used when a record carries no `subtitles` attribution.
pub const UNKNOWN_CHANNEL: &str = "[Unknown]";

/// Weekdays in display order (Monday first).
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Full English weekday name, e.g. `"Monday"`.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Channel attribution entry inside a raw record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSubtitle {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// One object of the exported history array, before validation.
///
/// Every field is optional here; presence checks happen in the normalizer.
/// Unknown keys (`header`, `products`, ...) are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawWatchRecord {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub title_url: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub subtitles: Option<Vec<RawSubtitle>>,
}

/// One normalized playback record.
///
/// The derived calendar fields are computed in the session's display
/// timezone when the event is built and never change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchEvent {
    /// Video title with the "Watched " prefix and watch-URL fragments removed.
    pub title: String,
    /// Link to the video, when the export has one.
    pub title_url: Option<String>,
    /// Channel name, or [`UNKNOWN_CHANNEL`].
    pub channel_name: String,
    pub channel_url: Option<String>,
    /// Instant of playback.
    pub time: DateTime<Utc>,
    pub year: i32,
    /// Zero-based month index (January = 0).
    pub month: u32,
    pub weekday: Weekday,
    /// Hour of day, 0–23.
    pub hour: u32,
    /// Local calendar date of playback.
    pub date: NaiveDate,
}

impl WatchEvent {
    /// Full English weekday name of the event.
    pub fn weekday_name(&self) -> &'static str {
        weekday_name(self.weekday)
    }
}

/// Why a raw record was left out of the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    /// The array element is not a JSON object.
    NotAnObject,
    /// An object whose known fields have the wrong JSON type.
    WrongFieldType,
    MissingTitle,
    MissingTime,
    /// The title was empty once prefixes and URLs were stripped.
    EmptyTitle,
    InvalidTimestamp,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Rejection::NotAnObject => "not an object",
            Rejection::WrongFieldType => "wrong field type",
            Rejection::MissingTitle => "missing title",
            Rejection::MissingTime => "missing time",
            Rejection::EmptyTitle => "empty title",
            Rejection::InvalidTimestamp => "invalid timestamp",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_names_monday_first() {
        let names: Vec<&str> = WEEKDAYS.iter().map(|d| weekday_name(*d)).collect();
        assert_eq!(
            names,
            vec![
                "Monday",
                "Tuesday",
                "Wednesday",
                "Thursday",
                "Friday",
                "Saturday",
                "Sunday"
            ]
        );
    }

    #[test]
    fn test_raw_record_deserializes_export_shape() {
        let raw: RawWatchRecord = serde_json::from_value(serde_json::json!({
            "header": "YouTube",
            "title": "Watched Rust in 100 Seconds",
            "titleUrl": "https://www.youtube.com/watch?v=5C_HPTJg5ek",
            "subtitles": [{"name": "Fireship", "url": "https://www.youtube.com/channel/x"}],
            "time": "2023-04-01T10:00:00.000Z",
            "products": ["YouTube"]
        }))
        .unwrap();

        assert_eq!(raw.title.as_deref(), Some("Watched Rust in 100 Seconds"));
        assert!(raw.title_url.as_deref().unwrap().contains("5C_HPTJg5ek"));
        assert_eq!(raw.time.as_deref(), Some("2023-04-01T10:00:00.000Z"));
        let subs = raw.subtitles.unwrap();
        assert_eq!(subs[0].name.as_deref(), Some("Fireship"));
    }

    #[test]
    fn test_raw_record_missing_fields_default_to_none() {
        let raw: RawWatchRecord = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(raw.title.is_none());
        assert!(raw.time.is_none());
        assert!(raw.subtitles.is_none());
    }

    #[test]
    fn test_rejection_display() {
        assert_eq!(Rejection::InvalidTimestamp.to_string(), "invalid timestamp");
        assert_eq!(Rejection::MissingTitle.to_string(), "missing title");
        assert_eq!(Rejection::WrongFieldType.to_string(), "wrong field type");
    }
}
