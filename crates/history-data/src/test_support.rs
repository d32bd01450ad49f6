//! Event builders shared by the unit tests of this crate.

use history_core::models::{RawSubtitle, RawWatchRecord, WatchEvent};
use history_core::time_utils::TimezoneHandler;

use crate::normalizer::build_event;

/// Build a UTC event through the normalizer, as a loaded record would be.
pub(crate) fn event(title: &str, title_url: Option<&str>, channel: &str, time: &str) -> WatchEvent {
    let raw = RawWatchRecord {
        title: Some(format!("Watched {title}")),
        title_url: title_url.map(str::to_string),
        time: Some(time.to_string()),
        subtitles: Some(vec![RawSubtitle {
            name: Some(channel.to_string()),
            url: None,
        }]),
    };
    build_event(raw, &TimezoneHandler::utc()).expect("test event is valid")
}
