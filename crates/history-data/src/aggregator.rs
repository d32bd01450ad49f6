//! Stateless aggregations over a (filtered) list of watch events.
//!
//! Every function here is a pure function of its input slice. Rankings with
//! equal counts keep the order in which their keys were first seen in the
//! input, so results are deterministic for a given dataset.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::hash::Hash;
use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, Utc, Weekday};
use history_core::models::{WatchEvent, WEEKDAYS};
use regex::Regex;

/// Length of every ranked list (channels, rewatch chart, keywords).
pub const TOP_N: usize = 30;

/// Function words excluded from keyword frequency.
pub const STOP_WORDS: [&str; 52] = [
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "from", "as", "is", "was", "are", "be", "been", "has", "have", "had", "do", "does", "did",
    "will", "would", "could", "should", "may", "might", "can", "it", "this", "that", "these",
    "those", "i", "you", "he", "she", "we", "they", "what", "which", "who", "when", "where",
    "why", "how",
];

// ── Result types ──────────────────────────────────────────────────────────────

/// Watch count for one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelCount {
    pub channel: String,
    pub count: u64,
}

/// Occurrences of one title keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordCount {
    pub word: String,
    pub count: u64,
}

/// A video watched at least the threshold number of times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewatchGroup {
    pub title: String,
    pub title_url: Option<String>,
    /// Channel of the first event seen for this video.
    pub channel_name: String,
    pub count: u64,
    pub first_watch: DateTime<Utc>,
    pub last_watch: DateTime<Utc>,
    /// Local calendar date of `first_watch`.
    pub first_date: NaiveDate,
    /// Local calendar date of `last_watch`.
    pub last_date: NaiveDate,
    /// Whole days between first and last watch, rounded down.
    pub day_span: u64,
}

/// Headline numbers of the overview tab.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverviewMetrics {
    pub total_videos: u64,
    pub unique_channels: u64,
    /// Local date of the earliest event, `None` when there are no events.
    pub first_watched: Option<NaiveDate>,
    pub longest_streak: u64,
}

/// Headline numbers of the rewatch tab.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewatchSummary {
    /// Number of videos meeting the threshold.
    pub rewatched_videos: u64,
    /// Highest watch count among them.
    pub most_rewatched: u64,
    /// Sum of all their watch counts.
    pub total_rewatch_count: u64,
}

// ── Streak ────────────────────────────────────────────────────────────────────

/// Longest run of consecutive calendar days with at least one event.
///
/// Returns 0 for an empty slice and at least 1 otherwise.
pub fn longest_streak(events: &[WatchEvent]) -> u64 {
    let dates: BTreeSet<NaiveDate> = events.iter().map(|e| e.date).collect();

    let mut longest = 0u64;
    let mut current = 0u64;
    let mut previous: Option<NaiveDate> = None;

    for date in dates {
        current = match previous {
            Some(prev) if (date - prev).num_days() == 1 => current + 1,
            _ => 1,
        };
        longest = longest.max(current);
        previous = Some(date);
    }

    longest
}

// ── Histograms ────────────────────────────────────────────────────────────────

/// Events per year, for the years present, ascending.
pub fn count_by_year(events: &[WatchEvent]) -> Vec<(i32, u64)> {
    let mut counts: BTreeMap<i32, u64> = BTreeMap::new();
    for event in events {
        *counts.entry(event.year).or_insert(0) += 1;
    }
    counts.into_iter().collect()
}

/// Events per weekday, always seven entries starting on Monday.
pub fn count_by_weekday(events: &[WatchEvent]) -> Vec<(Weekday, u64)> {
    let mut counts = [0u64; 7];
    for event in events {
        counts[event.weekday.num_days_from_monday() as usize] += 1;
    }
    WEEKDAYS.iter().copied().zip(counts).collect()
}

/// Events per hour of day, always 24 entries (index = hour).
pub fn count_by_hour(events: &[WatchEvent]) -> [u64; 24] {
    let mut counts = [0u64; 24];
    for event in events {
        if let Some(slot) = counts.get_mut(event.hour as usize) {
            *slot += 1;
        }
    }
    counts
}

// ── Rankings ──────────────────────────────────────────────────────────────────

/// The [`TOP_N`] most-watched channels, highest count first.
pub fn top_channels(events: &[WatchEvent]) -> Vec<ChannelCount> {
    let mut ranked = count_first_seen(events.iter().map(|e| e.channel_name.as_str()));
    rank_descending(&mut ranked);
    ranked
        .into_iter()
        .take(TOP_N)
        .map(|(channel, count)| ChannelCount {
            channel: channel.to_string(),
            count,
        })
        .collect()
}

/// The [`TOP_N`] most frequent title keywords.
///
/// Titles are lower-cased and split into word tokens; tokens of two
/// characters or fewer and [`STOP_WORDS`] are skipped.
pub fn top_keywords(events: &[WatchEvent]) -> Vec<KeywordCount> {
    let words: Vec<String> = events
        .iter()
        .flat_map(|e| keyword_tokens(&e.title))
        .collect();

    let mut ranked = count_first_seen(words.iter().map(String::as_str));
    rank_descending(&mut ranked);
    ranked
        .into_iter()
        .take(TOP_N)
        .map(|(word, count)| KeywordCount {
            word: word.to_string(),
            count,
        })
        .collect()
}

/// Keyword tokens of one title, in order of appearance.
///
/// Words are maximal runs of ASCII letters, digits and `_`; any other
/// character, accented letters included, separates words.
pub fn keyword_tokens(title: &str) -> Vec<String> {
    static WORD: OnceLock<Regex> = OnceLock::new();
    let re = WORD.get_or_init(|| Regex::new(r"[0-9A-Za-z_]+").expect("regex is valid"));

    let lower = title.to_lowercase();
    re.find_iter(&lower)
        .map(|m| m.as_str())
        .filter(|w| w.chars().count() > 2 && !STOP_WORDS.contains(w))
        .map(str::to_string)
        .collect()
}

// ── Rewatches ─────────────────────────────────────────────────────────────────

/// Group events by `(title, title URL)` and keep groups watched at least
/// `min_count` times, most-watched first.
pub fn find_rewatches(events: &[WatchEvent], min_count: u64) -> Vec<RewatchGroup> {
    let mut index: HashMap<(&str, Option<&str>), usize> = HashMap::new();
    let mut groups: Vec<RewatchGroup> = Vec::new();

    for event in events {
        let key = (event.title.as_str(), event.title_url.as_deref());
        match index.get(&key) {
            Some(&i) => {
                let group = &mut groups[i];
                group.count += 1;
                if event.time < group.first_watch {
                    group.first_watch = event.time;
                    group.first_date = event.date;
                }
                if event.time > group.last_watch {
                    group.last_watch = event.time;
                    group.last_date = event.date;
                }
            }
            None => {
                index.insert(key, groups.len());
                groups.push(RewatchGroup {
                    title: event.title.clone(),
                    title_url: event.title_url.clone(),
                    channel_name: event.channel_name.clone(),
                    count: 1,
                    first_watch: event.time,
                    last_watch: event.time,
                    first_date: event.date,
                    last_date: event.date,
                    day_span: 0,
                });
            }
        }
    }

    let mut rewatches: Vec<RewatchGroup> = groups
        .into_iter()
        .filter(|g| g.count >= min_count)
        .map(|mut g| {
            g.day_span = (g.last_watch - g.first_watch).num_days().max(0) as u64;
            g
        })
        .collect();

    rewatches.sort_by(|a, b| b.count.cmp(&a.count));
    rewatches
}

/// The slice of `rewatches` shown in the rewatch chart.
pub fn top_rewatches(rewatches: &[RewatchGroup]) -> &[RewatchGroup] {
    &rewatches[..rewatches.len().min(TOP_N)]
}

/// Headline numbers for a rewatch result.
pub fn rewatch_summary(rewatches: &[RewatchGroup]) -> RewatchSummary {
    RewatchSummary {
        rewatched_videos: rewatches.len() as u64,
        most_rewatched: rewatches.iter().map(|g| g.count).max().unwrap_or(0),
        total_rewatch_count: rewatches.iter().map(|g| g.count).sum(),
    }
}

// ── Overview ──────────────────────────────────────────────────────────────────

/// Headline numbers for the overview tab.
pub fn overview_metrics(events: &[WatchEvent]) -> OverviewMetrics {
    let unique_channels = events
        .iter()
        .map(|e| e.channel_name.as_str())
        .collect::<BTreeSet<_>>()
        .len();

    OverviewMetrics {
        total_videos: events.len() as u64,
        unique_channels: unique_channels as u64,
        first_watched: events.iter().min_by_key(|e| e.time).map(|e| e.date),
        longest_streak: longest_streak(events),
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Count occurrences of each key, listing keys in first-seen order.
fn count_first_seen<K, I>(keys: I) -> Vec<(K, u64)>
where
    K: Eq + Hash + Copy,
    I: IntoIterator<Item = K>,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut counts: Vec<(K, u64)> = Vec::new();
    for key in keys {
        match index.get(&key) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(key, counts.len());
                counts.push((key, 1));
            }
        }
    }
    counts
}

/// Stable descending sort on the count.
fn rank_descending<K>(counts: &mut [(K, u64)]) {
    counts.sort_by(|a, b| b.1.cmp(&a.1));
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::event;

    // ── longest_streak ────────────────────────────────────────────────────────

    #[test]
    fn test_streak_empty_is_zero() {
        assert_eq!(longest_streak(&[]), 0);
    }

    #[test]
    fn test_streak_single_date_is_one() {
        let events = vec![
            event("a", None, "c", "2024-01-05T08:00:00Z"),
            event("b", None, "c", "2024-01-05T20:00:00Z"),
        ];
        assert_eq!(longest_streak(&events), 1);
    }

    #[test]
    fn test_streak_three_of_four_dates() {
        let events = vec![
            event("a", None, "c", "2024-01-10T12:00:00Z"),
            event("b", None, "c", "2024-01-01T12:00:00Z"),
            event("c", None, "c", "2024-01-03T12:00:00Z"),
            event("d", None, "c", "2024-01-02T12:00:00Z"),
        ];
        assert_eq!(longest_streak(&events), 3);
    }

    #[test]
    fn test_streak_crosses_month_and_year() {
        let events = vec![
            event("a", None, "c", "2023-12-30T12:00:00Z"),
            event("b", None, "c", "2023-12-31T12:00:00Z"),
            event("c", None, "c", "2024-01-01T12:00:00Z"),
            event("d", None, "c", "2024-01-02T12:00:00Z"),
        ];
        assert_eq!(longest_streak(&events), 4);
    }

    #[test]
    fn test_streak_later_run_wins() {
        let events = vec![
            event("a", None, "c", "2024-01-01T12:00:00Z"),
            event("b", None, "c", "2024-01-02T12:00:00Z"),
            event("c", None, "c", "2024-02-01T12:00:00Z"),
            event("d", None, "c", "2024-02-02T12:00:00Z"),
            event("e", None, "c", "2024-02-03T12:00:00Z"),
        ];
        assert_eq!(longest_streak(&events), 3);
    }

    // ── histograms ────────────────────────────────────────────────────────────

    #[test]
    fn test_count_by_year_sorted_present_only() {
        let events = vec![
            event("a", None, "c", "2024-01-01T00:00:00Z"),
            event("b", None, "c", "2021-01-01T00:00:00Z"),
            event("c", None, "c", "2024-06-01T00:00:00Z"),
        ];
        assert_eq!(count_by_year(&events), vec![(2021, 1), (2024, 2)]);
    }

    #[test]
    fn test_count_by_weekday_full_and_sums() {
        let events = vec![
            // Monday, Monday, Sunday.
            event("a", None, "c", "2024-01-01T00:00:00Z"),
            event("b", None, "c", "2024-01-08T00:00:00Z"),
            event("c", None, "c", "2024-01-07T00:00:00Z"),
        ];
        let counts = count_by_weekday(&events);
        assert_eq!(counts.len(), 7);
        assert_eq!(counts[0], (Weekday::Mon, 2));
        assert_eq!(counts[6], (Weekday::Sun, 1));
        assert_eq!(counts.iter().map(|(_, c)| c).sum::<u64>(), 3);
    }

    #[test]
    fn test_count_by_weekday_empty_is_zero_filled() {
        let counts = count_by_weekday(&[]);
        assert_eq!(counts.len(), 7);
        assert!(counts.iter().all(|(_, c)| *c == 0));
    }

    #[test]
    fn test_count_by_hour_full_and_sums() {
        let events = vec![
            event("a", None, "c", "2024-01-01T00:30:00Z"),
            event("b", None, "c", "2024-01-01T23:59:00Z"),
            event("c", None, "c", "2024-01-02T23:00:00Z"),
        ];
        let counts = count_by_hour(&events);
        assert_eq!(counts.len(), 24);
        assert_eq!(counts[0], 1);
        assert_eq!(counts[23], 2);
        assert_eq!(counts.iter().sum::<u64>(), events.len() as u64);
    }

    // ── top_channels ──────────────────────────────────────────────────────────

    #[test]
    fn test_top_channels_descending_with_first_seen_ties() {
        let events = vec![
            event("1", None, "Beta", "2024-01-01T00:00:00Z"),
            event("2", None, "Alpha", "2024-01-02T00:00:00Z"),
            event("3", None, "Gamma", "2024-01-03T00:00:00Z"),
            event("4", None, "Gamma", "2024-01-04T00:00:00Z"),
            event("5", None, "Alpha", "2024-01-05T00:00:00Z"),
            event("6", None, "Beta", "2024-01-06T00:00:00Z"),
            event("7", None, "Gamma", "2024-01-07T00:00:00Z"),
        ];
        let ranked = top_channels(&events);
        let names: Vec<&str> = ranked.iter().map(|c| c.channel.as_str()).collect();
        assert_eq!(names, vec!["Gamma", "Beta", "Alpha"]);
        assert_eq!(ranked[0].count, 3);
    }

    #[test]
    fn test_top_channels_truncated_to_thirty() {
        let events: Vec<WatchEvent> = (0..40)
            .map(|i| event("v", None, &format!("chan-{i}"), "2024-01-01T00:00:00Z"))
            .collect();
        assert_eq!(top_channels(&events).len(), TOP_N);
    }

    // ── keywords ──────────────────────────────────────────────────────────────

    #[test]
    fn test_keyword_tokens_quick_brown_fox() {
        assert_eq!(keyword_tokens("The Quick Brown Fox"), vec!["quick", "brown", "fox"]);
    }

    #[test]
    fn test_keyword_tokens_split_on_non_ascii_letters() {
        assert_eq!(keyword_tokens("Café Müller naïve"), vec!["caf", "ller"]);
        assert_eq!(keyword_tokens("日本語 tutorial_01"), vec!["tutorial_01"]);
    }

    #[test]
    fn test_keyword_tokens_drops_short_and_stop_words() {
        assert_eq!(
            keyword_tokens("How to Build an OS in Rust | Part 2"),
            vec!["build", "rust", "part"]
        );
    }

    #[test]
    fn test_top_keywords_counts() {
        let events = vec![event("The Quick Brown Fox", None, "c", "2024-01-01T00:00:00Z")];
        let words = top_keywords(&events);
        assert_eq!(words.len(), 3);
        assert!(words.iter().all(|w| w.count == 1));
        let names: Vec<&str> = words.iter().map(|w| w.word.as_str()).collect();
        assert_eq!(names, vec!["quick", "brown", "fox"]);
    }

    #[test]
    fn test_top_keywords_ranked() {
        let events = vec![
            event("Rust tutorial", None, "c", "2024-01-01T00:00:00Z"),
            event("RUST news", None, "c", "2024-01-02T00:00:00Z"),
            event("Tutorial: rust", None, "c", "2024-01-03T00:00:00Z"),
        ];
        let words = top_keywords(&events);
        assert_eq!(words[0], KeywordCount { word: "rust".to_string(), count: 3 });
        assert_eq!(words[1], KeywordCount { word: "tutorial".to_string(), count: 2 });
        assert_eq!(words[2], KeywordCount { word: "news".to_string(), count: 1 });
    }

    // ── rewatches ─────────────────────────────────────────────────────────────

    #[test]
    fn test_find_rewatches_single_group() {
        let url = Some("https://youtu.be/1");
        let events = vec![
            event("A", url, "Chan", "2024-01-01T10:00:00Z"),
            event("A", url, "Chan", "2024-01-04T09:00:00Z"),
            event("A", url, "Chan", "2024-01-02T10:00:00Z"),
        ];
        let rewatches = find_rewatches(&events, 2);
        assert_eq!(rewatches.len(), 1);
        let group = &rewatches[0];
        assert_eq!(group.count, 3);
        assert_eq!(group.first_watch, events[0].time);
        assert_eq!(group.last_watch, events[1].time);
        // 2 days 23 hours rounds down to 2.
        assert_eq!(group.day_span, 2);
        assert_eq!(group.first_date.to_string(), "2024-01-01");
        assert_eq!(group.last_date.to_string(), "2024-01-04");
        assert_eq!(group.channel_name, "Chan");
    }

    #[test]
    fn test_find_rewatches_key_includes_url() {
        let events = vec![
            event("A", Some("u1"), "c", "2024-01-01T00:00:00Z"),
            event("A", Some("u2"), "c", "2024-01-02T00:00:00Z"),
            event("A", None, "c", "2024-01-03T00:00:00Z"),
        ];
        assert!(find_rewatches(&events, 2).is_empty());
        assert_eq!(find_rewatches(&events, 1).len(), 3);
    }

    #[test]
    fn test_find_rewatches_threshold_and_order() {
        let events = vec![
            event("B", None, "c", "2024-01-01T00:00:00Z"),
            event("A", None, "c", "2024-01-01T01:00:00Z"),
            event("C", None, "c", "2024-01-01T02:00:00Z"),
            event("A", None, "c", "2024-01-02T00:00:00Z"),
            event("B", None, "c", "2024-01-03T00:00:00Z"),
            event("A", None, "c", "2024-01-04T00:00:00Z"),
        ];
        let rewatches = find_rewatches(&events, 2);
        let titles: Vec<&str> = rewatches.iter().map(|g| g.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B"]);

        let summary = rewatch_summary(&rewatches);
        assert_eq!(summary.rewatched_videos, 2);
        assert_eq!(summary.most_rewatched, 3);
        assert_eq!(summary.total_rewatch_count, 5);
    }

    #[test]
    fn test_top_rewatches_caps_chart_rows() {
        let events: Vec<WatchEvent> = (0..35)
            .flat_map(|i| {
                let title = format!("video {i}");
                vec![
                    event(&title, None, "c", "2024-01-01T00:00:00Z"),
                    event(&title, None, "c", "2024-01-02T00:00:00Z"),
                ]
            })
            .collect();
        let rewatches = find_rewatches(&events, 2);
        assert_eq!(rewatches.len(), 35);
        assert_eq!(top_rewatches(&rewatches).len(), TOP_N);
    }

    #[test]
    fn test_rewatch_summary_empty() {
        assert_eq!(rewatch_summary(&[]), RewatchSummary::default());
    }

    // ── overview_metrics ──────────────────────────────────────────────────────

    #[test]
    fn test_overview_metrics() {
        let events = vec![
            event("a", None, "X", "2024-01-01T00:00:00Z"),
            event("b", None, "Y", "2024-01-02T00:00:00Z"),
            event("c", None, "X", "2024-01-05T00:00:00Z"),
        ];
        let metrics = overview_metrics(&events);
        assert_eq!(metrics.total_videos, 3);
        assert_eq!(metrics.unique_channels, 2);
        assert_eq!(metrics.first_watched.unwrap().to_string(), "2024-01-01");
        assert_eq!(metrics.longest_streak, 2);
    }

    #[test]
    fn test_overview_metrics_empty() {
        assert_eq!(overview_metrics(&[]), OverviewMetrics::default());
    }
}
