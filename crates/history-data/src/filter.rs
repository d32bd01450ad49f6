//! Year / channel filtering of the session dataset.

use std::collections::BTreeSet;

use history_core::models::WatchEvent;

/// Channel selection of the filter controls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ChannelFilter {
    /// Every channel passes.
    #[default]
    All,
    /// Only events from this exact channel name pass.
    Named(String),
}

impl ChannelFilter {
    fn matches(&self, channel: &str) -> bool {
        match self {
            ChannelFilter::All => true,
            ChannelFilter::Named(name) => name == channel,
        }
    }
}

/// The user's current filter selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Selected years. An empty set means no year filter.
    pub years: BTreeSet<i32>,
    pub channel: ChannelFilter,
}

impl FilterCriteria {
    /// Criteria that select every year present in `events` and all channels,
    /// which is the state right after a file is loaded.
    pub fn select_all(events: &[WatchEvent]) -> Self {
        Self {
            years: available_years(events).into_iter().collect(),
            channel: ChannelFilter::All,
        }
    }

    /// Whether `event` passes both filters.
    pub fn matches(&self, event: &WatchEvent) -> bool {
        let year_match = self.years.is_empty() || self.years.contains(&event.year);
        year_match && self.channel.matches(&event.channel_name)
    }
}

/// Return the events that pass `criteria`, in their original order.
pub fn apply_filters(events: &[WatchEvent], criteria: &FilterCriteria) -> Vec<WatchEvent> {
    events
        .iter()
        .filter(|e| criteria.matches(e))
        .cloned()
        .collect()
}

/// Distinct years present in `events`, ascending.
pub fn available_years(events: &[WatchEvent]) -> Vec<i32> {
    events
        .iter()
        .map(|e| e.year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct channel names present in `events`, sorted by name.
pub fn available_channels(events: &[WatchEvent]) -> Vec<String> {
    events
        .iter()
        .map(|e| e.channel_name.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
