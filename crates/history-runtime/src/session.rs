//! Session context for one loaded watch history.
//!
//! A [`Session`] owns the full normalized dataset, the current filter
//! selection, the rewatch threshold and the dashboard computed from them.
//! Every mutation re-runs the filter and the aggregations, so
//! [`Session::dashboard`] always reflects the current controls.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use history_core::models::WatchEvent;
use history_core::settings::{MIN_WATCHES_CEILING, MIN_WATCHES_FLOOR};
use history_core::time_utils::TimezoneHandler;
use history_data::dashboard::{build_dashboard, DashboardData};
use history_data::filter::{
    apply_filters, available_channels, available_years, ChannelFilter, FilterCriteria,
};
use history_data::normalizer::normalize;
use serde_json::Value;
use tracing::info;

/// Default rewatch threshold.
pub const DEFAULT_MIN_WATCHES: u32 = 2;

/// Counts reported after a file is applied to the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub accepted: usize,
    pub rejected: usize,
    /// Rejected records grouped by reason.
    pub rejection_counts: BTreeMap<String, usize>,
}

/// All state of one analysis session.
#[derive(Debug, Clone)]
pub struct Session {
    tz: TimezoneHandler,
    source: Option<PathBuf>,
    events: Vec<WatchEvent>,
    years: Vec<i32>,
    channels: Vec<String>,
    criteria: FilterCriteria,
    min_watches: u32,
    filtered: Vec<WatchEvent>,
    dashboard: DashboardData,
    last_load: Option<LoadSummary>,
}

impl Session {
    /// Create an empty session. Out-of-range thresholds are clamped.
    pub fn new(tz: TimezoneHandler, min_watches: u32) -> Self {
        let min_watches = clamp_min_watches(min_watches);
        Self {
            tz,
            source: None,
            events: Vec::new(),
            years: Vec::new(),
            channels: Vec::new(),
            criteria: FilterCriteria::default(),
            min_watches,
            filtered: Vec::new(),
            dashboard: build_dashboard(&[], u64::from(min_watches)),
            last_load: None,
        }
    }

    // ── Loading ───────────────────────────────────────────────────────────

    /// Replace the dataset with the normalized form of `records`.
    ///
    /// Filters reset to every year and all channels. The threshold is kept.
    pub fn apply_load(&mut self, source: PathBuf, records: &[Value]) -> LoadSummary {
        let outcome = normalize(records, &self.tz);
        let summary = LoadSummary {
            accepted: outcome.events.len(),
            rejected: outcome.rejected.len(),
            rejection_counts: outcome.rejection_counts(),
        };

        info!(
            "Session loaded {} events from {} ({} dropped)",
            summary.accepted,
            source.display(),
            summary.rejected
        );

        self.events = outcome.events;
        self.years = available_years(&self.events);
        self.channels = available_channels(&self.events);
        self.criteria = FilterCriteria::select_all(&self.events);
        self.source = Some(source);
        self.last_load = Some(summary.clone());
        self.refresh();

        summary
    }

    /// `true` once a file has been applied.
    pub fn is_loaded(&self) -> bool {
        self.source.is_some()
    }

    // ── Filters ───────────────────────────────────────────────────────────

    /// Select exactly `years`. Years not present in the data are ignored.
    pub fn set_years<I: IntoIterator<Item = i32>>(&mut self, years: I) {
        self.criteria.years = years
            .into_iter()
            .filter(|y| self.years.contains(y))
            .collect();
        self.refresh();
    }

    /// Flip the selection of `year`. Returns whether it is now selected.
    pub fn toggle_year(&mut self, year: i32) -> bool {
        let selected = if self.criteria.years.remove(&year) {
            false
        } else if self.years.contains(&year) {
            self.criteria.years.insert(year);
            true
        } else {
            false
        };
        self.refresh();
        selected
    }

    /// Set the channel filter.
    pub fn set_channel(&mut self, channel: ChannelFilter) {
        self.criteria.channel = channel;
        self.refresh();
    }

    /// Step the channel filter through `All` and then every channel in name
    /// order, wrapping around. `forward = false` steps backwards.
    pub fn cycle_channel(&mut self, forward: bool) {
        if self.channels.is_empty() {
            return;
        }
        // Position 0 is `All`, channel i sits at i + 1.
        let slots = self.channels.len() + 1;
        let current = match &self.criteria.channel {
            ChannelFilter::All => 0,
            ChannelFilter::Named(name) => self
                .channels
                .iter()
                .position(|c| c == name)
                .map(|i| i + 1)
                .unwrap_or(0),
        };
        let next = if forward {
            (current + 1) % slots
        } else {
            (current + slots - 1) % slots
        };
        self.criteria.channel = match next {
            0 => ChannelFilter::All,
            i => ChannelFilter::Named(self.channels[i - 1].clone()),
        };
        self.refresh();
    }

    // ── Threshold ─────────────────────────────────────────────────────────

    /// Set the rewatch threshold, clamped to the allowed range.
    pub fn set_min_watches(&mut self, min_watches: u32) {
        let clamped = clamp_min_watches(min_watches);
        if clamped != self.min_watches {
            self.min_watches = clamped;
            self.refresh();
        }
    }

    /// Move the threshold by `delta`, clamped to the allowed range.
    pub fn adjust_min_watches(&mut self, delta: i32) {
        let next = (self.min_watches as i64 + delta as i64).max(0) as u32;
        self.set_min_watches(next);
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn timezone(&self) -> &TimezoneHandler {
        &self.tz
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// The full dataset, sorted ascending by time.
    pub fn events(&self) -> &[WatchEvent] {
        &self.events
    }

    /// Events passing the current filters.
    pub fn filtered(&self) -> &[WatchEvent] {
        &self.filtered
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Years present in the dataset, ascending.
    pub fn available_years(&self) -> &[i32] {
        &self.years
    }

    /// Channels present in the dataset, sorted by name.
    pub fn available_channels(&self) -> &[String] {
        &self.channels
    }

    pub fn min_watches(&self) -> u32 {
        self.min_watches
    }

    pub fn dashboard(&self) -> &DashboardData {
        &self.dashboard
    }

    /// Counts from the most recent [`Session::apply_load`].
    pub fn last_load(&self) -> Option<&LoadSummary> {
        self.last_load.as_ref()
    }

    // ── Private ───────────────────────────────────────────────────────────

    fn refresh(&mut self) {
        self.filtered = apply_filters(&self.events, &self.criteria);
        self.dashboard = build_dashboard(&self.filtered, u64::from(self.min_watches));
    }
}

fn clamp_min_watches(value: u32) -> u32 {
    value.clamp(MIN_WATCHES_FLOOR, MIN_WATCHES_CEILING)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
