//! Dashboard pipeline.
//!
//! Runs every aggregator over one filtered event list and bundles the results
//! into a [`DashboardData`] ready for the UI layer and the export path.

use chrono::Weekday;
use history_core::models::WatchEvent;

use crate::aggregator::{
    count_by_hour, count_by_weekday, count_by_year, find_rewatches, overview_metrics,
    rewatch_summary, top_channels, top_keywords, top_rewatches, ChannelCount, KeywordCount,
    OverviewMetrics, RewatchGroup, RewatchSummary,
};

// ── Public types ──────────────────────────────────────────────────────────────

/// Everything the dashboard displays for one filter state.
#[derive(Debug, Clone)]
pub struct DashboardData {
    pub overview: OverviewMetrics,
    pub by_year: Vec<(i32, u64)>,
    pub by_weekday: Vec<(Weekday, u64)>,
    pub by_hour: [u64; 24],
    pub top_channels: Vec<ChannelCount>,
    /// Every group meeting the threshold. The chart shows only the head,
    /// the table and the CSV export show all of them.
    pub rewatches: Vec<RewatchGroup>,
    pub rewatch_summary: RewatchSummary,
    pub keywords: Vec<KeywordCount>,
}

impl DashboardData {
    /// Rewatch groups shown in the rewatch chart.
    pub fn rewatch_chart(&self) -> &[RewatchGroup] {
        top_rewatches(&self.rewatches)
    }
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run every aggregation over `events` with the given rewatch threshold.
pub fn build_dashboard(events: &[WatchEvent], min_watches: u64) -> DashboardData {
    let start = std::time::Instant::now();

    // ── Overview and histograms ───────────────────────────────────────────────
    let overview = overview_metrics(events);
    let by_year = count_by_year(events);
    let by_weekday = count_by_weekday(events);
    let by_hour = count_by_hour(events);

    // ── Rankings ──────────────────────────────────────────────────────────────
    let channels = top_channels(events);
    let keywords = top_keywords(events);

    // ── Rewatches ─────────────────────────────────────────────────────────────
    let rewatches = find_rewatches(events, min_watches);
    let summary = rewatch_summary(&rewatches);

    tracing::debug!(
        "Dashboard built over {} events in {:.3}s: {} channels, {} rewatches",
        events.len(),
        start.elapsed().as_secs_f64(),
        channels.len(),
        rewatches.len()
    );

    DashboardData {
        overview,
        by_year,
        by_weekday,
        by_hour,
        top_channels: channels,
        rewatches,
        rewatch_summary: summary,
        keywords,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
