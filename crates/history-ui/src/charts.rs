//! Chart registry for the dashboard.
//!
//! Each [`ChartSlot`] holds at most one owned [`ChartHandle`]. Installing a
//! chart into an occupied slot releases the previous handle first, so a
//! slot never shows two generations of data.

use std::collections::BTreeMap;

use history_core::formatting::truncate_label;
use history_core::models::weekday_name;
use history_data::dashboard::DashboardData;

// ── Slots ─────────────────────────────────────────────────────────────────────

/// Fixed chart positions on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChartSlot {
    Yearly,
    Weekday,
    Hourly,
    Channels,
    Rewatch,
    Keywords,
}

impl ChartSlot {
    pub const ALL: [ChartSlot; 6] = [
        ChartSlot::Yearly,
        ChartSlot::Weekday,
        ChartSlot::Hourly,
        ChartSlot::Channels,
        ChartSlot::Rewatch,
        ChartSlot::Keywords,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ChartSlot::Yearly => "Videos per Year",
            ChartSlot::Weekday => "Videos by Day of Week",
            ChartSlot::Hourly => "Videos by Hour of Day",
            ChartSlot::Channels => "Top 30 Channels",
            ChartSlot::Rewatch => "Most Rewatched Videos",
            ChartSlot::Keywords => "Top 30 Title Keywords",
        }
    }

    /// Year, weekday and hour charts are column charts; rankings are
    /// horizontal.
    pub fn orientation(self) -> Orientation {
        match self {
            ChartSlot::Yearly | ChartSlot::Weekday | ChartSlot::Hourly => Orientation::Vertical,
            ChartSlot::Channels | ChartSlot::Rewatch | ChartSlot::Keywords => {
                Orientation::Horizontal
            }
        }
    }

    pub fn palette(self) -> BarPalette {
        match self {
            ChartSlot::Yearly | ChartSlot::Hourly | ChartSlot::Rewatch => BarPalette::Primary,
            ChartSlot::Weekday | ChartSlot::Channels | ChartSlot::Keywords => {
                BarPalette::Secondary
            }
        }
    }

    /// Name of the plotted series.
    pub fn series_label(self) -> &'static str {
        match self {
            ChartSlot::Rewatch => "Times Watched",
            ChartSlot::Keywords => "Frequency",
            _ => "Videos Watched",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarPalette {
    Primary,
    Secondary,
}

// ── Handles ───────────────────────────────────────────────────────────────────

/// One labelled bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartBar {
    pub label: String,
    pub value: u64,
}

impl ChartBar {
    pub fn new(label: impl Into<String>, value: u64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// A built chart owned by the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartHandle {
    /// Unique per registry, increasing with every install.
    pub id: u64,
    pub slot: ChartSlot,
    pub bars: Vec<ChartBar>,
}

impl ChartHandle {
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn max_value(&self) -> u64 {
        self.bars.iter().map(|b| b.value).max().unwrap_or(0)
    }
}

// ── Registry ──────────────────────────────────────────────────────────────────

/// Owner of every chart currently on screen.
#[derive(Debug, Default)]
pub struct ChartRegistry {
    charts: BTreeMap<ChartSlot, ChartHandle>,
    next_id: u64,
    released: u64,
}

impl ChartRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `bars` as the chart of `slot`.
    ///
    /// The previous handle of the slot, if any, is released and returned.
    pub fn install(&mut self, slot: ChartSlot, bars: Vec<ChartBar>) -> Option<ChartHandle> {
        let previous = self.release(slot);
        self.next_id += 1;
        let handle = ChartHandle {
            id: self.next_id,
            slot,
            bars,
        };
        self.charts.insert(slot, handle);
        previous
    }

    /// Remove the chart of `slot`, returning it.
    pub fn release(&mut self, slot: ChartSlot) -> Option<ChartHandle> {
        let previous = self.charts.remove(&slot);
        if let Some(ref old) = previous {
            self.released += 1;
            tracing::debug!(?slot, id = old.id, "released chart");
        }
        previous
    }

    /// Rebuild every slot from `data`.
    pub fn rebuild(&mut self, data: &DashboardData) {
        for slot in ChartSlot::ALL {
            self.install(slot, chart_bars(slot, data));
        }
    }

    pub fn get(&self, slot: ChartSlot) -> Option<&ChartHandle> {
        self.charts.get(&slot)
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }

    /// Total handles released since the registry was created.
    pub fn released_count(&self) -> u64 {
        self.released
    }
}

// ── Bar builders ──────────────────────────────────────────────────────────────

/// The bars `slot` shows for `data`.
pub fn chart_bars(slot: ChartSlot, data: &DashboardData) -> Vec<ChartBar> {
    match slot {
        ChartSlot::Yearly => data
            .by_year
            .iter()
            .map(|(year, count)| ChartBar::new(year.to_string(), *count))
            .collect(),
        ChartSlot::Weekday => data
            .by_weekday
            .iter()
            .map(|(day, count)| ChartBar::new(weekday_name(*day), *count))
            .collect(),
        ChartSlot::Hourly => data
            .by_hour
            .iter()
            .enumerate()
            .map(|(hour, count)| ChartBar::new(hour.to_string(), *count))
            .collect(),
        ChartSlot::Channels => data
            .top_channels
            .iter()
            .map(|c| ChartBar::new(c.channel.clone(), c.count))
            .collect(),
        ChartSlot::Rewatch => data
            .rewatch_chart()
            .iter()
            .map(|g| ChartBar::new(truncate_label(&g.title), g.count))
            .collect(),
        ChartSlot::Keywords => data
            .keywords
            .iter()
            .map(|k| ChartBar::new(k.word.clone(), k.count))
            .collect(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
