use history_core::formatting::{format_count, format_days, format_short_date};
use history_data::aggregator::{OverviewMetrics, RewatchSummary};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::themes::Theme;

/// One labelled number on a metrics row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricCard {
    pub label: &'static str,
    pub value: String,
}

impl MetricCard {
    pub fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }
}

/// Cards of the overview tab.
pub fn overview_cards(metrics: &OverviewMetrics) -> Vec<MetricCard> {
    vec![
        MetricCard::new("Total Videos", format_count(metrics.total_videos)),
        MetricCard::new("Unique Channels", format_count(metrics.unique_channels)),
        MetricCard::new(
            "First Watched",
            metrics
                .first_watched
                .map(format_short_date)
                .unwrap_or_else(|| "N/A".to_string()),
        ),
        MetricCard::new("Longest Streak", format_days(metrics.longest_streak)),
    ]
}

/// Cards of the rewatch tab.
pub fn rewatch_cards(summary: &RewatchSummary) -> Vec<MetricCard> {
    vec![
        MetricCard::new(
            "Total Rewatched Videos",
            format_count(summary.rewatched_videos),
        ),
        MetricCard::new("Most Rewatched", format!("{}x", summary.most_rewatched)),
        MetricCard::new(
            "Total Rewatch Count",
            format_count(summary.total_rewatch_count),
        ),
    ]
}

/// Render `cards` side by side, each in its own bordered box.
pub fn render_cards(frame: &mut Frame, area: Rect, cards: &[MetricCard], theme: &Theme) {
    if cards.is_empty() {
        return;
    }
    let constraints = vec![Constraint::Ratio(1, cards.len() as u32); cards.len()];
    let columns = Layout::horizontal(constraints).split(area);

    for (card, column) in cards.iter().zip(columns.iter()) {
        let text = Text::from(vec![
            Line::from(Span::styled(card.label, theme.label)),
            Line::from(Span::styled(card.value.clone(), theme.card_value)),
        ]);
        let widget = Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.card_border),
        );
        frame.render_widget(widget, *column);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
