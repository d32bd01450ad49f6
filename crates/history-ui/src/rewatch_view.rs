//! Rewatch detail table for the dashboard.
//!
//! Renders a bordered [`ratatui::widgets::Table`] with one row per rewatch
//! group, using the same values that the CSV export writes.

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use history_core::formatting::format_count;
use history_data::aggregator::RewatchGroup;
use history_data::export::{RewatchRow, EXPORT_HEADER};

use crate::themes::Theme;

/// Message shown when no video meets the threshold.
pub const NO_REWATCHES: &str = "No videos found with the selected minimum watch count.";

/// Rows of the rewatch table, in rank order.
pub fn table_rows(groups: &[RewatchGroup]) -> Vec<RewatchRow> {
    groups.iter().map(RewatchRow::from).collect()
}

/// Render the rewatch table into `area`, skipping the first `scroll` rows.
pub fn render_rewatch_table(
    frame: &mut Frame,
    area: Rect,
    groups: &[RewatchGroup],
    scroll: usize,
    theme: &Theme,
) {
    if groups.is_empty() {
        render_no_rewatches(frame, area, theme);
        return;
    }

    let header_cells = EXPORT_HEADER
        .iter()
        .map(|h| Cell::from(*h).style(theme.table_header));
    let header = Row::new(header_cells).height(1);

    let scroll = scroll.min(groups.len().saturating_sub(1));
    let data_rows: Vec<Row> = table_rows(groups)
        .into_iter()
        .enumerate()
        .skip(scroll)
        .map(|(i, row)| {
            let style = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            Row::new(vec![
                Cell::from(row.title),
                Cell::from(row.channel),
                Cell::from(format_count(row.watch_count)),
                Cell::from(row.first_watched),
                Cell::from(row.last_watched),
                Cell::from(format_count(row.days_span)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Min(24),
        Constraint::Length(22),
        Constraint::Length(12),
        Constraint::Length(14),
        Constraint::Length(14),
        Constraint::Length(10),
    ];

    // Two border rows and the header row.
    let visible = usize::from(area.height.saturating_sub(3)).max(1);
    let last = (scroll + visible).min(groups.len());
    let title = format!(
        " Rewatched Videos ({}-{} of {}) ",
        scroll + 1,
        last,
        groups.len()
    );

    let table = Table::new(data_rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(title),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

/// Render the informational message shown when no group meets the threshold.
pub fn render_no_rewatches(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(NO_REWATCHES, theme.info)),
        Line::from(""),
        Line::from(Span::styled(
            "Lower the threshold with '-' to include more videos.",
            theme.dim,
        )),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(" Rewatched Videos "),
        ),
        area,
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────
