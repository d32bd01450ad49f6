use history_core::formatting::format_count;
use ratatui::{
    layout::Rect,
    text::{Line, Span, Text},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::charts::{BarPalette, ChartHandle, ChartSlot, Orientation};
use crate::themes::Theme;

/// Widest label column of a horizontal chart, in terminal columns.
pub const MAX_LABEL_COLUMNS: usize = 32;

/// Widest column of a vertical chart.
const MAX_COLUMN_WIDTH: u16 = 9;

const FILLED: char = '\u{2588}'; // █  FULL BLOCK

// ── Label helpers ────────────────────────────────────────────────────────────

/// Shorten `label` to at most `width` terminal columns, ending cut labels
/// with `…`. Wide characters (CJK, emoji) count as two columns.
pub fn fit_label(label: &str, width: usize) -> String {
    if label.width() <= width {
        return label.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in label.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

/// [`fit_label`] padded with spaces to exactly `width` columns.
pub fn pad_label(label: &str, width: usize) -> String {
    let fitted = fit_label(label, width);
    let pad = width.saturating_sub(fitted.width());
    format!("{fitted}{}", " ".repeat(pad))
}

/// Column width for `count` vertical bars separated by one-column gaps.
pub fn column_width(inner_width: u16, count: usize) -> u16 {
    if count == 0 {
        return 1;
    }
    let count = u16::try_from(count).unwrap_or(u16::MAX);
    (inner_width.saturating_add(1) / count)
        .saturating_sub(1)
        .clamp(1, MAX_COLUMN_WIDTH)
}

// ── HorizontalBars ───────────────────────────────────────────────────────────

/// Ranked horizontal bar chart rendered as one [`Line`] per bar:
/// padded label, proportional fill, formatted count.
pub struct HorizontalBars<'a> {
    pub handle: &'a ChartHandle,
    pub theme: &'a Theme,
    /// Columns reserved for labels.
    pub label_width: usize,
    /// Columns of the longest bar.
    pub bar_width: usize,
}

impl<'a> HorizontalBars<'a> {
    /// Lay the chart out in `columns` terminal columns.
    pub fn new(handle: &'a ChartHandle, theme: &'a Theme, columns: usize) -> Self {
        let widest = handle
            .bars
            .iter()
            .map(|b| b.label.width())
            .max()
            .unwrap_or(0);
        let value_width = format_count(handle.max_value()).len() + 1;
        let label_width = widest.min(MAX_LABEL_COLUMNS).min(columns / 2);
        let bar_width = columns.saturating_sub(label_width + 1 + value_width).max(1);
        Self {
            handle,
            theme,
            label_width,
            bar_width,
        }
    }

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let max = self.handle.max_value().max(1);
        let style = bar_style(self.handle.slot, self.theme);

        self.handle
            .bars
            .iter()
            .map(|bar| {
                let mut filled = (bar.value as u128 * self.bar_width as u128 / max as u128) as usize;
                if bar.value > 0 {
                    filled = filled.max(1);
                }
                let fill: String = std::iter::repeat_n(FILLED, filled).collect();
                Line::from(vec![
                    Span::styled(pad_label(&bar.label, self.label_width), self.theme.bar_label),
                    Span::raw(" "),
                    Span::styled(fill, style),
                    Span::styled(format!(" {}", format_count(bar.value)), self.theme.bar_value),
                ])
            })
            .collect()
    }
}

// ── Rendering ────────────────────────────────────────────────────────────────

/// Render the chart of `slot` into `area`.
///
/// A missing or empty handle shows an informational message in place of the
/// chart.
pub fn render_chart(
    frame: &mut Frame,
    area: Rect,
    slot: ChartSlot,
    handle: Option<&ChartHandle>,
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.separator)
        .title(Span::styled(format!(" {} ", slot.title()), theme.header));

    let Some(handle) = handle.filter(|h| !h.is_empty()) else {
        let text = Text::from(vec![
            Line::from(""),
            Line::from(Span::styled("No data for the current filters", theme.dim)),
        ]);
        frame.render_widget(Paragraph::new(text).block(block), area);
        return;
    };

    let inner = block.inner(area);
    match slot.orientation() {
        Orientation::Vertical => {
            let bars: Vec<Bar> = handle
                .bars
                .iter()
                .map(|b| {
                    Bar::default()
                        .value(b.value)
                        .label(Line::from(b.label.clone()))
                        .text_value(format_count(b.value))
                })
                .collect();
            let chart = BarChart::default()
                .block(block)
                .data(BarGroup::default().bars(&bars))
                .bar_width(column_width(inner.width, bars.len()))
                .bar_gap(1)
                .bar_style(bar_style(slot, theme))
                .value_style(theme.bar_value)
                .label_style(theme.bar_label);
            frame.render_widget(chart, area);
        }
        Orientation::Horizontal => {
            let lines = HorizontalBars::new(handle, theme, inner.width as usize).to_lines();
            frame.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
        }
    }
}

fn bar_style(slot: ChartSlot, theme: &Theme) -> ratatui::style::Style {
    match slot.palette() {
        BarPalette::Primary => theme.bar_primary,
        BarPalette::Secondary => theme.bar_secondary,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
