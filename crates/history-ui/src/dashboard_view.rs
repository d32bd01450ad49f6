//! Dashboard screen: header, filter controls, the active tab and key help.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use history_data::filter::ChannelFilter;
use history_runtime::session::Session;

use crate::charts::{ChartRegistry, ChartSlot};
use crate::components::bar_chart::{fit_label, render_chart};
use crate::components::header::Header;
use crate::components::metrics::{overview_cards, render_cards, rewatch_cards};
use crate::rewatch_view::render_rewatch_table;
use crate::themes::Theme;

// ── Tab ───────────────────────────────────────────────────────────────────────

/// Dashboard sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Overview,
    Channels,
    Rewatches,
    Keywords,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Overview, Tab::Channels, Tab::Rewatches, Tab::Keywords];
    pub const TITLES: [&'static str; 4] = ["Overview", "Channels", "Rewatches", "Keywords"];

    pub fn index(self) -> usize {
        match self {
            Tab::Overview => 0,
            Tab::Channels => 1,
            Tab::Rewatches => 2,
            Tab::Keywords => 3,
        }
    }

    /// Tab at `index`, if it exists.
    pub fn from_index(index: usize) -> Option<Tab> {
        Tab::ALL.get(index).copied()
    }

    pub fn next(self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn previous(self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

// ── View model ────────────────────────────────────────────────────────────────

/// Borrowed state needed to draw the dashboard.
pub struct DashboardView<'a> {
    pub session: &'a Session,
    pub charts: &'a ChartRegistry,
    pub tab: Tab,
    /// Index into the session's available years of the highlighted year.
    pub year_cursor: usize,
    pub rewatch_scroll: usize,
    pub status: Option<&'a str>,
    pub theme: &'a Theme,
}

const KEY_HELP: &str = "1-4/Tab switch  ,/. year  space toggle  a all years  n/p channel  \
                        +/- min watches  j/k scroll  e export  o open  t theme  c colour  q quit";

/// Render the whole dashboard screen.
pub fn render_dashboard(frame: &mut Frame, area: Rect, view: &DashboardView) {
    let [header_area, filter_area, body_area, help_area, status_area] = Layout::vertical([
        Constraint::Length(4),
        Constraint::Length(5),
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area);

    let source = view
        .session
        .source()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned());
    let timezone = view.session.timezone().default_tz().name();
    let header = Header::new(
        source.as_deref(),
        timezone,
        &Tab::TITLES,
        view.tab.index(),
        view.theme,
    );
    frame.render_widget(Paragraph::new(Text::from(header.to_lines())), header_area);

    frame.render_widget(
        Paragraph::new(Text::from(filter_lines(view, filter_area.width))).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(view.theme.separator)
                .title(" Filters "),
        ),
        filter_area,
    );

    match view.tab {
        Tab::Overview => render_overview(frame, body_area, view),
        Tab::Channels => chart(frame, body_area, view, ChartSlot::Channels),
        Tab::Rewatches => render_rewatches(frame, body_area, view),
        Tab::Keywords => chart(frame, body_area, view, ChartSlot::Keywords),
    }

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(KEY_HELP, view.theme.dim))),
        help_area,
    );
    if let Some(status) = view.status {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(status.to_string(), view.theme.info))),
            status_area,
        );
    }
}

// ── Filter bar ────────────────────────────────────────────────────────────────

/// Year, channel and threshold controls, one line each.
pub fn filter_lines(view: &DashboardView, width: u16) -> Vec<Line<'static>> {
    let theme = view.theme;
    let criteria = view.session.criteria();

    let mut years = vec![Span::styled("Years:   ", theme.label)];
    for (i, year) in view.session.available_years().iter().enumerate() {
        let mark = if criteria.years.contains(year) { "x" } else { " " };
        let style = if i == view.year_cursor {
            theme.selected
        } else if criteria.years.contains(year) {
            theme.value
        } else {
            theme.dim
        };
        years.push(Span::styled(format!("[{mark}] {year}"), style));
        years.push(Span::raw(" "));
    }
    if criteria.years.is_empty() {
        years.push(Span::styled("(no year selected: showing all)", theme.dim));
    }

    let channel = match &criteria.channel {
        ChannelFilter::All => "All channels".to_string(),
        ChannelFilter::Named(name) => fit_label(name, usize::from(width).saturating_sub(14)),
    };

    vec![
        Line::from(years),
        Line::from(vec![
            Span::styled("Channel: ", theme.label),
            Span::styled(channel, theme.value),
        ]),
        Line::from(vec![
            Span::styled("Min watches: ", theme.label),
            Span::styled(view.session.min_watches().to_string(), theme.value),
            Span::styled(
                format!("   {} videos after filters", view.session.filtered().len()),
                theme.dim,
            ),
        ]),
    ]
}

// ── Tabs ──────────────────────────────────────────────────────────────────────

fn render_overview(frame: &mut Frame, area: Rect, view: &DashboardView) {
    let [cards_area, yearly_area, lower_area] = Layout::vertical([
        Constraint::Length(4),
        Constraint::Percentage(45),
        Constraint::Min(0),
    ])
    .areas(area);
    let [weekday_area, hourly_area] =
        Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
            .areas(lower_area);

    let cards = overview_cards(&view.session.dashboard().overview);
    render_cards(frame, cards_area, &cards, view.theme);
    chart(frame, yearly_area, view, ChartSlot::Yearly);
    chart(frame, weekday_area, view, ChartSlot::Weekday);
    chart(frame, hourly_area, view, ChartSlot::Hourly);
}

fn render_rewatches(frame: &mut Frame, area: Rect, view: &DashboardView) {
    let [cards_area, chart_area, table_area] = Layout::vertical([
        Constraint::Length(4),
        Constraint::Percentage(45),
        Constraint::Min(0),
    ])
    .areas(area);

    let data = view.session.dashboard();
    render_cards(frame, cards_area, &rewatch_cards(&data.rewatch_summary), view.theme);
    chart(frame, chart_area, view, ChartSlot::Rewatch);
    render_rewatch_table(frame, table_area, &data.rewatches, view.rewatch_scroll, view.theme);
}

fn chart(frame: &mut Frame, area: Rect, view: &DashboardView, slot: ChartSlot) {
    render_chart(frame, area, slot, view.charts.get(slot), view.theme);
}

// ── Tests ─────────────────────────────────────────────────────────────────────
