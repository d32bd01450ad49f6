use crate::themes::Theme;
use ratatui::text::{Line, Span};

/// Title shown at the top of every screen.
pub const TITLE: &str = "YOUTUBE WATCH HISTORY ANALYZER";

/// Marker placed either side of the application title.
pub const MARKER: &str = "▶";

/// Dashboard header rendering four lines:
///
/// 1. Application title between play markers (ALL CAPS).
/// 2. A 60-column `=` separator.
/// 3. Loaded file and timezone in `[ file | timezone ]` format.
/// 4. The tab bar, one span per tab, the active tab highlighted.
pub struct Header<'a> {
    /// File name of the loaded history, `None` before the first load.
    pub source: Option<&'a str>,
    /// IANA timezone the derived fields are computed in.
    pub timezone: &'a str,
    /// Tab titles in display order.
    pub tabs: &'a [&'a str],
    /// Index into `tabs` of the active tab.
    pub active_tab: usize,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(
        source: Option<&'a str>,
        timezone: &'a str,
        tabs: &'a [&'a str],
        active_tab: usize,
        theme: &'a Theme,
    ) -> Self {
        Self {
            source,
            timezone,
            tabs,
            active_tab,
            theme,
        }
    }

    /// Render the header as exactly four lines.
    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let separator = "=".repeat(60);

        vec![
            Line::from(vec![
                Span::styled(MARKER, self.theme.header),
                Span::styled(format!(" {TITLE} "), self.theme.header),
                Span::styled(MARKER, self.theme.header),
            ]),
            Line::from(Span::styled(separator, self.theme.separator)),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(self.source.unwrap_or("no file loaded"), self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(self.timezone.to_lowercase(), self.theme.value),
                Span::styled(" ]", self.theme.label),
            ]),
            self.tab_line(),
        ]
    }

    fn tab_line(&self) -> Line<'a> {
        let mut spans = Vec::with_capacity(self.tabs.len() * 2);
        for (i, tab) in self.tabs.iter().enumerate() {
            let style = if i == self.active_tab {
                self.theme.tab_active
            } else {
                self.theme.tab_inactive
            };
            spans.push(Span::styled(format!(" {}:{} ", i + 1, tab), style));
            spans.push(Span::raw(" "));
        }
        Line::from(spans)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const TABS: [&str; 4] = ["Overview", "Channels", "Rewatches", "Keywords"];

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_header_to_lines_count() {
        let theme = Theme::dark();
        let header = Header::new(None, "UTC", &TABS, 0, &theme);
        assert_eq!(header.to_lines().len(), 4, "header must produce exactly 4 lines");
    }

    #[test]
    fn test_header_title_line_content() {
        let theme = Theme::dark();
        let lines = Header::new(None, "UTC", &TABS, 0, &theme).to_lines();
        let title = text(&lines[0]);
        assert!(title.contains(TITLE), "got: {title}");
        assert!(title.starts_with(MARKER));
    }

    #[test]
    fn test_header_separator_line() {
        let theme = Theme::dark();
        let lines = Header::new(None, "UTC", &TABS, 0, &theme).to_lines();
        let sep = text(&lines[1]);
        assert_eq!(sep.chars().count(), 60);
        assert!(sep.chars().all(|c| c == '='));
    }

    #[test]
    fn test_header_info_line() {
        let theme = Theme::dark();
        let lines =
            Header::new(Some("watch-history.json"), "America/New_York", &TABS, 0, &theme).to_lines();
        let info = text(&lines[2]);
        assert_eq!(info, "[ watch-history.json | america/new_york ]");
        assert_eq!(lines[2].spans.len(), 5);
    }

    #[test]
    fn test_header_info_line_without_file() {
        let theme = Theme::dark();
        let lines = Header::new(None, "UTC", &TABS, 0, &theme).to_lines();
        assert!(text(&lines[2]).contains("no file loaded"));
    }

    #[test]
    fn test_header_tab_line_highlights_active() {
        let theme = Theme::dark();
        let lines = Header::new(None, "UTC", &TABS, 2, &theme).to_lines();
        let tabs = &lines[3];
        assert_eq!(tabs.spans.len(), TABS.len() * 2);
        assert_eq!(tabs.spans[4].content, " 3:Rewatches ");
        assert_eq!(tabs.spans[4].style, theme.tab_active);
        assert_eq!(tabs.spans[0].style, theme.tab_inactive);
    }
}
