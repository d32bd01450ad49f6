//! File selection screen.
//!
//! The terminal stands in for a drop zone: the user types a path or drags a
//! file onto the terminal window, which most emulators deliver as a bracketed
//! paste of the quoted or escaped path.

use std::path::PathBuf;

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use history_data::loader::HISTORY_FILE_NAME;

use crate::components::header::Header;
use crate::themes::Theme;

// ── PathPrompt ────────────────────────────────────────────────────────────────

/// Single-line path input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathPrompt {
    input: String,
}

impl PathPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn insert_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    pub fn clear(&mut self) {
        self.input.clear();
    }

    /// Replace the input with a pasted or dropped path.
    ///
    /// Surrounding whitespace and quotes, a `file://` prefix and shell
    /// escaping of spaces are removed.
    pub fn paste(&mut self, text: &str) {
        self.input = clean_dropped_path(text);
    }

    /// Take the entered path, leaving the prompt empty. Blank input yields
    /// `None`.
    pub fn take_path(&mut self) -> Option<PathBuf> {
        let cleaned = clean_dropped_path(&self.input);
        self.input.clear();
        if cleaned.is_empty() {
            None
        } else {
            Some(PathBuf::from(cleaned))
        }
    }
}

fn clean_dropped_path(text: &str) -> String {
    let mut path = text.trim();
    for quote in ['\'', '"'] {
        if path.len() >= 2 && path.starts_with(quote) && path.ends_with(quote) {
            path = &path[1..path.len() - 1];
        }
    }
    let path = path.strip_prefix("file://").unwrap_or(path);
    path.replace("\\ ", " ")
}

// ── Rendering ─────────────────────────────────────────────────────────────────

/// Render the file selection screen.
pub fn render_upload_view(
    frame: &mut Frame,
    area: Rect,
    prompt: &PathPrompt,
    timezone: &str,
    theme: &Theme,
) {
    let [header_area, body_area] =
        Layout::vertical([Constraint::Length(4), Constraint::Min(0)]).areas(area);

    let header = Header::new(None, timezone, &[], 0, theme);
    frame.render_widget(Paragraph::new(Text::from(header.to_lines())), header_area);

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("Drop your {HISTORY_FILE_NAME} here"),
            theme.bold,
        )),
        Line::from(Span::styled(
            "Drag the file onto this window, or type its path and press Enter.",
            theme.dim,
        )),
        Line::from(Span::styled(
            "A Google Takeout folder works too; the history file is found inside it.",
            theme.dim,
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Path: ", theme.label),
            Span::styled(prompt.input().to_string(), theme.value),
            Span::styled("_", theme.info),
        ]),
        Line::from(""),
        Line::from(Span::styled("Enter load   Esc quit", theme.dim)),
    ];

    frame.render_widget(
        Paragraph::new(Text::from(text))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme.card_border)
                    .title(" Open Watch History "),
            ),
        body_area,
    );
}

/// Draw `message` in a centred box over whatever is already on screen.
pub fn render_error_modal(frame: &mut Frame, area: Rect, message: &str, theme: &Theme) {
    let modal = centered(area, 60, 7);
    let text = vec![
        Line::from(Span::styled(message.to_string(), theme.error)),
        Line::from(""),
        Line::from(Span::styled("Press any key to dismiss", theme.dim)),
    ];
    frame.render_widget(Clear, modal);
    frame.render_widget(
        Paragraph::new(Text::from(text))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme.error)
                    .title(" Error "),
            ),
        modal,
    );
}

/// A `width` x `height` rectangle centred in `area`, shrunk to fit.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
