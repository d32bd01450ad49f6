use std::str::FromStr;

use ratatui::style::{Color, Modifier, Style};

/// Accent colour used when none is configured (the dashboard's indigo).
pub const DEFAULT_ACCENT: &str = "#667eea";

/// Accent colours offered by the `c` key, in cycling order.
pub const ACCENT_COLORS: [&str; 6] = ["#667eea", "#764ba2", "cyan", "green", "magenta", "yellow"];

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
    Unknown,
}

/// Detect terminal background type from the `COLORFGBG` environment variable.
///
/// The variable has the format `"foreground;background"`.  Background values
/// 0–6 are considered dark; 7–15 are considered light.  If the variable is
/// absent or unparseable, `BackgroundType::Dark` is returned.
pub fn detect_background() -> BackgroundType {
    if let Ok(val) = std::env::var("COLORFGBG") {
        if let Some(bg) = val.split(';').next_back() {
            if let Ok(bg_num) = bg.parse::<u8>() {
                return if bg_num <= 6 {
                    BackgroundType::Dark
                } else {
                    BackgroundType::Light
                };
            }
        }
    }
    BackgroundType::Dark
}

/// Parse an accent colour name or `#rrggbb` string.
pub fn parse_accent(value: &str) -> Option<Color> {
    Color::from_str(value.trim()).ok()
}

/// The accent after `current` in [`ACCENT_COLORS`], wrapping around.
/// Unknown values restart the cycle at the first entry.
pub fn next_accent(current: &str) -> &'static str {
    let position = ACCENT_COLORS
        .iter()
        .position(|c| c.eq_ignore_ascii_case(current.trim()));
    match position {
        Some(i) => ACCENT_COLORS[(i + 1) % ACCENT_COLORS.len()],
        None => ACCENT_COLORS[0],
    }
}

/// Base palette a theme was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeKind {
    Dark,
    Light,
    Classic,
}

impl ThemeKind {
    /// Name persisted in the preferences file.
    pub fn name(self) -> &'static str {
        match self {
            ThemeKind::Dark => "dark",
            ThemeKind::Light => "light",
            ThemeKind::Classic => "classic",
        }
    }
}

/// Complete theme definition carrying all UI styles used by the dashboard
/// components.
#[derive(Debug, Clone)]
pub struct Theme {
    pub kind: ThemeKind,
    /// Accent colour string as configured (name or `#rrggbb`).
    pub accent_name: String,

    // ── Header ───────────────────────────────────────────────────────────────
    pub header: Style,
    pub separator: Style,
    pub tab_active: Style,
    pub tab_inactive: Style,

    // ── Text ─────────────────────────────────────────────────────────────────
    pub text: Style,
    pub dim: Style,
    pub bold: Style,
    pub label: Style,
    pub value: Style,

    // ── Status ───────────────────────────────────────────────────────────────
    pub info: Style,
    pub success: Style,
    pub warning: Style,
    pub error: Style,

    // ── Charts ───────────────────────────────────────────────────────────────
    /// Bars of the yearly, hourly and rewatch charts.
    pub bar_primary: Style,
    /// Bars of the weekday, channel and keyword charts.
    pub bar_secondary: Style,
    pub bar_value: Style,
    pub bar_label: Style,

    // ── Metric cards / selection ─────────────────────────────────────────────
    pub card_border: Style,
    pub card_value: Style,
    pub selected: Style,

    // ── Table ────────────────────────────────────────────────────────────────
    pub table_header: Style,
    pub table_border: Style,
    pub table_row: Style,
    pub table_row_alt: Style,
}

impl Theme {
    // ── Constructors ─────────────────────────────────────────────────────────

    /// Dark-background terminal theme (default).
    pub fn dark() -> Self {
        let accent = accent_color(DEFAULT_ACCENT);
        Self {
            kind: ThemeKind::Dark,
            accent_name: DEFAULT_ACCENT.to_string(),

            header: Style::default().fg(accent).add_modifier(Modifier::BOLD),
            separator: Style::default().fg(Color::DarkGray),
            tab_active: Style::default()
                .fg(Color::Black)
                .bg(accent)
                .add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            bold: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            label: Style::default().fg(Color::Gray),
            value: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Cyan),
            success: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            bar_primary: Style::default().fg(accent),
            bar_secondary: Style::default().fg(Color::Rgb(118, 75, 162)),
            bar_value: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            bar_label: Style::default().fg(Color::Gray),

            card_border: Style::default().fg(accent),
            card_value: Style::default().fg(accent).add_modifier(Modifier::BOLD),
            selected: Style::default().fg(accent).add_modifier(Modifier::REVERSED),

            table_header: Style::default().fg(accent).add_modifier(Modifier::BOLD),
            table_border: Style::default().fg(Color::DarkGray),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
        }
    }

    /// Light-background terminal theme.
    ///
    /// Uses dark colours for text so that content remains legible against a
    /// white/light-grey terminal canvas.
    pub fn light() -> Self {
        let accent = accent_color(DEFAULT_ACCENT);
        Self {
            kind: ThemeKind::Light,
            accent_name: DEFAULT_ACCENT.to_string(),

            header: Style::default().fg(accent).add_modifier(Modifier::BOLD),
            separator: Style::default().fg(Color::Gray),
            tab_active: Style::default()
                .fg(Color::White)
                .bg(accent)
                .add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::Black),
            dim: Style::default().fg(Color::Gray),
            bold: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            label: Style::default().fg(Color::DarkGray),
            value: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Blue),
            success: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Magenta),
            error: Style::default().fg(Color::Red),

            bar_primary: Style::default().fg(accent),
            bar_secondary: Style::default().fg(Color::Rgb(118, 75, 162)),
            bar_value: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            bar_label: Style::default().fg(Color::DarkGray),

            card_border: Style::default().fg(accent),
            card_value: Style::default().fg(accent).add_modifier(Modifier::BOLD),
            selected: Style::default().fg(accent).add_modifier(Modifier::REVERSED),

            table_header: Style::default().fg(accent).add_modifier(Modifier::BOLD),
            table_border: Style::default().fg(Color::Gray),
            table_row: Style::default().fg(Color::Black),
            table_row_alt: Style::default().fg(Color::DarkGray),
        }
    }

    /// Classic terminal theme using only the basic 8-colour ANSI palette.
    ///
    /// No bold modifiers and no RGB accents, for minimal terminal emulators.
    pub fn classic() -> Self {
        Self {
            kind: ThemeKind::Classic,
            accent_name: "cyan".to_string(),

            header: Style::default().fg(Color::Cyan),
            separator: Style::default().fg(Color::DarkGray),
            tab_active: Style::default().fg(Color::Black).bg(Color::Cyan),
            tab_inactive: Style::default().fg(Color::White),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            bold: Style::default().fg(Color::White),
            label: Style::default().fg(Color::Gray),
            value: Style::default().fg(Color::White),

            info: Style::default().fg(Color::Cyan),
            success: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            bar_primary: Style::default().fg(Color::Cyan),
            bar_secondary: Style::default().fg(Color::Magenta),
            bar_value: Style::default().fg(Color::White),
            bar_label: Style::default().fg(Color::Gray),

            card_border: Style::default().fg(Color::Cyan),
            card_value: Style::default().fg(Color::Cyan),
            selected: Style::default().fg(Color::Cyan).add_modifier(Modifier::REVERSED),

            table_header: Style::default().fg(Color::Cyan),
            table_border: Style::default().fg(Color::DarkGray),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
        }
    }

    /// Choose a theme automatically based on the detected terminal background.
    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Construct a theme by name.  Falls back to `auto_detect` for unknown
    /// names (including `"auto"`).
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "dark" => Self::dark(),
            "classic" => Self::classic(),
            _ => Self::auto_detect(),
        }
    }

    // ── Derived themes ───────────────────────────────────────────────────────

    /// Same palette with every accent-coloured style switched to `accent`.
    /// Unparseable colours leave the theme unchanged.
    pub fn with_accent(mut self, accent: &str) -> Self {
        let Some(color) = parse_accent(accent) else {
            tracing::warn!("Ignoring unrecognised accent colour {:?}", accent);
            return self;
        };
        self.accent_name = accent.trim().to_string();
        self.header = self.header.fg(color);
        self.tab_active = self.tab_active.bg(color);
        self.bar_primary = self.bar_primary.fg(color);
        self.card_border = self.card_border.fg(color);
        self.card_value = self.card_value.fg(color);
        self.selected = self.selected.fg(color);
        self.table_header = self.table_header.fg(color);
        self
    }

    /// The dark/light counterpart of this theme, keeping the accent.
    /// Classic toggles to dark.
    pub fn toggled(&self) -> Self {
        let base = match self.kind {
            ThemeKind::Dark => Self::light(),
            ThemeKind::Light | ThemeKind::Classic => Self::dark(),
        };
        base.with_accent(&self.accent_name)
    }

    /// Bar style for chart `index` when charts alternate colours.
    pub fn bar_style(&self, index: usize) -> Style {
        if index % 2 == 0 {
            self.bar_primary
        } else {
            self.bar_secondary
        }
    }
}

fn accent_color(value: &str) -> Color {
    parse_accent(value).unwrap_or(Color::Cyan)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
