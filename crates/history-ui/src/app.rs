//! Main application state and TUI event loop for the watch-history dashboard.
//!
//! [`App`] owns the theme, the analysis [`Session`], the chart registry and
//! the screen state. Key presses and pastes are translated into session
//! mutations; file loads run in the background through a [`FileLoader`] and
//! their outcomes are drained from the channel on every tick.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event::{
        self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent,
        KeyEventKind, KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use tokio::sync::mpsc;
use tracing::{info, warn};

use history_core::settings::Preferences;
use history_data::export::export_rewatches;
use history_data::filter::ChannelFilter;
use history_runtime::loader_task::{FileLoader, LoadOutcome};
use history_runtime::session::Session;

use crate::charts::ChartRegistry;
use crate::dashboard_view::{render_dashboard, DashboardView, Tab};
use crate::themes::{next_accent, Theme, ThemeKind};
use crate::upload_view::{render_error_modal, render_upload_view, PathPrompt};

const PAGE: usize = 10;

// ── Screen / AppAction ────────────────────────────────────────────────────────

/// Which screen the TUI is currently rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// File selection prompt.
    Upload,
    /// Charts and tables for the loaded history.
    Dashboard,
}

/// Work the event loop must do after an input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    None,
    /// Start loading this path in the background.
    Load(PathBuf),
    Quit,
}

/// Filters given on the command line, applied once to the first load.
#[derive(Debug, Clone, Default)]
struct InitialFilters {
    years: Vec<i32>,
    channel: Option<String>,
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the dashboard TUI.
pub struct App {
    /// Active colour theme.
    pub theme: Theme,
    pub session: Session,
    pub charts: ChartRegistry,
    pub screen: Screen,
    pub tab: Tab,
    pub prompt: PathPrompt,
    /// Index into the available years of the highlighted year.
    pub year_cursor: usize,
    /// First visible row of the rewatch table.
    pub rewatch_scroll: usize,
    /// Message shown in a modal until the next key press.
    pub error: Option<String>,
    /// One-line status under the key help.
    pub status: Option<String>,
    /// Directory the rewatch CSV is written to.
    pub export_dir: PathBuf,
    /// Where theme changes are remembered, `None` to not persist them.
    pub preferences_path: Option<PathBuf>,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
    initial_filters: Option<InitialFilters>,
}

impl App {
    pub fn new(theme: Theme, session: Session, export_dir: PathBuf) -> Self {
        Self {
            theme,
            session,
            charts: ChartRegistry::new(),
            screen: Screen::Upload,
            tab: Tab::Overview,
            prompt: PathPrompt::new(),
            year_cursor: 0,
            rewatch_scroll: 0,
            error: None,
            status: None,
            export_dir,
            preferences_path: None,
            should_quit: false,
            initial_filters: None,
        }
    }

    /// Persist theme and accent changes to `path`.
    pub fn with_preferences_path(mut self, path: PathBuf) -> Self {
        self.preferences_path = Some(path);
        self
    }

    /// Apply `years` and `channel` to the first file that loads.
    pub fn with_initial_filters(mut self, years: Vec<i32>, channel: Option<String>) -> Self {
        if !years.is_empty() || channel.is_some() {
            self.initial_filters = Some(InitialFilters { years, channel });
        }
        self
    }

    // ── Public event loop ─────────────────────────────────────────────────────

    /// Run the dashboard TUI, optionally loading `initial` right away.
    ///
    /// Uses `crossterm::event::poll` (synchronous, with a 250 ms timeout) so
    /// that the terminal event loop stays on the current thread while load
    /// outcomes arrive on the async channel via `try_recv`.
    pub async fn run(mut self, initial: Option<PathBuf>) -> io::Result<()> {
        let (mut loader, mut rx) = FileLoader::channel();
        if let Some(path) = initial {
            self.start_load(&mut loader, path);
        }

        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame)) {
                break Err(e);
            }

            match event::poll(tick_rate) {
                Ok(true) => {
                    let action = match event::read() {
                        Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                            self.handle_key(key)
                        }
                        Ok(Event::Paste(text)) => self.handle_paste(&text),
                        Ok(_) => AppAction::None,
                        Err(e) => break Err(e),
                    };
                    match action {
                        AppAction::None => {}
                        AppAction::Load(path) => self.start_load(&mut loader, path),
                        AppAction::Quit => self.should_quit = true,
                    }
                }
                Ok(false) => {}
                Err(e) => break Err(e),
            }

            // Drain finished loads (non-blocking). The loader keeps a sender
            // alive, so the channel never disconnects here.
            loop {
                match rx.try_recv() {
                    Ok(outcome) => self.apply_outcome(outcome),
                    Err(mpsc::error::TryRecvError::Empty)
                    | Err(mpsc::error::TryRecvError::Disconnected) => break,
                }
            }

            if self.should_quit {
                break Ok(());
            }
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            DisableBracketedPaste,
            LeaveAlternateScreen
        )?;
        terminal.show_cursor()?;

        result
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    /// Translate one key press.
    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return AppAction::Quit;
        }
        if self.error.take().is_some() {
            return AppAction::None;
        }
        match self.screen {
            Screen::Upload => self.handle_upload_key(key),
            Screen::Dashboard => self.handle_dashboard_key(key),
        }
    }

    /// A paste is a dropped file: load it straight away from any screen.
    ///
    /// The current screen stays up while the load is in flight, so a failed
    /// load leaves the previous dashboard visible.
    pub fn handle_paste(&mut self, text: &str) -> AppAction {
        self.error = None;
        self.prompt.paste(text);
        match self.prompt.take_path() {
            Some(path) => AppAction::Load(path),
            None => AppAction::None,
        }
    }

    fn handle_upload_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Enter => match self.prompt.take_path() {
                Some(path) => AppAction::Load(path),
                None => AppAction::None,
            },
            KeyCode::Esc => {
                if self.session.is_loaded() {
                    self.prompt.clear();
                    self.screen = Screen::Dashboard;
                    AppAction::None
                } else {
                    AppAction::Quit
                }
            }
            KeyCode::Backspace => {
                self.prompt.backspace();
                AppAction::None
            }
            KeyCode::Char(c) => {
                self.prompt.insert_char(c);
                AppAction::None
            }
            _ => AppAction::None,
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => return AppAction::Quit,

            KeyCode::Tab | KeyCode::Right => self.tab = self.tab.next(),
            KeyCode::BackTab | KeyCode::Left => self.tab = self.tab.previous(),
            KeyCode::Char(c @ '1'..='4') => {
                if let Some(tab) = c.to_digit(10).and_then(|d| Tab::from_index(d as usize - 1)) {
                    self.tab = tab;
                }
            }

            KeyCode::Char(',') => self.year_cursor = self.year_cursor.saturating_sub(1),
            KeyCode::Char('.') => {
                let last = self.session.available_years().len().saturating_sub(1);
                self.year_cursor = (self.year_cursor + 1).min(last);
            }
            KeyCode::Char(' ') => {
                if let Some(&year) = self.session.available_years().get(self.year_cursor) {
                    self.session.toggle_year(year);
                    self.after_filter_change();
                }
            }
            KeyCode::Char('a') => {
                let years = self.session.available_years().to_vec();
                self.session.set_years(years);
                self.after_filter_change();
            }
            KeyCode::Char('n') => {
                self.session.cycle_channel(true);
                self.after_filter_change();
            }
            KeyCode::Char('p') => {
                self.session.cycle_channel(false);
                self.after_filter_change();
            }

            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.session.adjust_min_watches(1);
                self.after_filter_change();
            }
            KeyCode::Char('-') => {
                self.session.adjust_min_watches(-1);
                self.after_filter_change();
            }

            KeyCode::Char('j') | KeyCode::Down => self.scroll_rewatches(1),
            KeyCode::Char('k') | KeyCode::Up => self.scroll_rewatches(-1),
            KeyCode::PageDown => self.scroll_rewatches(PAGE as isize),
            KeyCode::PageUp => self.scroll_rewatches(-(PAGE as isize)),

            KeyCode::Char('e') => self.export(),
            KeyCode::Char('o') => {
                self.prompt.clear();
                self.screen = Screen::Upload;
            }
            KeyCode::Char('t') => self.toggle_theme(),
            KeyCode::Char('c') => self.cycle_accent(),
            _ => {}
        }
        AppAction::None
    }

    // ── Loading ───────────────────────────────────────────────────────────────

    fn start_load(&mut self, loader: &mut FileLoader, path: PathBuf) {
        self.status = Some(format!("Loading {}...", path.display()));
        loader.spawn_load(path);
    }

    /// Apply a finished load. A failed load only raises an error message and
    /// leaves the current dataset untouched.
    pub fn apply_outcome(&mut self, outcome: LoadOutcome) {
        let file = match outcome.result {
            Ok(file) => file,
            Err(e) => {
                warn!(
                    request_id = outcome.request_id,
                    path = %outcome.requested.display(),
                    error = %e,
                    "history load failed"
                );
                self.status = None;
                self.error = Some(e.user_message());
                return;
            }
        };

        let summary = self.session.apply_load(file.path, &file.records);
        if let Some(filters) = self.initial_filters.take() {
            if !filters.years.is_empty() {
                self.session.set_years(filters.years);
            }
            if let Some(channel) = filters.channel {
                self.session.set_channel(ChannelFilter::Named(channel));
            }
        }

        self.charts.rebuild(self.session.dashboard());
        self.screen = Screen::Dashboard;
        self.tab = Tab::Overview;
        self.year_cursor = 0;
        self.rewatch_scroll = 0;
        self.status = Some(if summary.rejected == 0 {
            format!("Loaded {} videos", summary.accepted)
        } else {
            format!(
                "Loaded {} videos ({} records skipped)",
                summary.accepted, summary.rejected
            )
        });
    }

    // ── Actions ───────────────────────────────────────────────────────────────

    fn after_filter_change(&mut self) {
        self.charts.rebuild(self.session.dashboard());
        self.rewatch_scroll = 0;
    }

    fn scroll_rewatches(&mut self, delta: isize) {
        let last = self.session.dashboard().rewatches.len().saturating_sub(1);
        self.rewatch_scroll = self.rewatch_scroll.saturating_add_signed(delta).min(last);
    }

    /// Write the current rewatch list to the export directory.
    pub fn export(&mut self) {
        let groups = &self.session.dashboard().rewatches;
        match export_rewatches(&self.export_dir, groups) {
            Ok(path) => {
                self.status = Some(format!(
                    "Exported {} videos to {}",
                    groups.len(),
                    path.display()
                ));
            }
            Err(e) => {
                warn!(error = %e, "export failed");
                self.error = Some(e.user_message());
            }
        }
    }

    /// Switch between dark and light, keeping the accent colour.
    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        self.save_preferences();
    }

    /// Move to the next preset accent colour.
    pub fn cycle_accent(&mut self) {
        let next = next_accent(&self.theme.accent_name);
        self.theme = self.theme.clone().with_accent(next);
        self.save_preferences();
    }

    fn save_preferences(&self) {
        let Some(path) = self.preferences_path.as_deref() else {
            return;
        };
        let mut prefs = Preferences::load_from(path);
        if matches!(self.theme.kind, ThemeKind::Dark | ThemeKind::Light) {
            prefs.theme = Some(self.theme.kind.name().to_string());
        }
        prefs.theme_color = Some(self.theme.accent_name.clone());
        match prefs.save_to(path) {
            Ok(()) => info!(
                theme = self.theme.kind.name(),
                accent = %self.theme.accent_name,
                "saved preferences"
            ),
            Err(e) => warn!(error = %e, "could not save preferences"),
        }
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    /// Render the current application state into `frame`.
    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        match self.screen {
            Screen::Upload => {
                let timezone = self.session.timezone().default_tz().name();
                render_upload_view(frame, area, &self.prompt, timezone, &self.theme);
            }
            Screen::Dashboard => {
                let view = DashboardView {
                    session: &self.session,
                    charts: &self.charts,
                    tab: self.tab,
                    year_cursor: self.year_cursor,
                    rewatch_scroll: self.rewatch_scroll,
                    status: self.status.as_deref(),
                    theme: &self.theme,
                };
                render_dashboard(frame, area, &view);
            }
        }
        if let Some(message) = self.error.as_deref() {
            render_error_modal(frame, area, message, &self.theme);
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
