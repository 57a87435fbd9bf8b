//! Main application state and TUI event loop for the job dashboard.
//!
//! [`App`] owns the theme, the per-mode date filters, the latest record
//! snapshot and the views computed from it. Views are recomputed whenever
//! the filter changes or a new snapshot arrives.

use std::cell::Cell;
use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame, Terminal,
};
use tokio::sync::mpsc;

use dashboard_core::models::{DateFilter, FilterMode, FilterRequest};
use dashboard_data::analysis::{build_views, DashboardViews};
use dashboard_data::filter::resolve_filter;
use dashboard_runtime::data_manager::Snapshot;
use dashboard_runtime::orchestrator::DashboardUpdate;

use crate::charts;
use crate::components::filter_bar::FilterBar;
use crate::components::header::Header;
use crate::table_view;
use crate::themes::Theme;

/// Rows moved by PgUp / PgDn.
const PAGE_SIZE: usize = 10;

// ── AppAction ─────────────────────────────────────────────────────────────────

/// Outcome of a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    None,
    Quit,
    /// A forced reload was requested.
    Refresh,
    /// The date filter changed and the views were recomputed.
    FilterChanged,
    Scrolled,
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the dashboard TUI.
pub struct App {
    pub theme: Theme,
    /// Which filter is active.
    pub mode: FilterMode,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
    /// Text of the last load failure, shown as a banner until the next
    /// successful snapshot.
    pub last_error: Option<String>,
    /// Bounds supplied on the command line, applied to the first snapshot.
    initial: FilterRequest,
    range: Option<DateFilter>,
    day: Option<DateFilter>,
    snapshot: Option<Snapshot>,
    views: Option<DashboardViews>,
    scroll: usize,
    /// Data rows the table fit on the last draw; 0 before the first one.
    table_rows: Cell<usize>,
    refresh_tx: Option<mpsc::Sender<()>>,
}

impl App {
    pub fn new(theme_name: &str, initial: FilterRequest) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            mode: initial.mode.unwrap_or(FilterMode::Range),
            should_quit: false,
            last_error: None,
            initial,
            range: None,
            day: None,
            snapshot: None,
            views: None,
            scroll: 0,
            table_rows: Cell::new(0),
            refresh_tx: None,
        }
    }

    /// Channel used by the `r` key to request a forced reload.
    pub fn with_refresh_sender(mut self, tx: mpsc::Sender<()>) -> Self {
        self.refresh_tx = Some(tx);
        self
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    /// Filter of the active mode, once records have been loaded.
    pub fn active_filter(&self) -> Option<DateFilter> {
        match self.mode {
            FilterMode::Range => self.range,
            FilterMode::Single => self.day,
        }
    }

    pub fn views(&self) -> Option<&DashboardViews> {
        self.views.as_ref()
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    // ── Public event loop ─────────────────────────────────────────────────────

    /// Run the dashboard TUI, receiving snapshots from `rx`.
    ///
    /// Uses `crossterm::event::poll` with a 250 ms timeout so the terminal
    /// loop stays on the current thread while updates arrive on the async
    /// channel via `try_recv`.
    pub async fn run(mut self, mut rx: mpsc::Receiver<DashboardUpdate>) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame)) {
                break Err(e);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                        self.handle_key(key);
                    }
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }

            // Drain any pending updates (non-blocking).
            loop {
                match rx.try_recv() {
                    Ok(update) => self.apply_update(update),
                    Err(mpsc::error::TryRecvError::Empty) => break,
                    Err(mpsc::error::TryRecvError::Disconnected) => {
                        tracing::warn!("update channel closed; leaving dashboard");
                        self.should_quit = true;
                        break;
                    }
                }
            }

            if self.should_quit {
                break Ok(());
            }
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    // ── State updates ─────────────────────────────────────────────────────────

    /// Apply a message from the refresh task.
    pub fn apply_update(&mut self, update: DashboardUpdate) {
        match update {
            DashboardUpdate::Snapshot(snapshot) => {
                tracing::debug!(records = snapshot.records.len(), "snapshot received");
                self.last_error = None;
                self.snapshot = Some(snapshot);
                self.ensure_filters();
                self.recompute();
            }
            DashboardUpdate::LoadFailed(message) => {
                tracing::warn!(error = %message, "load failed");
                self.last_error = Some(message);
            }
        }
    }

    /// Handle one key press and report what it did.
    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        let action = match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                AppAction::Quit
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => AppAction::Quit,
            KeyCode::Tab | KeyCode::Char('m') => {
                self.mode = self.mode.toggled();
                self.scroll = 0;
                self.recompute();
                AppAction::FilterChanged
            }
            KeyCode::Char('[') => self.shift(FilterMode::Range, |f| f.shift_start(-1)),
            KeyCode::Char(']') => self.shift(FilterMode::Range, |f| f.shift_start(1)),
            KeyCode::Char('{') => self.shift(FilterMode::Range, |f| f.shift_end(-1)),
            KeyCode::Char('}') => self.shift(FilterMode::Range, |f| f.shift_end(1)),
            KeyCode::Left => self.shift(FilterMode::Single, |f| f.shift_start(-1)),
            KeyCode::Right => self.shift(FilterMode::Single, |f| f.shift_start(1)),
            KeyCode::Home => self.reset_filter(),
            KeyCode::Char('r') | KeyCode::Char('R') => self.request_refresh(),
            KeyCode::Up => self.scroll_by(-1),
            KeyCode::Down => self.scroll_by(1),
            KeyCode::PageUp => self.scroll_by(-(PAGE_SIZE as isize)),
            KeyCode::PageDown => self.scroll_by(PAGE_SIZE as isize),
            _ => AppAction::None,
        };
        if action == AppAction::Quit {
            self.should_quit = true;
        }
        action
    }

    // ── Private helpers ───────────────────────────────────────────────────────

    /// Resolve per-mode filters the first time records are available.
    ///
    /// Command-line bounds win; missing ones come from the records. Filters
    /// already set by the user survive later snapshots.
    fn ensure_filters(&mut self) {
        let Some(snapshot) = &self.snapshot else {
            return;
        };
        let records = snapshot.records.as_slice();

        if self.range.is_none() {
            let request = FilterRequest {
                mode: Some(FilterMode::Range),
                ..self.initial
            };
            self.range = resolve_filter(request, records).ok();
        }
        if self.day.is_none() {
            let request = FilterRequest {
                mode: Some(FilterMode::Single),
                ..self.initial
            };
            self.day = resolve_filter(request, records).ok();
        }
    }

    fn recompute(&mut self) {
        self.views = match (&self.snapshot, self.active_filter()) {
            (Some(snapshot), Some(filter)) => Some(build_views(&snapshot.records, filter)),
            _ => None,
        };
        self.scroll = self.scroll.min(self.max_scroll());
    }

    fn shift(&mut self, mode: FilterMode, f: impl FnOnce(DateFilter) -> DateFilter) -> AppAction {
        if self.mode != mode {
            return AppAction::None;
        }
        let slot = match mode {
            FilterMode::Range => &mut self.range,
            FilterMode::Single => &mut self.day,
        };
        let Some(current) = *slot else {
            return AppAction::None;
        };
        *slot = Some(f(current));
        self.scroll = 0;
        self.recompute();
        AppAction::FilterChanged
    }

    /// Reset the active mode to the record-derived defaults.
    fn reset_filter(&mut self) -> AppAction {
        let Some(snapshot) = &self.snapshot else {
            return AppAction::None;
        };
        let filter = resolve_filter(FilterRequest::defaults(self.mode), &snapshot.records).ok();
        match self.mode {
            FilterMode::Range => self.range = filter,
            FilterMode::Single => self.day = filter,
        }
        self.scroll = 0;
        self.recompute();
        AppAction::FilterChanged
    }

    fn request_refresh(&self) -> AppAction {
        match &self.refresh_tx {
            Some(tx) => {
                if tx.try_send(()).is_err() {
                    tracing::debug!("refresh already pending");
                }
                AppAction::Refresh
            }
            None => AppAction::None,
        }
    }

    /// Largest offset the table can actually show, given its last height.
    fn max_scroll(&self) -> usize {
        let rows = self.views.as_ref().map_or(0, |v| v.rows.len());
        table_view::max_offset(rows, self.table_rows.get())
    }

    fn scroll_by(&mut self, delta: isize) -> AppAction {
        let next = self
            .scroll
            .saturating_add_signed(delta)
            .min(self.max_scroll());
        if next == self.scroll {
            return AppAction::None;
        }
        self.scroll = next;
        AppAction::Scrolled
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    /// Render the current application state into `frame`.
    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let banner_height = if self.last_error.is_some() { 1 } else { 0 };

        let [header_area, filter_area, banner_area, body_area] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(banner_height),
                Constraint::Min(0),
            ])
            .areas(area);

        let loaded_at = self
            .snapshot
            .as_ref()
            .map(|s| s.loaded_at.format("%H:%M:%S UTC").to_string());
        let mut header = Header::new(&self.theme);
        if let Some(views) = &self.views {
            header = header.counts(views.filtered_count, views.total_records);
        }
        if let Some(at) = loaded_at.as_deref() {
            header = header.loaded_at(at);
        }
        frame.render_widget(Paragraph::new(header.to_lines()), header_area);

        let filter_bar = FilterBar::new(self.mode, self.active_filter(), &self.theme);
        frame.render_widget(Paragraph::new(filter_bar.to_line()), filter_area);

        if let Some(message) = &self.last_error {
            let banner = Line::from(vec![
                Span::styled("Load failed: ", self.theme.error),
                Span::styled(message.as_str(), self.theme.warning),
                Span::styled("  (showing previous data, press r to retry)", self.theme.dim),
            ]);
            frame.render_widget(Paragraph::new(banner), banner_area);
        }

        match &self.views {
            Some(views) => self.render_views(frame, body_area, views),
            None => table_view::render_no_data(frame, body_area, &self.theme),
        }
    }

    fn render_views(&self, frame: &mut Frame, area: Rect, views: &DashboardViews) {
        let [charts_area, table_area] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .areas(area);

        let [left, right] = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .areas(charts_area);

        let [skills_area, timeline_area] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .areas(left);

        let [salary_area, locations_area] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .areas(right);

        charts::render_top_skills(frame, skills_area, &views.top_skills, &self.theme);
        charts::render_jobs_over_time(
            frame,
            timeline_area,
            &views.jobs_over_time,
            views.filter.mode(),
            &self.theme,
        );
        charts::render_salary_histogram(frame, salary_area, views.salary.as_ref(), &self.theme);
        charts::render_top_locations(frame, locations_area, &views.top_locations, &self.theme);
        self.table_rows.set(table_view::visible_rows(table_area));
        table_view::render_jobs_table(frame, table_area, &views.rows, self.scroll, &self.theme);
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime, Utc};
    use dashboard_core::models::{FreshnessToken, JobRecord};
    use ratatui::backend::TestBackend;
    use std::sync::Arc;

    fn rec(created: &str, skills: &str, location: &str, salary: f64) -> JobRecord {
        JobRecord {
            title: Some("Data Engineer".to_string()),
            company: Some("Acme".to_string()),
            location: Some(location.to_string()),
            contract_type: Some("permanent".to_string()),
            salary_min: Some(salary - 10_000.0),
            salary_max: Some(salary),
            skills: Some(skills.to_string()),
            created: NaiveDateTime::parse_from_str(created, "%Y-%m-%d %H:%M:%S").unwrap(),
            timestamp: None,
        }
    }

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn snapshot() -> DashboardUpdate {
        let records = vec![
            rec("2024-01-01 09:00:00", "{Python,SQL}", "London", 50_000.0),
            rec("2024-01-01 14:00:00", "{SQL,Go}", "Leeds", 60_000.0),
            rec("2024-01-03 11:00:00", "{Rust}", "London", 70_000.0),
            rec("2024-01-05 16:00:00", "{Python}", "York", 80_000.0),
        ];
        DashboardUpdate::Snapshot(Snapshot {
            token: FreshnessToken {
                row_count: records.len() as i64,
                latest: None,
            },
            records: Arc::new(records),
            loaded_at: Utc::now(),
            load_time_seconds: 0.01,
        })
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn loaded_app() -> App {
        let mut app = App::new("dark", FilterRequest::default());
        app.apply_update(snapshot());
        app
    }

    fn screen(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    // ── App::new ──────────────────────────────────────────────────────────────

    #[test]
    fn test_app_creation_defaults() {
        let app = App::new("dark", FilterRequest::default());
        assert_eq!(app.mode, FilterMode::Range);
        assert!(!app.should_quit);
        assert!(app.views().is_none());
        assert!(app.active_filter().is_none());
    }

    #[test]
    fn test_app_creation_single_mode() {
        let app = App::new("neon", FilterRequest::defaults(FilterMode::Single));
        assert_eq!(app.mode, FilterMode::Single);
    }

    // ── Snapshots ─────────────────────────────────────────────────────────────

    #[test]
    fn test_snapshot_resolves_default_filters() {
        let app = loaded_app();
        assert_eq!(
            app.active_filter(),
            Some(DateFilter::Range {
                start: d("2024-01-01"),
                end: d("2024-01-05"),
            })
        );
        let views = app.views().unwrap();
        assert_eq!(views.filtered_count, 4);
        assert_eq!(views.top_skills[0].skill, "Python");
    }

    #[test]
    fn test_cli_bounds_applied_to_first_snapshot() {
        let request = FilterRequest {
            mode: Some(FilterMode::Range),
            start: Some(d("2024-01-02")),
            ..FilterRequest::default()
        };
        let mut app = App::new("dark", request);
        app.apply_update(snapshot());
        assert_eq!(app.views().unwrap().filtered_count, 2);
    }

    #[test]
    fn test_user_filter_survives_new_snapshot() {
        let mut app = loaded_app();
        app.handle_key(key(KeyCode::Char(']')));
        app.apply_update(snapshot());
        assert_eq!(
            app.active_filter(),
            Some(DateFilter::Range {
                start: d("2024-01-02"),
                end: d("2024-01-05"),
            })
        );
    }

    #[test]
    fn test_load_failure_sets_banner_and_keeps_views() {
        let mut app = loaded_app();
        app.apply_update(DashboardUpdate::LoadFailed("connection refused".to_string()));
        assert_eq!(app.last_error.as_deref(), Some("connection refused"));
        assert!(app.views().is_some());

        app.apply_update(snapshot());
        assert!(app.last_error.is_none());
    }

    // ── Keys ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_quit_keys() {
        let mut app = loaded_app();
        assert_eq!(app.handle_key(key(KeyCode::Char('q'))), AppAction::Quit);
        assert!(app.should_quit);

        let mut app = loaded_app();
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(app.handle_key(ctrl_c), AppAction::Quit);
    }

    #[test]
    fn test_toggle_mode_switches_to_hour_buckets() {
        let mut app = loaded_app();
        assert_eq!(app.handle_key(key(KeyCode::Tab)), AppAction::FilterChanged);
        assert_eq!(app.mode, FilterMode::Single);
        assert_eq!(app.active_filter(), Some(DateFilter::SingleDay(d("2024-01-01"))));

        let labels: Vec<_> = app
            .views()
            .unwrap()
            .jobs_over_time
            .iter()
            .map(|b| b.key.label())
            .collect();
        assert_eq!(labels, vec!["09:00", "14:00"]);
    }

    #[test]
    fn test_each_mode_keeps_its_bounds() {
        let mut app = loaded_app();
        app.handle_key(key(KeyCode::Char('}')));
        app.handle_key(key(KeyCode::Char('m')));
        app.handle_key(key(KeyCode::Right));
        app.handle_key(key(KeyCode::Char('m')));

        assert_eq!(
            app.active_filter(),
            Some(DateFilter::Range {
                start: d("2024-01-01"),
                end: d("2024-01-06"),
            })
        );
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.active_filter(), Some(DateFilter::SingleDay(d("2024-01-02"))));
    }

    #[test]
    fn test_range_keys_ignored_in_single_mode() {
        let mut app = loaded_app();
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.handle_key(key(KeyCode::Char('['))), AppAction::None);
        assert_eq!(app.handle_key(key(KeyCode::Left)), AppAction::FilterChanged);
        assert_eq!(app.active_filter(), Some(DateFilter::SingleDay(d("2023-12-31"))));
        assert_eq!(app.views().unwrap().filtered_count, 0);
    }

    #[test]
    fn test_home_resets_active_mode() {
        let mut app = loaded_app();
        app.handle_key(key(KeyCode::Char(']')));
        app.handle_key(key(KeyCode::Char('{')));
        assert_eq!(app.handle_key(key(KeyCode::Home)), AppAction::FilterChanged);
        assert_eq!(
            app.active_filter(),
            Some(DateFilter::Range {
                start: d("2024-01-01"),
                end: d("2024-01-05"),
            })
        );
    }

    #[test]
    fn test_refresh_key_sends_request() {
        let (tx, mut rx) = mpsc::channel(1);
        let mut app = loaded_app().with_refresh_sender(tx);
        assert_eq!(app.handle_key(key(KeyCode::Char('r'))), AppAction::Refresh);
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn test_scroll_bounds() {
        let mut app = loaded_app();
        assert_eq!(app.handle_key(key(KeyCode::Up)), AppAction::None);
        assert_eq!(app.handle_key(key(KeyCode::Down)), AppAction::Scrolled);
        assert_eq!(app.scroll(), 1);
        app.handle_key(key(KeyCode::PageDown));
        assert_eq!(app.scroll(), 3);
        app.handle_key(key(KeyCode::PageUp));
        assert_eq!(app.scroll(), 0);
    }

    #[test]
    fn test_scroll_stops_at_last_full_page() {
        let mut app = loaded_app();
        // The table fits all four rows, so there is nothing to scroll.
        screen(&app, 160, 50);
        assert_eq!(app.handle_key(key(KeyCode::Down)), AppAction::None);
        assert_eq!(app.handle_key(key(KeyCode::PageDown)), AppAction::None);
        assert_eq!(app.scroll(), 0);
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    #[test]
    fn test_render_no_data_placeholder() {
        let app = App::new("dark", FilterRequest::default());
        let out = screen(&app, 100, 30);
        assert!(out.contains("Job Dashboard"));
        assert!(out.contains("No job postings loaded"));
    }

    #[test]
    fn test_render_full_dashboard() {
        let app = loaded_app();
        let out = screen(&app, 160, 50);
        assert!(out.contains("Job Dashboard"));
        assert!(out.contains("Date Range"));
        assert!(out.contains("Top 20 Skills"));
        assert!(out.contains("Jobs Over Time"));
        assert!(out.contains("Distribution of Max Salaries"));
        assert!(out.contains("Top Locations by Job Count"));
        assert!(out.contains("Job Listings (4)"));
    }

    #[test]
    fn test_render_error_banner() {
        let mut app = loaded_app();
        app.apply_update(DashboardUpdate::LoadFailed("timeout".to_string()));
        let out = screen(&app, 160, 50);
        assert!(out.contains("Load failed: timeout"));
    }
}
