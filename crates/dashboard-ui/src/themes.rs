use ratatui::style::{Color, Modifier, Style};

/// Teal used for the salary histogram.
pub const TEAL: Color = Color::Rgb(0, 128, 128);

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
    Unknown,
}

/// Detect terminal background type from the `COLORFGBG` environment variable.
///
/// The variable has the format `"foreground;background"`. Background values
/// 0–6 are considered dark; 7–15 are considered light. If the variable is
/// absent or unparseable, `BackgroundType::Dark` is returned.
pub fn detect_background() -> BackgroundType {
    std::env::var("COLORFGBG")
        .ok()
        .as_deref()
        .map(background_from_colorfgbg)
        .unwrap_or(BackgroundType::Dark)
}

fn background_from_colorfgbg(val: &str) -> BackgroundType {
    match val.split(';').next_back().and_then(|bg| bg.parse::<u8>().ok()) {
        Some(n) if n <= 6 => BackgroundType::Dark,
        Some(_) => BackgroundType::Light,
        None => BackgroundType::Unknown,
    }
}

/// All styles used by the dashboard widgets.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Header ───────────────────────────────────────────────────────────────
    pub header: Style,
    pub separator: Style,

    // ── Text ─────────────────────────────────────────────────────────────────
    pub text: Style,
    pub dim: Style,
    pub label: Style,
    pub value: Style,

    // ── Status ───────────────────────────────────────────────────────────────
    pub info: Style,
    pub warning: Style,
    pub error: Style,

    // ── Filter controls ──────────────────────────────────────────────────────
    pub filter_mode: Style,
    pub filter_bound: Style,

    // ── Charts ───────────────────────────────────────────────────────────────
    pub chart_border: Style,
    pub chart_title: Style,
    pub axis: Style,
    /// Bars in the lowest quarter of the count range.
    pub bar_low: Style,
    pub bar_medium: Style,
    pub bar_high: Style,
    /// Bars at or near the maximum count.
    pub bar_top: Style,
    pub line: Style,
    pub histogram: Style,

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
        Self {
            header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            label: Style::default().fg(Color::Gray),
            value: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Cyan),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),

            filter_mode: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            filter_bound: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),

            chart_border: Style::default().fg(Color::DarkGray),
            chart_title: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            axis: Style::default().fg(Color::Gray),
            bar_low: Style::default().fg(Color::Blue),
            bar_medium: Style::default().fg(Color::Cyan),
            bar_high: Style::default().fg(Color::Green),
            bar_top: Style::default().fg(Color::Yellow),
            line: Style::default().fg(Color::LightBlue),
            histogram: Style::default().fg(TEAL),

            table_header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            table_border: Style::default().fg(Color::DarkGray),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
        }
    }

    /// Light-background terminal theme.
    pub fn light() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            separator: Style::default().fg(Color::Gray),

            text: Style::default().fg(Color::Black),
            dim: Style::default().fg(Color::Gray),
            label: Style::default().fg(Color::DarkGray),
            value: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Blue),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),

            filter_mode: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            filter_bound: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),

            chart_border: Style::default().fg(Color::Gray),
            chart_title: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            axis: Style::default().fg(Color::DarkGray),
            bar_low: Style::default().fg(Color::Blue),
            bar_medium: Style::default().fg(Color::Cyan),
            bar_high: Style::default().fg(Color::Green),
            bar_top: Style::default().fg(Color::Magenta),
            line: Style::default().fg(Color::Blue),
            histogram: Style::default().fg(TEAL),

            table_header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            table_border: Style::default().fg(Color::Gray),
            table_row: Style::default().fg(Color::Black),
            table_row_alt: Style::default().fg(Color::DarkGray),
        }
    }

    /// Classic theme using only the basic ANSI palette and no bold.
    pub fn classic() -> Self {
        Self {
            header: Style::default().fg(Color::Cyan),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            label: Style::default().fg(Color::Gray),
            value: Style::default().fg(Color::White),

            info: Style::default().fg(Color::Cyan),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            filter_mode: Style::default().fg(Color::Magenta),
            filter_bound: Style::default().fg(Color::White),

            chart_border: Style::default().fg(Color::DarkGray),
            chart_title: Style::default().fg(Color::Cyan),
            axis: Style::default().fg(Color::Gray),
            bar_low: Style::default().fg(Color::Blue),
            bar_medium: Style::default().fg(Color::Cyan),
            bar_high: Style::default().fg(Color::Green),
            bar_top: Style::default().fg(Color::Yellow),
            line: Style::default().fg(Color::White),
            histogram: Style::default().fg(Color::Cyan),

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

    /// Construct a theme by name. Falls back to `auto_detect` for unknown
    /// names.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "dark" => Self::dark(),
            "classic" => Self::classic(),
            _ => Self::auto_detect(),
        }
    }

    // ── Style helpers ────────────────────────────────────────────────────────

    /// Bar colour for a count relative to the largest count in the chart.
    ///
    /// * `< 25 %`  → `bar_low`
    /// * `25–50 %` → `bar_medium`
    /// * `50–90 %` → `bar_high`
    /// * `≥ 90 %`  → `bar_top`
    pub fn bar_style(&self, count: u64, max: u64) -> Style {
        let fraction = if max == 0 {
            0.0
        } else {
            count as f64 / max as f64
        };
        if fraction >= 0.9 {
            self.bar_top
        } else if fraction >= 0.5 {
            self.bar_high
        } else if fraction >= 0.25 {
            self.bar_medium
        } else {
            self.bar_low
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
