//! The four dashboard charts.
//!
//! Each function renders one bordered chart into the given area. Charts
//! accept empty input and render an explanatory notice instead of an empty
//! plot.

use ratatui::{
    layout::{Alignment, Direction, Rect},
    style::Style,
    symbols,
    text::{Line, Span},
    widgets::{Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use dashboard_core::formatting::{format_count, format_salary_short};
use dashboard_core::models::{
    FilterMode, LocationCount, SalaryHistogram, SkillCount, TimeBucket, TimeBucketKey,
};

use crate::themes::Theme;

pub const SKILLS_TITLE: &str = "Top 20 Skills";
pub const TIMELINE_TITLE: &str = "Jobs Over Time";
pub const SALARY_TITLE: &str = "Distribution of Max Salaries (5th–95th Percentile)";
pub const LOCATIONS_TITLE: &str = "Top Locations by Job Count";

/// Widest category label on horizontal bar charts.
const MAX_LABEL_WIDTH: usize = 18;

// ── Bar charts ────────────────────────────────────────────────────────────────

/// Horizontal "Top 20 Skills" chart, bars coloured by relative count.
pub fn render_top_skills(frame: &mut Frame, area: Rect, skills: &[SkillCount], theme: &Theme) {
    let max = skills.iter().map(|s| s.count).max().unwrap_or(0);
    let bars: Vec<Bar> = skills
        .iter()
        .map(|s| ranked_bar(&s.skill, s.count, theme.bar_style(s.count, max)))
        .collect();
    render_horizontal_bars(frame, area, SKILLS_TITLE, &bars, "Skill", theme);
}

/// Horizontal "Top Locations by Job Count" chart.
pub fn render_top_locations(
    frame: &mut Frame,
    area: Rect,
    locations: &[LocationCount],
    theme: &Theme,
) {
    let bars: Vec<Bar> = locations
        .iter()
        .map(|l| ranked_bar(&l.location, l.count, theme.bar_medium))
        .collect();
    render_horizontal_bars(frame, area, LOCATIONS_TITLE, &bars, "Location", theme);
}

fn ranked_bar<'a>(label: &str, count: u64, style: Style) -> Bar<'a> {
    Bar::default()
        .value(count)
        .label(Line::from(truncate(label, MAX_LABEL_WIDTH)))
        .text_value(format_count(count))
        .style(style)
}

fn render_horizontal_bars(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    bars: &[Bar],
    category: &str,
    theme: &Theme,
) {
    let block = chart_block(title, theme)
        .title_bottom(Line::from(format!(" x: Count · y: {category} ")).alignment(Alignment::Right));

    if bars.is_empty() {
        render_notice(frame, area, block, "No postings in the selected dates.", theme);
        return;
    }

    let chart = BarChart::default()
        .block(block)
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .label_style(theme.label)
        .value_style(theme.value)
        .data(BarGroup::default().bars(bars));
    frame.render_widget(chart, area);
}

// ── Time series ───────────────────────────────────────────────────────────────

/// "Jobs Over Time" line chart. The x axis is the date in range mode and the
/// hour of day in single-day mode.
pub fn render_jobs_over_time(
    frame: &mut Frame,
    area: Rect,
    series: &[TimeBucket],
    mode: FilterMode,
    theme: &Theme,
) {
    let block = chart_block(TIMELINE_TITLE, theme);
    if series.is_empty() {
        render_notice(frame, area, block, "No postings in the selected dates.", theme);
        return;
    }

    // x is real time: days since the first bucket, or the hour of day.
    let origin = series[0].key;
    let points: Vec<(f64, f64)> = series
        .iter()
        .map(|b| (b.key.axis_position(&origin) as f64, b.count as f64))
        .collect();
    let (x_min, x_max) = x_bounds(series);
    let max_count = series.iter().map(|b| b.count).max().unwrap_or(0);
    let y_max = (max_count as f64 * 1.1).ceil().max(1.0);

    let x_title = match mode {
        FilterMode::Range => "Date",
        FilterMode::Single => "Time of Day",
    };

    let dataset = Dataset::default()
        .name("Number of Jobs")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(theme.line)
        .data(&points);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .title(x_title)
                .style(theme.axis)
                .bounds([x_min as f64, x_max as f64])
                .labels(axis_labels(series)),
        )
        .y_axis(
            Axis::default()
                .title("Number of Jobs")
                .style(theme.axis)
                .bounds([0.0, y_max])
                .labels(vec![
                    "0".to_string(),
                    format_count((y_max / 2.0).round() as u64),
                    format_count(y_max as u64),
                ]),
        );
    frame.render_widget(chart, area);
}

/// Axis span in positions; a single bucket gets a one-step span.
fn x_bounds(series: &[TimeBucket]) -> (i64, i64) {
    let (Some(first), Some(last)) = (series.first(), series.last()) else {
        return (0, 1);
    };
    let lo = first.key.axis_position(&first.key);
    let hi = last.key.axis_position(&first.key);
    (lo, hi.max(lo + 1))
}

/// Labels at the start, middle and end of the time axis.
fn axis_labels(series: &[TimeBucket]) -> Vec<String> {
    let Some(first) = series.first() else {
        return Vec::new();
    };
    let origin = first.key;
    let (lo, hi) = x_bounds(series);
    let label = |pos: i64| TimeBucketKey::at_axis_position(&origin, pos).short_label();

    if series.len() == 1 {
        // A lone label is not drawn, so pad the axis end.
        return vec![origin.short_label(), String::new()];
    }
    if hi - lo < 2 {
        return vec![label(lo), label(hi)];
    }
    vec![label(lo), label(lo + (hi - lo) / 2), label(hi)]
}

// ── Salary histogram ──────────────────────────────────────────────────────────

/// Ten-bin salary histogram in teal, or a notice when the filtered set has
/// no salary data.
pub fn render_salary_histogram(
    frame: &mut Frame,
    area: Rect,
    histogram: Option<&SalaryHistogram>,
    theme: &Theme,
) {
    let block = chart_block(SALARY_TITLE, theme)
        .title_bottom(Line::from(" x: Max Salary · y: Count ").alignment(Alignment::Right));

    let Some(hist) = histogram else {
        render_notice(
            frame,
            area,
            block,
            "No salary data available for the selected dates.",
            theme,
        );
        return;
    };

    let bars: Vec<Bar> = hist
        .bins()
        .map(|(lo, _hi, count)| {
            Bar::default()
                .value(count)
                .label(Line::from(format_salary_short(lo)))
                .text_value(format_count(count))
                .style(theme.histogram)
        })
        .collect();

    let inner_width = area.width.saturating_sub(2);
    let bins = hist.counts.len().max(1) as u16;
    let bar_width = (inner_width.saturating_sub(bins - 1) / bins).max(1);

    let chart = BarChart::default()
        .block(block)
        .bar_width(bar_width)
        .bar_gap(1)
        .label_style(theme.label)
        .value_style(theme.value)
        .data(BarGroup::default().bars(&bars));
    frame.render_widget(chart, area);
}

// ── Shared helpers ────────────────────────────────────────────────────────────

fn chart_block<'a>(title: &'a str, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme.chart_border)
        .title(Span::styled(format!(" {title} "), theme.chart_title))
}

fn render_notice(frame: &mut Frame, area: Rect, block: Block, message: &str, theme: &Theme) {
    let text = vec![Line::from(""), Line::from(Span::styled(message.to_string(), theme.dim))];
    frame.render_widget(
        Paragraph::new(text).alignment(Alignment::Center).block(block),
        area,
    );
}

/// Cut `s` to at most `max` display columns, marking the cut with `…`.
pub fn truncate(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
