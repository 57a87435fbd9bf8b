//! Filtered job listings table.
//!
//! Renders a bordered [`ratatui::widgets::Table`] of display rows starting at
//! a scroll offset, plus the placeholder shown before any data is loaded.

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use dashboard_core::formatting::{format_count, format_salary};
use dashboard_core::models::DisplayRow;

use crate::charts::truncate;
use crate::themes::Theme;

const HEADERS: [&str; 7] = [
    "Title",
    "Company",
    "Location",
    "Contract",
    "Min Salary",
    "Max Salary",
    "Skills",
];

/// Rows the table can show in `area`: borders and the header row excluded.
pub fn visible_rows(area: Rect) -> usize {
    area.height.saturating_sub(3) as usize
}

/// Largest scroll offset that still fills the visible window.
pub fn max_offset(total: usize, visible: usize) -> usize {
    total.saturating_sub(visible.max(1))
}

/// Render `rows` starting at `offset`.
pub fn render_jobs_table(
    frame: &mut Frame,
    area: Rect,
    rows: &[DisplayRow],
    offset: usize,
    theme: &Theme,
) {
    let header = Row::new(HEADERS.iter().map(|h| Cell::from(*h).style(theme.table_header)))
        .height(1);

    let visible = visible_rows(area);
    let offset = offset.min(max_offset(rows.len(), visible));

    let data_rows: Vec<Row> = rows
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .map(|(i, row)| {
            let style = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            Row::new(vec![
                Cell::from(text_cell(row.title.as_deref(), 40)),
                Cell::from(text_cell(row.company.as_deref(), 28)),
                Cell::from(text_cell(row.location.as_deref(), 24)),
                Cell::from(text_cell(row.contract_type.as_deref(), 12)),
                Cell::from(format_salary(row.salary_min)),
                Cell::from(format_salary(row.salary_max)),
                Cell::from(truncate(&row.skills, 80)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Fill(3),
        Constraint::Fill(2),
        Constraint::Fill(2),
        Constraint::Length(10),
        Constraint::Length(11),
        Constraint::Length(11),
        Constraint::Fill(4),
    ];

    let title = if rows.is_empty() {
        " Job Listings (0) ".to_string()
    } else {
        format!(
            " Job Listings ({}) · rows {}–{} ",
            format_count(rows.len() as u64),
            offset + 1,
            (offset + visible).min(rows.len()),
        )
    };

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

fn text_cell(value: Option<&str>, max: usize) -> String {
    value.map(|v| truncate(v, max)).unwrap_or_default()
}

/// Render a "no data" placeholder when nothing has been loaded yet.
pub fn render_no_data(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No job postings loaded", theme.warning)),
        Line::from(""),
        Line::from(Span::styled(
            "Waiting for data from the database.",
            theme.dim,
        )),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Job Dashboard "),
        ),
        area,
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────
