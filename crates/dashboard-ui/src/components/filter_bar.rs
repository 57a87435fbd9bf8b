use dashboard_core::models::{DateFilter, FilterMode};
use ratatui::text::{Line, Span};

use crate::themes::Theme;

/// One-line summary of the date filter plus the keys that change it.
pub struct FilterBar<'a> {
    pub mode: FilterMode,
    /// `None` until records have been loaded and defaults resolved.
    pub filter: Option<DateFilter>,
    pub theme: &'a Theme,
}

impl<'a> FilterBar<'a> {
    pub fn new(mode: FilterMode, filter: Option<DateFilter>, theme: &'a Theme) -> Self {
        Self {
            mode,
            filter,
            theme,
        }
    }

    pub fn to_line(&self) -> Line<'a> {
        let mut spans = vec![
            Span::styled("Filter: ", self.theme.label),
            Span::styled(self.mode.label(), self.theme.filter_mode),
            Span::styled("  ", self.theme.label),
        ];

        match self.filter {
            Some(DateFilter::Range { start, end }) => {
                spans.push(Span::styled(start.to_string(), self.theme.filter_bound));
                spans.push(Span::styled(" → ", self.theme.label));
                spans.push(Span::styled(end.to_string(), self.theme.filter_bound));
                if start > end {
                    spans.push(Span::styled("  (start after end)", self.theme.warning));
                }
            }
            Some(DateFilter::SingleDay(day)) => {
                spans.push(Span::styled(day.to_string(), self.theme.filter_bound));
            }
            None => spans.push(Span::styled("—", self.theme.dim)),
        }

        spans.push(Span::styled(key_hints(self.mode), self.theme.dim));
        Line::from(spans)
    }
}

fn key_hints(mode: FilterMode) -> &'static str {
    match mode {
        FilterMode::Range => {
            "   Tab mode · [ ] start · { } end · Home reset · r reload · ↑↓ scroll · q quit"
        }
        FilterMode::Single => {
            "   Tab mode · ← → day · Home reset · r reload · ↑↓ scroll · q quit"
        }
    }
}
