use crate::themes::Theme;
use dashboard_core::formatting::format_count;
use ratatui::text::{Line, Span};

/// Page title shown on the first header line.
pub const TITLE: &str = "Job Dashboard";

/// Width of the `=` separator under the title.
const SEPARATOR_WIDTH: usize = 60;

/// Dashboard header rendering three lines:
///
/// 1. The page title.
/// 2. A 60-column `=` separator.
/// 3. Counts and load time in `[ 12 of 340 postings | loaded 09:15:02 UTC ]`
///    format, or `[ waiting for data ]` before the first load.
pub struct Header<'a> {
    /// Postings passing the active filter.
    pub filtered: Option<usize>,
    /// Postings loaded in total.
    pub total: Option<usize>,
    /// Load time of the current snapshot, already formatted.
    pub loaded_at: Option<&'a str>,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self {
            filtered: None,
            total: None,
            loaded_at: None,
            theme,
        }
    }

    /// Attach the counts of the current views.
    pub fn counts(mut self, filtered: usize, total: usize) -> Self {
        self.filtered = Some(filtered);
        self.total = Some(total);
        self
    }

    pub fn loaded_at(mut self, loaded_at: &'a str) -> Self {
        self.loaded_at = Some(loaded_at);
        self
    }

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let mut info = vec![Span::styled("[ ", self.theme.label)];
        match (self.filtered, self.total) {
            (Some(filtered), Some(total)) => {
                info.push(Span::styled(format_count(filtered as u64), self.theme.value));
                info.push(Span::styled(" of ", self.theme.label));
                info.push(Span::styled(format_count(total as u64), self.theme.value));
                info.push(Span::styled(" postings", self.theme.label));
            }
            _ => info.push(Span::styled("waiting for data", self.theme.dim)),
        }
        if let Some(at) = self.loaded_at {
            info.push(Span::styled(" | loaded ", self.theme.label));
            info.push(Span::styled(at, self.theme.value));
        }
        info.push(Span::styled(" ]", self.theme.label));

        vec![
            Line::from(Span::styled(TITLE, self.theme.header)),
            Line::from(Span::styled("=".repeat(SEPARATOR_WIDTH), self.theme.separator)),
            Line::from(info),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_header_lines() {
        let theme = Theme::dark();
        let lines = Header::new(&theme)
            .counts(1_250, 40_000)
            .loaded_at("09:15:02 UTC")
            .to_lines();

        assert_eq!(lines.len(), 3);
        assert_eq!(text(&lines[0]), "Job Dashboard");
        assert_eq!(text(&lines[1]).chars().count(), 60);
        assert_eq!(
            text(&lines[2]),
            "[ 1,250 of 40,000 postings | loaded 09:15:02 UTC ]"
        );
    }

    #[test]
    fn test_header_before_first_load() {
        let theme = Theme::dark();
        let lines = Header::new(&theme).to_lines();
        assert_eq!(text(&lines[2]), "[ waiting for data ]");
    }
}
