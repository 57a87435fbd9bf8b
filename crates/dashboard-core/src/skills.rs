//! Parsing of the textual skills list stored with each posting.
//!
//! The column arrives in several shapes depending on how the scraper wrote
//! it: Postgres array literals (`{Python,"Machine Learning"}`), Python-style
//! lists (`['Go', 'Rust']`), or bare comma-separated text. All of them are
//! normalised to the same token list.

const OPEN_BRACKETS: &[char] = &['{', '['];
const CLOSE_BRACKETS: &[char] = &['}', ']'];
const QUOTES: &[char] = &['"', '\''];

/// Split a skills literal into cleaned tokens, in source order.
///
/// Duplicates are kept; tokens that are empty after cleaning are dropped.
///
/// # Examples
///
/// ```
/// use dashboard_core::skills::parse_skills;
///
/// assert_eq!(parse_skills(r#"{Python, SQL, "Go"}"#), vec!["Python", "SQL", "Go"]);
/// assert_eq!(parse_skills("['Rust', 'C++']"), vec!["Rust", "C++"]);
/// assert!(parse_skills("{}").is_empty());
/// ```
pub fn parse_skills(raw: &str) -> Vec<String> {
    let inner = raw
        .trim()
        .trim_start_matches(OPEN_BRACKETS)
        .trim_end_matches(CLOSE_BRACKETS);

    inner
        .split(',')
        .map(clean_token)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Same as [`parse_skills`] but accepts the nullable column directly.
pub fn parse_skills_field(raw: Option<&str>) -> Vec<String> {
    raw.map(parse_skills).unwrap_or_default()
}

/// Render a skills literal as plain text: `Python, SQL, Go`.
///
/// Null or empty input renders as an empty string.
pub fn display_skills(raw: Option<&str>) -> String {
    parse_skills_field(raw).join(", ")
}

fn clean_token(token: &str) -> &str {
    token.trim().trim_matches(QUOTES).trim()
}
