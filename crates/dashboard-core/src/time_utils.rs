use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Formats tried for timestamps that carry a UTC offset.
///
/// `%#z` accepts `+00`, `+0000` and `+00:00`, which covers the Postgres text
/// rendering of `timestamptz`.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M:%S%.f%#z",
];

/// Formats tried for timestamps without an offset.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse a textual timestamp into a naive UTC value.
///
/// Handles RFC 3339 (including a `Z` suffix), Postgres `timestamp` and
/// `timestamptz` text output, ISO 8601 without offset, and bare dates
/// (midnight). Values with an offset are converted to UTC.
///
/// Returns `None` for empty or unrecognised input.
///
/// # Examples
///
/// ```
/// use dashboard_core::time_utils::parse_timestamp;
///
/// let ts = parse_timestamp("2024-01-15 09:30:00+02").unwrap();
/// assert_eq!(ts.to_string(), "2024-01-15 07:30:00");
/// assert!(parse_timestamp("not a date").is_none());
/// ```
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.naive_utc());
        }
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive);
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Parse a `YYYY-MM-DD` calendar date (CLI date arguments).
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD, got '{}': {}", s, e))
}
