//! Number formatting for the dashboard's labels and table cells.

/// Format an integer count with thousands separators.
///
/// ```
/// use dashboard_core::formatting::format_count;
///
/// assert_eq!(format_count(1_234), "1,234");
/// ```
pub fn format_count(n: u64) -> String {
    group_thousands(&n.to_string())
}

/// Format a nullable salary for the data table, rounded to whole units.
/// Null and non-finite values render as `"—"`.
///
/// ```
/// use dashboard_core::formatting::format_salary;
///
/// assert_eq!(format_salary(Some(54_999.6)), "55,000");
/// assert_eq!(format_salary(None), "—");
/// ```
pub fn format_salary(value: Option<f64>) -> String {
    let Some(v) = value.filter(|v| v.is_finite()) else {
        return "—".to_string();
    };
    let rounded = v.round();
    let grouped = format_count(rounded.abs() as u64);
    if rounded < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Compact salary label for chart axes: `48k`, `1.2M`, `900`.
pub fn format_salary_short(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("{:.0}k", value / 1_000.0)
    } else {
        format!("{:.0}", value)
    }
}

fn group_thousands(digits: &str) -> String {
    let lead = digits.len() % 3;
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.char_indices() {
        if i > 0 && i % 3 == lead {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }

    #[test]
    fn test_format_salary() {
        assert_eq!(format_salary(Some(45_000.0)), "45,000");
        assert_eq!(format_salary(Some(999.4)), "999");
        assert_eq!(format_salary(Some(-1_500.0)), "-1,500");
        assert_eq!(format_salary(Some(-0.2)), "0");
        assert_eq!(format_salary(Some(f64::NAN)), "—");
        assert_eq!(format_salary(None), "—");
    }

    #[test]
    fn test_format_salary_short() {
        assert_eq!(format_salary_short(950.0), "950");
        assert_eq!(format_salary_short(48_200.0), "48k");
        assert_eq!(format_salary_short(1_240_000.0), "1.2M");
    }
}
