//! Trimmed histogram of maximum salaries.

use dashboard_core::error::{DashboardError, Result};
use dashboard_core::models::{JobRecord, SalaryHistogram};
use dashboard_core::stats::{bin_index, equal_width_edges, percentile, sorted_finite};

/// Number of equal-width bins.
pub const SALARY_BINS: usize = 10;

/// Lower trimming percentile.
pub const LOWER_PERCENTILE: f64 = 5.0;

/// Upper trimming percentile.
pub const UPPER_PERCENTILE: f64 = 95.0;

/// Histogram of `salary_max` restricted to `[p5, p95]`.
///
/// Percentiles use linear interpolation over the non-null values. The bins
/// span the smallest and largest retained value; when no value falls inside
/// the trimmed interval (possible with two or three distinct values) the bins
/// span `[p5, p95]` and every count is zero.
///
/// Returns [`DashboardError::EmptySalaryData`] when no record carries a
/// salary; callers skip the chart in that case.
pub fn salary_histogram<'a>(
    records: impl IntoIterator<Item = &'a JobRecord>,
) -> Result<SalaryHistogram> {
    let values = sorted_finite(records.into_iter().filter_map(|r| r.salary_max));

    let (lower_bound, upper_bound) = match (
        percentile(&values, LOWER_PERCENTILE),
        percentile(&values, UPPER_PERCENTILE),
    ) {
        (Some(lo), Some(hi)) => (lo, hi),
        _ => return Err(DashboardError::EmptySalaryData),
    };

    let retained: Vec<f64> = values
        .into_iter()
        .filter(|v| (lower_bound..=upper_bound).contains(v))
        .collect();

    let (lo, hi) = match (retained.first(), retained.last()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => (lower_bound, upper_bound),
    };

    let edges = equal_width_edges(lo, hi, SALARY_BINS);
    let mut counts = vec![0u64; SALARY_BINS];
    for v in &retained {
        if let Some(i) = bin_index(&edges, *v) {
            counts[i] += 1;
        }
    }

    Ok(SalaryHistogram {
        lower_bound,
        upper_bound,
        edges,
        counts,
    })
}
