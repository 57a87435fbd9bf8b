//! Date filtering of job records by their `created` calendar day.

use chrono::NaiveDate;
use dashboard_core::error::{DashboardError, Result};
use dashboard_core::models::{DateFilter, FilterMode, FilterRequest, JobRecord};

/// Records whose `created` day satisfies `filter`, in input order.
///
/// An inverted range (`start > end`) selects nothing.
pub fn filter_records<'a>(records: &'a [JobRecord], filter: &DateFilter) -> Vec<&'a JobRecord> {
    records.iter().filter(|r| filter.matches(r.created)).collect()
}

/// Earliest and latest `created` day over all records.
pub fn created_bounds(records: &[JobRecord]) -> Option<(NaiveDate, NaiveDate)> {
    let mut days = records.iter().map(JobRecord::created_date);
    let first = days.next()?;
    Some(days.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
}

/// Default range filter: `[min(created), max(created)]`.
pub fn default_range(records: &[JobRecord]) -> Option<DateFilter> {
    created_bounds(records).map(|(start, end)| DateFilter::Range { start, end })
}

/// Default single-day filter: the earliest `created` day.
pub fn default_day(records: &[JobRecord]) -> Option<DateFilter> {
    created_bounds(records).map(|(start, _)| DateFilter::SingleDay(start))
}

/// Turn a [`FilterRequest`] into a concrete [`DateFilter`].
///
/// Bounds the caller supplied are kept as-is; missing ones are filled from
/// the record set. A request that needs a default on an empty record set
/// fails with [`DashboardError::EmptyDataset`].
pub fn resolve_filter(request: FilterRequest, records: &[JobRecord]) -> Result<DateFilter> {
    let mode = request.mode.unwrap_or(FilterMode::Range);
    let bounds = created_bounds(records);
    let need = |explicit: Option<NaiveDate>, pick: fn((NaiveDate, NaiveDate)) -> NaiveDate| {
        explicit
            .or_else(|| bounds.map(pick))
            .ok_or(DashboardError::EmptyDataset)
    };

    match mode {
        FilterMode::Range => Ok(DateFilter::Range {
            start: need(request.start, |(lo, _)| lo)?,
            end: need(request.end, |(_, hi)| hi)?,
        }),
        FilterMode::Single => Ok(DateFilter::SingleDay(need(request.day, |(lo, _)| lo)?)),
    }
}
