//! Dashboard pipeline: filter the loaded records and compute every view.
//!
//! All views are pure functions of the filtered set, so the pipeline is
//! re-run from scratch whenever the filter or the underlying records change.

use std::time::Instant;

use dashboard_core::error::{DashboardError, Result};
use dashboard_core::models::{
    DateFilter, DisplayRow, FilterRequest, JobRecord, LocationCount, SalaryHistogram, SkillCount,
    TimeBucket,
};
use tracing::{debug, warn};

use crate::aggregator::JobAggregator;
use crate::filter::{filter_records, resolve_filter};
use crate::projection::display_rows;
use crate::salary::salary_histogram;

// ── Public types ──────────────────────────────────────────────────────────────

/// Everything the dashboard renders for one filter.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DashboardViews {
    /// Filter the views were computed for.
    pub filter: DateFilter,
    /// Size of the unfiltered record set.
    pub total_records: usize,
    /// Size of the filtered set.
    pub filtered_count: usize,
    pub top_skills: Vec<SkillCount>,
    pub jobs_over_time: Vec<TimeBucket>,
    /// `None` when the filtered set has no salary data.
    pub salary: Option<SalaryHistogram>,
    pub top_locations: Vec<LocationCount>,
    pub rows: Vec<DisplayRow>,
    /// Wall-clock seconds spent computing the views.
    pub compute_time_seconds: f64,
}

impl DashboardViews {
    pub fn is_empty(&self) -> bool {
        self.filtered_count == 0
    }
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Compute all views of `records` under `filter`.
///
/// A filtered set without salaries yields `salary: None`; every other view
/// tolerates an empty set.
pub fn build_views(records: &[JobRecord], filter: DateFilter) -> DashboardViews {
    let started = Instant::now();
    let filtered = filter_records(records, &filter);

    let salary = match salary_histogram(filtered.iter().copied()) {
        Ok(hist) => Some(hist),
        Err(DashboardError::EmptySalaryData) => {
            debug!(%filter, "no salary data, histogram skipped");
            None
        }
        Err(e) => {
            warn!(%filter, error = %e, "salary histogram failed");
            None
        }
    };

    let views = DashboardViews {
        filter,
        total_records: records.len(),
        filtered_count: filtered.len(),
        top_skills: JobAggregator::top_skills(filtered.iter().copied()),
        jobs_over_time: JobAggregator::jobs_over_time(filtered.iter().copied(), filter.mode()),
        salary,
        top_locations: JobAggregator::top_locations(filtered.iter().copied()),
        rows: display_rows(filtered.iter().copied()),
        compute_time_seconds: started.elapsed().as_secs_f64(),
    };

    debug!(
        %filter,
        total = views.total_records,
        filtered = views.filtered_count,
        "views computed"
    );
    views
}

/// Resolve `request` against `records`, then compute the views.
pub fn analyze(records: &[JobRecord], request: FilterRequest) -> Result<DashboardViews> {
    let filter = resolve_filter(request, records)?;
    Ok(build_views(records, filter))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use dashboard_core::models::FilterMode;

    fn rec(created: &str, skills: &str, location: &str, salary_max: Option<f64>) -> JobRecord {
        JobRecord {
            title: Some("Engineer".to_string()),
            company: Some("Acme".to_string()),
            location: Some(location.to_string()),
            contract_type: None,
            salary_min: None,
            salary_max,
            skills: Some(skills.to_string()),
            created: NaiveDateTime::parse_from_str(created, "%Y-%m-%d %H:%M:%S").unwrap(),
            timestamp: None,
        }
    }

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sample() -> Vec<JobRecord> {
        vec![
            rec("2024-01-01 09:00:00", "{A,B}", "London", Some(50_000.0)),
            rec("2024-01-01 15:00:00", "{B,C}", "Leeds", Some(60_000.0)),
            rec("2024-01-03 11:00:00", "{C}", "London", None),
            rec("2024-01-08 11:00:00", "{Z}", "York", Some(90_000.0)),
        ]
    }

    #[test]
    fn test_build_views_range() {
        let records = sample();
        let filter = DateFilter::Range {
            start: d("2024-01-01"),
            end: d("2024-01-03"),
        };
        let views = build_views(&records, filter);

        assert_eq!(views.total_records, 4);
        assert_eq!(views.filtered_count, 3);
        assert_eq!(views.rows.len(), 3);
        assert_eq!(views.top_skills[0].skill, "B");
        assert_eq!(views.top_skills[1].skill, "C");
        assert_eq!(views.jobs_over_time.len(), 2);
        assert_eq!(views.top_locations[0].location, "London");
        assert_eq!(views.salary.as_ref().map(|h| h.counts.len()), Some(10));
    }

    #[test]
    fn test_build_views_single_day_hour_buckets() {
        let records = sample();
        let views = build_views(&records, DateFilter::SingleDay(d("2024-01-01")));
        let labels: Vec<_> = views.jobs_over_time.iter().map(|b| b.key.label()).collect();
        assert_eq!(labels, vec!["09:00", "15:00"]);
    }

    #[test]
    fn test_build_views_without_salaries_skips_histogram() {
        let records = sample();
        let views = build_views(&records, DateFilter::SingleDay(d("2024-01-03")));
        assert_eq!(views.filtered_count, 1);
        assert!(views.salary.is_none());
        assert_eq!(views.top_skills.len(), 1);
    }

    #[test]
    fn test_build_views_empty_selection() {
        let records = sample();
        let views = build_views(
            &records,
            DateFilter::Range {
                start: d("2024-02-01"),
                end: d("2024-01-01"),
            },
        );
        assert!(views.is_empty());
        assert!(views.top_skills.is_empty());
        assert!(views.jobs_over_time.is_empty());
        assert!(views.top_locations.is_empty());
        assert!(views.rows.is_empty());
        assert!(views.salary.is_none());
    }

    #[test]
    fn test_analyze_uses_record_defaults() {
        let records = sample();
        let views = analyze(&records, FilterRequest::defaults(FilterMode::Range)).unwrap();
        assert_eq!(
            views.filter,
            DateFilter::Range {
                start: d("2024-01-01"),
                end: d("2024-01-08"),
            }
        );
        assert_eq!(views.filtered_count, 4);
    }

    #[test]
    fn test_analyze_empty_dataset() {
        assert!(matches!(
            analyze(&[], FilterRequest::default()),
            Err(DashboardError::EmptyDataset)
        ));
    }
}
