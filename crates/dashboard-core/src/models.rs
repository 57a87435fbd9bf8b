use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One row of the job postings table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub contract_type: Option<String>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    /// Raw skills literal as stored, e.g. `{Python,SQL}` or `['Go', 'Rust']`.
    pub skills: Option<String>,
    /// Moment the posting was created (naive UTC). Drives every date filter.
    pub created: NaiveDateTime,
    /// Ingestion time of the row. Kept for completeness and freshness checks.
    pub timestamp: Option<NaiveDateTime>,
}

impl JobRecord {
    /// Calendar day of `created`.
    pub fn created_date(&self) -> NaiveDate {
        self.created.date()
    }

    /// Hour of day (0–23) of `created`.
    pub fn created_hour(&self) -> u32 {
        self.created.hour()
    }
}

// ── Filters ───────────────────────────────────────────────────────────────────

/// Which kind of date filter is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Inclusive `[start, end]` range of calendar days.
    Range,
    /// Exactly one calendar day.
    Single,
}

impl FilterMode {
    /// Parse the CLI spelling (`"range"` / `"single"`). Unknown names fall
    /// back to [`FilterMode::Range`].
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "single" | "single-date" | "day" => FilterMode::Single,
            _ => FilterMode::Range,
        }
    }

    /// Name as used on the command line and in the persisted config.
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterMode::Range => "range",
            FilterMode::Single => "single",
        }
    }

    /// Label shown in the filter controls.
    pub fn label(&self) -> &'static str {
        match self {
            FilterMode::Range => "Date Range",
            FilterMode::Single => "Single Date",
        }
    }

    /// The other mode.
    pub fn toggled(&self) -> Self {
        match self {
            FilterMode::Range => FilterMode::Single,
            FilterMode::Single => FilterMode::Range,
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A concrete date filter applied to the `created` day of each record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateFilter {
    /// Inclusive on both ends. `start > end` selects nothing.
    Range { start: NaiveDate, end: NaiveDate },
    SingleDay(NaiveDate),
}

impl DateFilter {
    pub fn mode(&self) -> FilterMode {
        match self {
            DateFilter::Range { .. } => FilterMode::Range,
            DateFilter::SingleDay(_) => FilterMode::Single,
        }
    }

    /// `true` when the calendar day of `created` satisfies the filter.
    pub fn matches(&self, created: NaiveDateTime) -> bool {
        let day = created.date();
        match *self {
            DateFilter::Range { start, end } => start <= day && day <= end,
            DateFilter::SingleDay(d) => day == d,
        }
    }

    /// Move the range start (or the single day) by `days`.
    pub fn shift_start(self, days: i64) -> Self {
        match self {
            DateFilter::Range { start, end } => DateFilter::Range {
                start: shift_date(start, days),
                end,
            },
            DateFilter::SingleDay(d) => DateFilter::SingleDay(shift_date(d, days)),
        }
    }

    /// Move the range end (or the single day) by `days`.
    pub fn shift_end(self, days: i64) -> Self {
        match self {
            DateFilter::Range { start, end } => DateFilter::Range {
                start,
                end: shift_date(end, days),
            },
            DateFilter::SingleDay(d) => DateFilter::SingleDay(shift_date(d, days)),
        }
    }
}

impl fmt::Display for DateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateFilter::Range { start, end } => write!(f, "{} → {}", start, end),
            DateFilter::SingleDay(d) => write!(f, "{}", d),
        }
    }
}

fn shift_date(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_add_signed(Duration::days(days)).unwrap_or(date)
}

/// Caller-supplied filter parameters; missing bounds are filled from the
/// loaded records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterRequest {
    pub mode: Option<FilterMode>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub day: Option<NaiveDate>,
}

impl FilterRequest {
    /// Request the record-derived defaults for `mode`.
    pub fn defaults(mode: FilterMode) -> Self {
        Self {
            mode: Some(mode),
            ..Self::default()
        }
    }
}

// ── Aggregate views ───────────────────────────────────────────────────────────

/// One row of the "Top 20 Skills" view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillCount {
    pub skill: String,
    pub count: u64,
}

/// One row of the "Top Locations" view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationCount {
    pub location: String,
    pub count: u64,
}

/// Bucket key of the jobs-over-time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimeBucketKey {
    Day(NaiveDate),
    /// Hour of day, 0–23.
    Hour(u32),
}

impl TimeBucketKey {
    /// `YYYY-MM-DD` for days, `HH:00` for hours.
    pub fn label(&self) -> String {
        match self {
            TimeBucketKey::Day(d) => d.format("%Y-%m-%d").to_string(),
            TimeBucketKey::Hour(h) => format!("{:02}:00", h),
        }
    }

    /// Short axis label: `MM-DD` for days, `HH:00` for hours.
    pub fn short_label(&self) -> String {
        match self {
            TimeBucketKey::Day(d) => format!("{:02}-{:02}", d.month(), d.day()),
            TimeBucketKey::Hour(h) => format!("{:02}:00", h),
        }
    }

    /// Position on a time axis: days since `origin` for day buckets, the
    /// hour itself for hour buckets.
    pub fn axis_position(&self, origin: &TimeBucketKey) -> i64 {
        match (self, origin) {
            (TimeBucketKey::Day(d), TimeBucketKey::Day(o)) => (*d - *o).num_days(),
            (TimeBucketKey::Hour(h), _) => i64::from(*h),
            (TimeBucketKey::Day(_), TimeBucketKey::Hour(_)) => 0,
        }
    }

    /// Inverse of [`axis_position`](Self::axis_position) for the same origin.
    pub fn at_axis_position(origin: &TimeBucketKey, position: i64) -> TimeBucketKey {
        match origin {
            TimeBucketKey::Day(o) => TimeBucketKey::Day(shift_date(*o, position)),
            TimeBucketKey::Hour(_) => TimeBucketKey::Hour(position.clamp(0, 23) as u32),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBucket {
    pub key: TimeBucketKey,
    pub count: u64,
}

/// Ten-bin histogram of `salary_max` restricted to the `[p5, p95]` range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryHistogram {
    /// 5th percentile of the non-null `salary_max` values.
    pub lower_bound: f64,
    /// 95th percentile of the non-null `salary_max` values.
    pub upper_bound: f64,
    /// `bins + 1` ascending edges.
    pub edges: Vec<f64>,
    /// One count per bin.
    pub counts: Vec<u64>,
}

impl SalaryHistogram {
    /// Number of values that fell inside the trimmed range.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// `(lower_edge, upper_edge, count)` per bin.
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, u64)> + '_ {
        self.edges
            .windows(2)
            .zip(self.counts.iter())
            .map(|(w, &c)| (w[0], w[1], c))
    }
}

/// Display-ready projection of one filtered record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayRow {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub contract_type: Option<String>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    /// Skills as plain text, e.g. `Python, SQL, Go`.
    pub skills: String,
}

/// Identifies one loaded version of the source table.
///
/// Two loads with equal tokens are assumed to have read identical data.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FreshnessToken {
    pub row_count: i64,
    /// Most recent `timestamp` value, as returned by the database.
    pub latest: Option<String>,
}

// ── Tests ─────────────────────────────────────────────────────────────────────
