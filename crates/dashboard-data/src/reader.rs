//! PostgreSQL loading of job postings.
//!
//! Reads every row of the postings table in one query and converts it into
//! [`JobRecord`]s. Columns are cast to text/float on the database side so the
//! loader is independent of the exact column types (`text[]` vs `text` for
//! skills, `timestamp` vs `timestamptz` for dates, integer vs numeric
//! salaries).

use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashboard_core::error::{DashboardError, Result};
use dashboard_core::models::{FreshnessToken, JobRecord};
use dashboard_core::time_utils::parse_timestamp;
use regex::Regex;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{debug, info};

/// Maximum pooled connections. The dashboard issues one query at a time.
const MAX_CONNECTIONS: u32 = 2;

/// How long to wait for a free connection before failing the load.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

// ── JobSource ─────────────────────────────────────────────────────────────────

/// A source of job postings.
#[async_trait]
pub trait JobSource: Send + Sync {
    /// Read the complete record set.
    ///
    /// Fails as a whole when any row has an unparseable `created` or
    /// `timestamp` value.
    async fn load_all(&self) -> Result<Vec<JobRecord>>;

    /// Cheap token identifying the current contents of the source.
    async fn freshness(&self) -> Result<FreshnessToken>;
}

#[async_trait]
impl<T: JobSource + ?Sized> JobSource for Arc<T> {
    async fn load_all(&self) -> Result<Vec<JobRecord>> {
        (**self).load_all().await
    }

    async fn freshness(&self) -> Result<FreshnessToken> {
        (**self).freshness().await
    }
}

// ── Row conversion ────────────────────────────────────────────────────────────

/// One row as returned by the select query, before timestamp parsing.
#[derive(Debug, Clone, Default, sqlx::FromRow)]
pub struct JobRow {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub contract_type: Option<String>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub skills: Option<String>,
    pub created: Option<String>,
    pub timestamp: Option<String>,
}

impl JobRow {
    /// Parse the timestamp columns and build a [`JobRecord`].
    ///
    /// `created` is mandatory; `timestamp` may be null but must parse when
    /// present.
    pub fn into_record(self) -> Result<JobRecord> {
        let created_raw = self
            .created
            .ok_or(DashboardError::MissingTimestamp("created"))?;
        let created = parse_column("created", &created_raw)?;

        let timestamp = match self.timestamp.as_deref() {
            None => None,
            Some(s) if s.trim().is_empty() => None,
            Some(s) => Some(parse_column("timestamp", s)?),
        };

        Ok(JobRecord {
            title: self.title,
            company: self.company,
            location: self.location,
            contract_type: self.contract_type,
            salary_min: self.salary_min,
            salary_max: self.salary_max,
            skills: self.skills,
            created,
            timestamp,
        })
    }
}

fn parse_column(column: &'static str, value: &str) -> Result<chrono::NaiveDateTime> {
    parse_timestamp(value).ok_or_else(|| DashboardError::TimestampParse {
        column,
        value: value.to_string(),
    })
}

/// Convert every row, stopping at the first timestamp failure.
pub fn rows_into_records(rows: Vec<JobRow>) -> Result<Vec<JobRecord>> {
    rows.into_iter().map(JobRow::into_record).collect()
}

// ── SQL ───────────────────────────────────────────────────────────────────────

/// Validate a `table` or `schema.table` identifier.
///
/// The name is interpolated into SQL text, so only plain identifiers are
/// accepted.
pub fn validate_table_name(table: &str) -> Result<()> {
    static IDENT: OnceLock<Regex> = OnceLock::new();
    let re = IDENT.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)?$").expect("regex is valid")
    });
    if re.is_match(table) {
        Ok(())
    } else {
        Err(DashboardError::InvalidTableName(table.to_string()))
    }
}

/// Query reading every posting with uniform column types.
pub fn select_all_sql(table: &str) -> String {
    format!(
        r#"SELECT
    title::text AS title,
    company::text AS company,
    location::text AS location,
    contract_type::text AS contract_type,
    salary_min::float8 AS salary_min,
    salary_max::float8 AS salary_max,
    skills::text AS skills,
    created::text AS created,
    "timestamp"::text AS "timestamp"
FROM {table}"#
    )
}

/// Query returning the row count and the latest ingestion timestamp.
pub fn freshness_sql(table: &str) -> String {
    format!(r#"SELECT COUNT(*)::int8 AS row_count, MAX("timestamp")::text AS latest FROM {table}"#)
}

// ── PgJobSource ───────────────────────────────────────────────────────────────

/// Open a small connection pool for `db_url`.
pub async fn connect(db_url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(db_url)
        .await?;
    debug!("database pool ready");
    Ok(pool)
}

/// [`JobSource`] backed by a PostgreSQL table.
#[derive(Debug, Clone)]
pub struct PgJobSource {
    pool: PgPool,
    table: String,
    select_sql: String,
    freshness_sql: String,
}

impl PgJobSource {
    /// Create a source reading from `table`. Fails on an invalid table name.
    pub fn new(pool: PgPool, table: &str) -> Result<Self> {
        validate_table_name(table)?;
        Ok(Self {
            pool,
            table: table.to_string(),
            select_sql: select_all_sql(table),
            freshness_sql: freshness_sql(table),
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

#[async_trait]
impl JobSource for PgJobSource {
    async fn load_all(&self) -> Result<Vec<JobRecord>> {
        let started = Instant::now();
        let rows = sqlx::query_as::<_, JobRow>(&self.select_sql)
            .fetch_all(&self.pool)
            .await?;
        let row_count = rows.len();
        let records = rows_into_records(rows)?;
        info!(
            table = %self.table,
            rows = row_count,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "loaded job postings"
        );
        Ok(records)
    }

    async fn freshness(&self) -> Result<FreshnessToken> {
        let (row_count, latest) = sqlx::query_as::<_, (i64, Option<String>)>(&self.freshness_sql)
            .fetch_one(&self.pool)
            .await?;
        debug!(table = %self.table, row_count, ?latest, "freshness checked");
        Ok(FreshnessToken { row_count, latest })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
