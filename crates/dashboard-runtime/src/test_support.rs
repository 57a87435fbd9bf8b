use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use dashboard_core::error::{DashboardError, Result};
use dashboard_core::models::{FreshnessToken, JobRecord};
use dashboard_data::reader::JobSource;

/// In-memory [`JobSource`] that counts loads and can be told to fail.
#[derive(Default)]
pub struct MemorySource {
    records: Mutex<Vec<JobRecord>>,
    latest: Mutex<Option<String>>,
    pub loads: AtomicUsize,
    pub fail: AtomicBool,
}

impl MemorySource {
    pub fn with_records(n: usize) -> Self {
        let source = Self::default();
        source.set_records(n, "2024-01-01 00:00:00");
        source
    }

    /// Replace the contents with `n` records and mark them as written at
    /// `latest`.
    pub fn set_records(&self, n: usize, latest: &str) {
        let records = (0..n).map(|i| record(i % 28 + 1)).collect();
        *self.records.lock().unwrap() = records;
        *self.latest.lock().unwrap() = Some(latest.to_string());
    }

    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

pub fn record(day: usize) -> JobRecord {
    JobRecord {
        title: Some(format!("Job {day}")),
        company: None,
        location: Some("London".to_string()),
        contract_type: None,
        salary_min: None,
        salary_max: Some(40_000.0 + day as f64 * 1_000.0),
        skills: Some("{Rust,SQL}".to_string()),
        created: NaiveDateTime::parse_from_str(
            &format!("2024-01-{day:02} 12:00:00"),
            "%Y-%m-%d %H:%M:%S",
        )
        .unwrap(),
        timestamp: None,
    }
}

#[async_trait]
impl JobSource for MemorySource {
    async fn load_all(&self) -> Result<Vec<JobRecord>> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(offline());
        }
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(self.records.lock().unwrap().clone())
    }

    async fn freshness(&self) -> Result<FreshnessToken> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(offline());
        }
        Ok(FreshnessToken {
            row_count: self.records.lock().unwrap().len() as i64,
            latest: self.latest.lock().unwrap().clone(),
        })
    }
}

fn offline() -> DashboardError {
    DashboardError::Io(std::io::Error::other("source offline"))
}
