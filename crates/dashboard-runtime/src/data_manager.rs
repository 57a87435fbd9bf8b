//! Freshness-keyed record cache.
//!
//! Wraps a [`JobSource`] with a time-to-live and a [`FreshnessToken`] check.
//! Callers use [`DataManager::get_records`] to obtain the current
//! [`Snapshot`]; within the TTL the cached snapshot is returned as-is, after
//! it the source's token is compared and the table is only re-read when the
//! token changed. A failed load leaves the previous snapshot in place.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use dashboard_core::error::{DashboardError, Result};
use dashboard_core::models::{FreshnessToken, JobRecord};
use dashboard_data::reader::JobSource;

// ── Defaults ──────────────────────────────────────────────────────────────────

/// Default cache TTL in seconds.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 30;

// ── Snapshot ──────────────────────────────────────────────────────────────────

/// One loaded version of the postings table.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub records: Arc<Vec<JobRecord>>,
    /// Token the records were loaded under.
    pub token: FreshnessToken,
    /// Wall-clock time the load completed.
    pub loaded_at: DateTime<Utc>,
    /// Seconds spent reading the table.
    pub load_time_seconds: f64,
}

// ── DataManager ───────────────────────────────────────────────────────────────

/// TTL- and token-cached wrapper around a [`JobSource`].
///
/// # Example
/// ```no_run
/// # async fn demo(source: dashboard_data::reader::PgJobSource) -> dashboard_core::error::Result<()> {
/// use dashboard_runtime::data_manager::DataManager;
///
/// let mut mgr = DataManager::new(source, 30);
/// let snapshot = mgr.get_records(false).await?;
/// println!("{} postings", snapshot.records.len());
/// # Ok(())
/// # }
/// ```
pub struct DataManager<S> {
    source: S,
    /// Maximum age of the cache before the token is re-checked.
    cache_ttl: Duration,
    cache: Option<Snapshot>,
    /// When the cache was last populated or confirmed unchanged.
    cache_timestamp: Option<Instant>,
    last_error: Option<String>,
}

impl<S: JobSource> DataManager<S> {
    pub fn new(source: S, cache_ttl_secs: u64) -> Self {
        Self {
            source,
            cache_ttl: Duration::from_secs(cache_ttl_secs),
            cache: None,
            cache_timestamp: None,
            last_error: None,
        }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Return the current snapshot, reloading when needed.
    ///
    /// With `force` the table is always re-read. Errors are recorded in
    /// [`last_error`](Self::last_error) and returned; the cached snapshot is
    /// kept for later calls.
    pub async fn get_records(&mut self, force: bool) -> Result<&Snapshot> {
        if force || !self.is_cache_valid() {
            if let Err(e) = self.refresh(force).await {
                tracing::warn!(error = %e, "record load failed; keeping previous snapshot");
                self.last_error = Some(e.to_string());
                return Err(e);
            }
            self.last_error = None;
        } else {
            tracing::debug!("returning cached records");
        }
        self.cache.as_ref().ok_or(DashboardError::EmptyDataset)
    }

    /// The cached snapshot, if any, without touching the source.
    pub fn cached(&self) -> Option<&Snapshot> {
        self.cache.as_ref()
    }

    /// Discard the current cache, forcing the next call to reload.
    pub fn invalidate_cache(&mut self) {
        self.cache = None;
        self.cache_timestamp = None;
        tracing::debug!("cache invalidated");
    }

    /// Age of the current cache entry, or `None` if nothing is cached.
    pub fn cache_age(&self) -> Option<Duration> {
        self.cache_timestamp.map(|ts| ts.elapsed())
    }

    /// Text of the last load error, cleared by the next success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    // ── Private helpers ───────────────────────────────────────────────────

    fn is_cache_valid(&self) -> bool {
        match (self.cache.as_ref(), self.cache_timestamp) {
            (Some(_), Some(ts)) => ts.elapsed() < self.cache_ttl,
            _ => false,
        }
    }

    async fn refresh(&mut self, force: bool) -> Result<()> {
        let token = self.source.freshness().await?;

        if !force {
            if let Some(cached) = &self.cache {
                if cached.token == token {
                    tracing::debug!(rows = token.row_count, "source unchanged");
                    self.cache_timestamp = Some(Instant::now());
                    return Ok(());
                }
            }
        }

        let started = Instant::now();
        let records = self.source.load_all().await?;
        let load_time_seconds = started.elapsed().as_secs_f64();
        tracing::debug!(
            records = records.len(),
            rows = token.row_count,
            load_time_seconds,
            "record cache updated"
        );

        self.cache = Some(Snapshot {
            records: Arc::new(records),
            token,
            loaded_at: Utc::now(),
            load_time_seconds,
        });
        self.cache_timestamp = Some(Instant::now());
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MemorySource;
    use std::sync::atomic::Ordering;

    fn make_manager(ttl_secs: u64) -> (DataManager<Arc<MemorySource>>, Arc<MemorySource>) {
        let source = Arc::new(MemorySource::with_records(3));
        (DataManager::new(Arc::clone(&source), ttl_secs), source)
    }

    #[tokio::test]
    async fn test_cache_miss_on_first_call() {
        let (mut mgr, source) = make_manager(30);
        assert!(mgr.cache_age().is_none());
        assert!(mgr.cached().is_none());

        let snapshot = mgr.get_records(false).await.unwrap();
        assert_eq!(snapshot.records.len(), 3);
        assert_eq!(snapshot.token.row_count, 3);
        assert_eq!(source.load_count(), 1);
    }

    #[tokio::test]
    async fn test_cache_valid_within_ttl() {
        let (mut mgr, source) = make_manager(30);
        mgr.get_records(false).await.unwrap();

        source.set_records(5, "2024-02-01 00:00:00");
        let snapshot = mgr.get_records(false).await.unwrap();

        assert_eq!(snapshot.records.len(), 3);
        assert_eq!(source.load_count(), 1);
        assert!(mgr.cache_age().unwrap() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_expired_cache_with_same_token_skips_reload() {
        let (mut mgr, source) = make_manager(0);
        mgr.get_records(false).await.unwrap();
        mgr.get_records(false).await.unwrap();
        assert_eq!(source.load_count(), 1);
    }

    #[tokio::test]
    async fn test_expired_cache_with_new_token_reloads() {
        let (mut mgr, source) = make_manager(0);
        mgr.get_records(false).await.unwrap();

        source.set_records(7, "2024-02-01 00:00:00");
        let snapshot = mgr.get_records(false).await.unwrap();

        assert_eq!(snapshot.records.len(), 7);
        assert_eq!(snapshot.token.latest.as_deref(), Some("2024-02-01 00:00:00"));
        assert_eq!(source.load_count(), 2);
    }

    #[tokio::test]
    async fn test_force_always_reloads() {
        let (mut mgr, source) = make_manager(60);
        mgr.get_records(false).await.unwrap();
        mgr.get_records(true).await.unwrap();
        assert_eq!(source.load_count(), 2);
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_snapshot() {
        let (mut mgr, source) = make_manager(0);
        mgr.get_records(false).await.unwrap();

        source.fail.store(true, Ordering::SeqCst);
        assert!(mgr.get_records(true).await.is_err());
        assert_eq!(mgr.last_error(), Some("source offline"));
        assert_eq!(mgr.cached().map(|s| s.records.len()), Some(3));

        source.fail.store(false, Ordering::SeqCst);
        mgr.get_records(true).await.unwrap();
        assert!(mgr.last_error().is_none());
    }

    #[tokio::test]
    async fn test_failure_without_cache() {
        let (mut mgr, source) = make_manager(30);
        source.fail.store(true, Ordering::SeqCst);
        assert!(mgr.get_records(false).await.is_err());
        assert!(mgr.cached().is_none());
        assert_eq!(source.load_count(), 0);
    }

    #[tokio::test]
    async fn test_invalidate_cache() {
        let (mut mgr, source) = make_manager(30);
        mgr.get_records(false).await.unwrap();

        mgr.invalidate_cache();
        assert!(mgr.cached().is_none());
        assert!(mgr.cache_age().is_none());

        mgr.get_records(false).await.unwrap();
        assert_eq!(source.load_count(), 2);
    }
}
