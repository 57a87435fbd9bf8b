//! Background refresh task.
//!
//! Runs a [`DataManager`] inside a tokio task and forwards new snapshots
//! through an `mpsc` channel so the TUI event loop can consume them without
//! shared mutable state. Explicit reload requests travel the other way on a
//! small control channel.

use std::time::Duration;

use dashboard_core::models::FreshnessToken;
use dashboard_data::reader::JobSource;
use tokio::sync::mpsc;
use tokio::time::{self, MissedTickBehavior};

use crate::data_manager::{DataManager, Snapshot};

/// Snapshots buffered before the refresh loop waits on the consumer.
const UPDATE_BUFFER: usize = 16;

/// Pending reload requests; extra key presses are dropped while full.
const REFRESH_BUFFER: usize = 4;

// ── Public types ──────────────────────────────────────────────────────────────

/// Message sent from the refresh task to the UI.
#[derive(Debug, Clone)]
pub enum DashboardUpdate {
    /// Newly loaded records.
    Snapshot(Snapshot),
    /// A load failed; the UI keeps showing the previous snapshot.
    LoadFailed(String),
}

// ── DashboardOrchestrator ─────────────────────────────────────────────────────

/// Periodic loader feeding the dashboard.
///
/// Call [`DashboardOrchestrator::start`] to spawn the loop and receive the
/// update channel.
pub struct DashboardOrchestrator<S> {
    update_interval: Duration,
    cache_ttl_secs: u64,
    source: S,
}

impl<S: JobSource + 'static> DashboardOrchestrator<S> {
    /// # Parameters
    /// - `update_interval_secs` – seconds between freshness checks.
    /// - `cache_ttl_secs`       – TTL forwarded to the [`DataManager`].
    /// - `source`               – where the postings come from.
    pub fn new(update_interval_secs: u64, cache_ttl_secs: u64, source: S) -> Self {
        Self {
            update_interval: Duration::from_secs(update_interval_secs.max(1)),
            cache_ttl_secs,
            source,
        }
    }

    /// Spawn the refresh loop.
    ///
    /// The first load happens immediately. The loop ends when the update
    /// receiver or the returned handle is dropped.
    pub fn start(self) -> (mpsc::Receiver<DashboardUpdate>, DashboardHandle) {
        let (tx, rx) = mpsc::channel(UPDATE_BUFFER);
        let (refresh_tx, refresh_rx) = mpsc::channel(REFRESH_BUFFER);

        let handle = tokio::spawn(async move {
            self.refresh_loop(tx, refresh_rx).await;
        });

        (rx, DashboardHandle { handle, refresh_tx })
    }

    // ── Private implementation ────────────────────────────────────────────

    async fn refresh_loop(
        self,
        tx: mpsc::Sender<DashboardUpdate>,
        mut refresh_rx: mpsc::Receiver<()>,
    ) {
        let mut manager = DataManager::new(self.source, self.cache_ttl_secs);
        let mut last_sent: Option<FreshnessToken> = None;

        fetch_and_send(&mut manager, &tx, &mut last_sent, true).await;

        let mut interval = time::interval(self.update_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick fires immediately; the initial load already ran.
        interval.tick().await;

        loop {
            let force = tokio::select! {
                _ = interval.tick() => false,
                request = refresh_rx.recv() => match request {
                    Some(()) => true,
                    None => {
                        tracing::debug!("refresh handle dropped; exiting loop");
                        break;
                    }
                },
            };

            if tx.is_closed() {
                tracing::debug!("update channel closed; exiting loop");
                break;
            }

            fetch_and_send(&mut manager, &tx, &mut last_sent, force).await;
        }
    }
}

/// Load through the cache and forward the result.
///
/// A snapshot is only sent when its token differs from the last one sent,
/// or when the load was forced. A failure clears the last sent token so the
/// first successful load afterwards is always forwarded.
async fn fetch_and_send<S: JobSource>(
    manager: &mut DataManager<S>,
    tx: &mpsc::Sender<DashboardUpdate>,
    last_sent: &mut Option<FreshnessToken>,
    force: bool,
) {
    let update = match manager.get_records(force).await {
        Ok(snapshot) => {
            if !force && last_sent.as_ref() == Some(&snapshot.token) {
                tracing::debug!("records unchanged; nothing to send");
                return;
            }
            *last_sent = Some(snapshot.token.clone());
            DashboardUpdate::Snapshot(snapshot.clone())
        }
        Err(e) => {
            *last_sent = None;
            DashboardUpdate::LoadFailed(e.to_string())
        }
    };

    if let Err(e) = tx.send(update).await {
        tracing::warn!(error = %e, "failed to send dashboard update; receiver dropped");
    }
}

// ── DashboardHandle ───────────────────────────────────────────────────────────

/// Handle to the background refresh task.
pub struct DashboardHandle {
    handle: tokio::task::JoinHandle<()>,
    refresh_tx: mpsc::Sender<()>,
}

impl DashboardHandle {
    /// Ask for an immediate forced reload. Returns `false` when a request is
    /// already pending or the loop has stopped.
    pub fn request_refresh(&self) -> bool {
        self.refresh_tx.try_send(()).is_ok()
    }

    /// Sender for reload requests, for components that outlive a borrow of
    /// the handle.
    pub fn refresh_sender(&self) -> mpsc::Sender<()> {
        self.refresh_tx.clone()
    }

    /// Immediately abort the refresh loop.
    pub fn abort(&self) {
        self.handle.abort();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
