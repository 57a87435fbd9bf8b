//! Runtime layer for the job postings dashboard.
//!
//! Owns the freshness-keyed record cache and the background refresh task
//! that feeds snapshots to the terminal UI.

pub mod data_manager;
pub mod orchestrator;

#[cfg(test)]
mod test_support;

pub use dashboard_core as core;
pub use dashboard_data as data;
