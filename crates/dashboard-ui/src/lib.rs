//! Terminal UI layer for the job postings dashboard.
//!
//! Provides themes, the header and filter components, the four charts, the
//! listings table and the application event loop, all rendered with
//! [`ratatui`].

pub mod app;
pub mod charts;
pub mod components;
pub mod table_view;
pub mod themes;

pub use dashboard_core as core;
