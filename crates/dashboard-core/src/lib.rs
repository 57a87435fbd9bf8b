//! Shared types for the job postings dashboard.
//!
//! Holds the record and view models, the error type, CLI settings, number
//! formatting, and the small parsing/statistics helpers every other crate
//! builds on.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod skills;
pub mod stats;
pub mod time_utils;
