//! Data loading and analysis layer for the job postings dashboard.
//!
//! Reads the postings table from PostgreSQL, applies the date filter, and
//! derives the chart and table views from the filtered set.

pub mod aggregator;
pub mod analysis;
pub mod filter;
pub mod projection;
pub mod reader;
pub mod salary;
