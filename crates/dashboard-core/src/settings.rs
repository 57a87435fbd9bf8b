use chrono::NaiveDate;
use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::models::{FilterMode, FilterRequest};
use crate::time_utils::parse_date;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Interactive terminal dashboard for job postings
#[derive(Parser, Debug, Clone)]
#[command(
    name = "jobs-dashboard",
    about = "Interactive terminal dashboard for job postings",
    version
)]
pub struct Settings {
    /// PostgreSQL connection string
    #[arg(long, env = "DB_URL", hide_env_values = true)]
    pub db_url: Option<String>,

    /// Table holding the job postings (`table` or `schema.table`)
    #[arg(long, default_value = "dev.jobs")]
    pub table: String,

    /// Initial date filter mode
    #[arg(long, default_value = "range", value_parser = ["range", "single"])]
    pub filter: String,

    /// First day of the date range (defaults to the earliest posting)
    #[arg(long, value_parser = parse_date)]
    pub start: Option<NaiveDate>,

    /// Last day of the date range (defaults to the latest posting)
    #[arg(long, value_parser = parse_date)]
    pub end: Option<NaiveDate>,

    /// Day shown in single-date mode (defaults to the earliest posting)
    #[arg(long, value_parser = parse_date)]
    pub day: Option<NaiveDate>,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Seconds between freshness checks against the database (5-3600)
    #[arg(long, default_value = "60", value_parser = clap::value_parser!(u32).range(5..=3600))]
    pub refresh_rate: u32,

    /// Seconds a loaded snapshot is trusted before re-checking freshness
    #[arg(long, default_value = "30")]
    pub cache_ttl: u64,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path (defaults to ~/.jobs-dashboard/logs/dashboard.log)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.jobs-dashboard/last_used.json`.
///
/// Connection strings and explicit dates are never persisted.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_rate: Option<u32>,
}

impl LastUsedParams {
    /// Return the default path to the persisted config file.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &std::path::Path) -> PathBuf {
        base_dir.join(".jobs-dashboard").join("last_used.json")
    }

    /// Load persisted params from an explicit path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load_from(path: &std::path::Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match serde_json::from_str(&content) {
            Ok(params) => params,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable last-used config");
                Self::default()
            }
        }
    }

    /// Atomically write params to an explicit path.
    pub fn save_to(&self, path: &std::path::Path) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;

        // Write to a temp file then rename for atomicity.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at an explicit path if it exists.
    pub fn clear_at(path: &std::path::Path) -> crate::error::Result<()> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, merge with last-used params where no explicit CLI
    /// value was provided, and persist the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Full implementation – accepts args and an explicit config path so that
    /// tests can redirect to a temporary directory.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &std::path::Path,
    ) -> Self {
        // Raw ArgMatches are needed to query ValueSource.
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            if let Err(e) = LastUsedParams::clear_at(config_path) {
                tracing::warn!(error = %e, "failed to clear last-used config");
            }
            return Self::apply_overrides(settings);
        }

        let last = LastUsedParams::load_from(config_path);

        // CLI always wins over persisted values.
        if !is_arg_explicitly_set(&matches, "theme") {
            if let Some(v) = last.theme {
                settings.theme = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "filter") {
            if let Some(v) = last.filter {
                settings.filter = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "table") {
            if let Some(v) = last.table {
                settings.table = v;
            }
        }
        // NOTE: clap stores the arg id using the *field name* (underscores),
        // not the long-flag spelling (hyphens).
        if !is_arg_explicitly_set(&matches, "refresh_rate") {
            if let Some(v) = last.refresh_rate {
                settings.refresh_rate = v;
            }
        }

        settings = Self::apply_overrides(settings);

        if let Err(e) = LastUsedParams::from(&settings).save_to(config_path) {
            tracing::warn!(error = %e, "failed to persist last-used config");
        }

        settings
    }

    /// Filter mode selected on the command line or restored from last run.
    pub fn filter_mode(&self) -> FilterMode {
        FilterMode::from_name(&self.filter)
    }

    /// Initial filter request; unset bounds are filled from the data.
    pub fn filter_request(&self) -> FilterRequest {
        FilterRequest {
            mode: Some(self.filter_mode()),
            start: self.start,
            end: self.end,
            day: self.day,
        }
    }

    /// Apply flags that override other values (`--debug`).
    fn apply_overrides(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            theme: Some(s.theme.clone()),
            filter: Some(s.filter.clone()),
            table: Some(s.table.clone()),
            refresh_rate: Some(s.refresh_rate),
        }
    }
}

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
