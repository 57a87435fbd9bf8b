use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const APP_DIR: &str = ".jobs-dashboard";
const LOG_FILE_NAME: &str = "dashboard.log";

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Root of the dashboard's per-user state, `~/.jobs-dashboard/`.
pub fn app_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Ensure the standard `~/.jobs-dashboard/` directory hierarchy exists.
///
/// Creates the following directories if absent (including any missing parents):
/// - `~/.jobs-dashboard/`
/// - `~/.jobs-dashboard/logs/`
/// - `~/.jobs-dashboard/cache/`
pub fn ensure_directories() -> anyhow::Result<()> {
    ensure_directories_in(&app_dir())
}

fn ensure_directories_in(root: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(root)?;
    std::fs::create_dir_all(root.join("logs"))?;
    std::fs::create_dir_all(root.join("cache"))?;
    Ok(())
}

/// Default log destination, `~/.jobs-dashboard/logs/dashboard.log`.
pub fn default_log_file() -> PathBuf {
    app_dir().join("logs").join(LOG_FILE_NAME)
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a `--log-level` name to an [`EnvFilter`] directive.
///
/// Unknown names are passed through so `RUST_LOG`-style directives such as
/// `dashboard_data=debug` also work.
fn level_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        _ => log_level.to_string(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// The TUI owns stdout and stderr, so events are appended to `log_file`
/// (or [`default_log_file`]) without ANSI colours. Falls back to `"info"`
/// if the level string is not a valid filter.
pub fn setup_logging(log_level: &str, log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    let path = log_file.cloned().unwrap_or_else(default_log_file);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let filter =
        EnvFilter::try_new(level_directive(log_level)).unwrap_or_else(|_| EnvFilter::new("info"));

    let layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .with_thread_ids(false);

    tracing_subscriber::registry().with(filter).with(layer).init();

    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
