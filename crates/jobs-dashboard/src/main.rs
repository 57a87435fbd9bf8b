mod bootstrap;

use anyhow::Result;
use dashboard_core::error::DashboardError;
use dashboard_core::settings::Settings;
use dashboard_data::reader::{self, PgJobSource};
use dashboard_runtime::orchestrator::DashboardOrchestrator;
use dashboard_ui::app::App;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; DB_URL may come from the environment.
    dotenvy::dotenv().ok();

    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("Jobs Dashboard v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Table: {}, Filter: {}, Theme: {}, Refresh: {}s",
        settings.table,
        settings.filter,
        settings.theme,
        settings.refresh_rate
    );

    let db_url = settings.db_url.as_deref().ok_or_else(|| {
        DashboardError::Config("no database URL; pass --db-url or set DB_URL".to_string())
    })?;

    reader::validate_table_name(&settings.table)?;
    let pool = reader::connect(db_url).await?;
    let source = PgJobSource::new(pool, &settings.table)?;

    let orchestrator = DashboardOrchestrator::new(
        u64::from(settings.refresh_rate),
        settings.cache_ttl,
        source,
    );
    let (rx, handle) = orchestrator.start();

    let app = App::new(&settings.theme, settings.filter_request())
        .with_refresh_sender(handle.refresh_sender());

    // The TUI exits on 'q' / Ctrl+C itself; the OS-level handler covers
    // signals delivered while raw mode swallows them.
    tokio::select! {
        result = app.run(rx) => {
            handle.abort();
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Ctrl+C received; shutting down refresh task");
            handle.abort();
        }
    }

    tracing::info!("Jobs Dashboard stopped");
    Ok(())
}
