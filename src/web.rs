#![cfg(not(tarpaulin_include))]

use std::sync::Arc;

use sales_dashboard::app;
use sales_dashboard::cache::{TableCache, WorkbookSource};
use sales_dashboard::config::DashboardConfig;

/// Main entry point for the dashboard server
///
/// Reads `dashboard.toml` and `DASHBOARD_*` overrides, loads the workbook
/// once, then serves the dashboard. A workbook that cannot be loaded stops
/// the process before the listener is bound.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = DashboardConfig::load()?;
    let cache = Arc::new(TableCache::new(WorkbookSource::new(config.source.clone())));

    if let Err(e) = cache.get() {
        log::error!("cannot start dashboard: {}", e);
        std::process::exit(1);
    }

    app::run(&config, cache).await
}
