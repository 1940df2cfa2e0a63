//! Back-office demo
//!
//! Runs a scripted list-screen session (search, filter, sort, paginate,
//! select, bulk delete) against in-memory leads, contracts and service orders.

mod demo;
mod logging;
mod store;

use anyhow::Result;
use backoffice_settings::BackofficeSettings;

use crate::logging::{LoggingConfig, TimingGuard};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = match BackofficeSettings::load() {
        Ok(settings) => settings,
        Err(e) => {
            // Logging is not up yet; the settings decide how it is configured
            eprintln!("Failed to load settings, using defaults: {:#}", e);
            BackofficeSettings::default()
        }
    };

    if let Err(e) = logging::init(LoggingConfig::from_settings(&settings.logging)) {
        eprintln!("FATAL: Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = backoffice_settings::ensure_directories() {
        tracing::warn!("Failed to create config directories: {}", e);
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        debounce_ms = settings.table.search_debounce_ms,
        page_size = settings.table.default_page_size,
        "Starting back-office demo"
    );

    for module in demo::modules() {
        let _timer = TimingGuard::new("module_session");
        let view = demo::run_module(&module, &settings.table).await?;
        tracing::info!(
            module = module.name,
            remaining = view.match_count,
            "Module session finished"
        );
    }

    Ok(())
}
