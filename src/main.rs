//! VRP control plane settings daemon.
//!
//! # Architecture Overview
//!
//! ```text
//!   ┌────────────────────┐   poll (jittered)   ┌──────────────────────────┐
//!   │ configuration      │◀────────────────────│  RegionSettingsStore     │
//!   │ backend            │  two JSON documents │  parse → cross-validate  │
//!   │ (file / http)      │────────────────────▶│  → publish under lock    │
//!   └────────────────────┘                     └────────────┬─────────────┘
//!                                                           │ SettingsService
//!                                                           ▼
//!                                              ┌──────────────────────────┐
//!                                              │ dispatch pipeline        │
//!                                              │ (problem validation)     │
//!                                              └──────────────────────────┘
//! ```
//!
//! Usage: `vrp-control-plane [config.toml]`. Without a path the defaults are
//! used (file backend reading `./settings`).

use std::path::PathBuf;

use vrp_control_plane::config::loader::load_config;
use vrp_control_plane::config::ServiceConfig;
use vrp_control_plane::lifecycle::signals::wait_for_shutdown_signal;
use vrp_control_plane::lifecycle::startup::start_store;
use vrp_control_plane::lifecycle::Shutdown;
use vrp_control_plane::observability::{logging, metrics};
use vrp_control_plane::settings::SettingsService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => load_config(&path)?,
        None => ServiceConfig::default(),
    };

    logging::init_logging(&config.observability)?;

    tracing::info!("vrp-control-plane v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        refresh_interval_secs = config.store.refresh_interval_secs,
        refresh_jitter_ratio = config.store.refresh_jitter_ratio,
        environment = ?config.validation.environment,
        fail_on_recoverable_error = config.validation.fail_on_recoverable_error(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    let running = start_store(&config, &shutdown).await?;

    let enabled = running.store.all_enabled_region_settings().await?;
    tracing::info!(regions = enabled.len(), "Region settings store started");

    wait_for_shutdown_signal().await;
    shutdown.trigger();

    if let Some(refresher) = running.refresher {
        refresher.await?;
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
