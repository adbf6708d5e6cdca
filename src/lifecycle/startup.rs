//! Startup sequence.
//!
//! # Responsibilities
//! - Build the configured document source
//! - Create and start the region settings store

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::backend::{BackendError, DocumentSource, FileDocumentSource, HttpDocumentSource};
use crate::config::schema::{BackendConfig, ServiceConfig};
use crate::lifecycle::shutdown::Shutdown;
use crate::settings::RegionSettingsStore;

/// Build the document source described by `config`.
pub fn build_document_source(config: &BackendConfig) -> Result<Arc<dyn DocumentSource>, BackendError> {
    match config {
        BackendConfig::File { dir } => {
            tracing::info!(dir = %dir, "Using file settings backend");
            Ok(Arc::new(FileDocumentSource::new(dir)))
        }
        BackendConfig::Http { base_url, timeout_secs } => {
            tracing::info!(base_url = %base_url, timeout_secs, "Using HTTP settings backend");
            Ok(Arc::new(HttpDocumentSource::new(
                base_url,
                Duration::from_secs(*timeout_secs),
            )?))
        }
    }
}

/// A running settings store and its refresher task, if any.
pub struct RunningStore {
    pub store: Arc<RegionSettingsStore>,
    pub refresher: Option<JoinHandle<()>>,
}

/// Build the store from `config` and start it.
pub async fn start_store(config: &ServiceConfig, shutdown: &Shutdown) -> Result<RunningStore, BackendError> {
    let source = build_document_source(&config.backend)?;
    let store = Arc::new(RegionSettingsStore::new(source, config.store.clone()));
    if shutdown.is_triggered() {
        tracing::warn!("Shutdown already requested, not starting region settings refresher");
        return Ok(RunningStore { store, refresher: None });
    }

    let refresher = store.start(shutdown.subscribe()).await;

    Ok(RunningStore { store, refresher })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::settings::SettingsService;

    #[tokio::test]
    async fn test_start_store_from_file_backend() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("logistics_optimizer_settings.json"),
            r#"{"regions": [{"settings": {"optimizer_config_id": 9}, "service_region_ids": [11]}]}"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("logistics_availability_settings.json"),
            r#"{"regions": []}"#,
        )
        .unwrap();

        let config = ServiceConfig {
            store: StoreConfig {
                refresh_interval_secs: 3600,
                refresh_jitter_ratio: 0.0,
            },
            backend: BackendConfig::File {
                dir: dir.path().display().to_string(),
            },
            ..Default::default()
        };

        let shutdown = Shutdown::new();
        let running = start_store(&config, &shutdown).await.unwrap();
        let settings = running.store.service_region_settings(11).await.unwrap();
        assert_eq!(settings.optimizer_config_id, 9);

        shutdown.trigger();
        running.refresher.unwrap().await.unwrap();
    }
}
