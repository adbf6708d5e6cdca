//! Live region settings refreshed from the configuration backend.
//!
//! # Responsibilities
//! - Poll both settings documents on a jittered timer
//! - Publish a snapshot only after both documents parse and cross-validate
//! - Serve copies of the current snapshot to concurrent readers
//!
//! A failed refresh is logged and dropped; readers keep seeing the previous
//! snapshot. A refresh already in flight when shutdown fires runs to
//! completion, and the loop exits at its next wait.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{broadcast, Mutex, RwLock};
use tokio::task::JoinHandle;

use crate::backend::DocumentSource;
use crate::config::StoreConfig;
use crate::observability::metrics;
use crate::settings::document::{fetch_all_settings, DocumentError};
use crate::settings::jitter::next_poll_interval;
use crate::settings::schema::{AllSettings, RegionSettingsMap, Settings};
use crate::settings::service::{SettingsError, SettingsService};

/// Region settings kept current by a background refresher.
pub struct RegionSettingsStore {
    source: Arc<dyn DocumentSource>,
    config: StoreConfig,
    snapshot: RwLock<AllSettings>,
    /// Serializes refreshes so snapshots are published in fetch order.
    refresh_lock: Mutex<()>,
}

impl RegionSettingsStore {
    pub fn new(source: Arc<dyn DocumentSource>, config: StoreConfig) -> Self {
        Self {
            source,
            config,
            snapshot: RwLock::new(AllSettings::default()),
            refresh_lock: Mutex::new(()),
        }
    }

    /// Start serving settings.
    ///
    /// The snapshot is reset to empty right away, so early reads see "not
    /// found" instead of blocking. With a zero refresh interval nothing is
    /// ever fetched. Otherwise one refresh completes before this returns and
    /// the handle of the background refresher is returned.
    pub async fn start(self: &Arc<Self>, shutdown: broadcast::Receiver<()>) -> Option<JoinHandle<()>> {
        *self.snapshot.write().await = AllSettings::default();

        if self.config.refresh_interval_secs <= 0 {
            tracing::info!("Region settings refresh disabled");
            return None;
        }

        if self.refresh().await.is_err() {
            tracing::warn!("Initial region settings refresh failed, serving empty settings");
        }

        let store = Arc::clone(self);
        Some(tokio::spawn(async move {
            store.run(shutdown).await;
        }))
    }

    async fn run(&self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            interval_secs = self.config.refresh_interval_secs,
            jitter_ratio = self.config.refresh_jitter_ratio,
            "Region settings refresher starting"
        );

        loop {
            let wait = next_poll_interval(self.config.refresh_interval_secs, self.config.refresh_jitter_ratio);
            tokio::select! {
                _ = shutdown.recv() => {
                    tracing::info!("Region settings refresher received shutdown signal, exiting loop");
                    break;
                }
                _ = tokio::time::sleep(wait) => {
                    if let Err(e) = self.refresh().await {
                        tracing::debug!(error = %e, "Retrying region settings refresh at next interval");
                    }
                }
            }
        }
    }

    /// Fetch, validate and publish one snapshot.
    ///
    /// On error the current snapshot is left untouched. Concurrent calls run
    /// one at a time.
    pub async fn refresh(&self) -> Result<(), DocumentError> {
        let _guard = self.refresh_lock.lock().await;

        let all = match fetch_all_settings(self.source.as_ref()).await {
            Ok(all) => all,
            Err(e) => {
                tracing::error!(error = %e, "Failed to refresh region settings. Keeping current settings.");
                metrics::record_settings_refresh("failure");
                return Err(e);
            }
        };

        let optimizer_regions = all.optimizer_region_settings_map.len();
        let availability_regions = all.availability_region_settings_map.len();

        *self.snapshot.write().await = all;

        tracing::info!(
            optimizer_regions,
            availability_regions,
            "Published region settings"
        );
        metrics::record_settings_refresh("success");
        metrics::record_enabled_regions(optimizer_regions, availability_regions);
        Ok(())
    }
}

#[async_trait]
impl SettingsService for RegionSettingsStore {
    async fn service_region_settings(&self, region_id: i64) -> Result<Settings, SettingsError> {
        self.snapshot
            .read()
            .await
            .optimizer_region_settings_map
            .get(&region_id)
            .cloned()
            .ok_or(SettingsError::RegionNotFound(region_id))
    }

    async fn all_enabled_region_settings(&self) -> Result<RegionSettingsMap, SettingsError> {
        Ok(self.snapshot.read().await.optimizer_region_settings_map.clone())
    }

    async fn all_settings(&self) -> Result<AllSettings, SettingsError> {
        Ok(self.snapshot.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendError, MemoryDocumentSource};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use crate::settings::document::{AVAILABILITY_SETTINGS_KEY, OPTIMIZER_SETTINGS_KEY};

    const OPTIMIZER_DOC: &str = r#"{"regions": [
        {"settings": {"optimize_horizon_days": 2}, "service_region_ids": [1, 2]},
        {"settings": {"optimize_horizon_days": 5}, "service_region_ids": [3]}
    ]}"#;
    const AVAILABILITY_DOC: &str = r#"{"regions": [
        {"settings": {"poll_interval_sec": 60}, "service_region_ids": [1]}
    ]}"#;

    async fn seeded_source() -> MemoryDocumentSource {
        let source = MemoryDocumentSource::new();
        source.set(OPTIMIZER_SETTINGS_KEY, OPTIMIZER_DOC).await;
        source.set(AVAILABILITY_SETTINGS_KEY, AVAILABILITY_DOC).await;
        source
    }

    fn store_with(source: MemoryDocumentSource, refresh_interval_secs: i64) -> Arc<RegionSettingsStore> {
        Arc::new(RegionSettingsStore::new(
            Arc::new(source),
            StoreConfig {
                refresh_interval_secs,
                refresh_jitter_ratio: 0.0,
            },
        ))
    }

    #[tokio::test]
    async fn test_start_refreshes_synchronously() {
        let store = store_with(seeded_source().await, 3600);
        let (tx, rx) = broadcast::channel(1);

        let handle = store.start(rx).await.expect("refresher should be running");

        let settings = store.service_region_settings(3).await.unwrap();
        assert_eq!(settings.optimize_horizon_days, 5);
        assert_eq!(store.all_enabled_region_settings().await.unwrap().len(), 3);

        let all = store.all_settings().await.unwrap();
        assert_eq!(all.availability_region_settings_map.len(), 1);
        assert_eq!(all.availability_region_settings_map[&1].poll_interval_sec, 60);

        tx.send(()).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_zero_interval_stays_empty() {
        let store = store_with(seeded_source().await, 0);
        let (_tx, rx) = broadcast::channel(1);

        assert!(store.start(rx).await.is_none());
        for region_id in [1, 2, 3, 42] {
            assert_eq!(
                store.service_region_settings(region_id).await,
                Err(SettingsError::RegionNotFound(region_id))
            );
        }
        assert!(store.all_enabled_region_settings().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_snapshot() {
        let source = seeded_source().await;
        let store = store_with(source.clone(), 3600);
        store.refresh().await.unwrap();

        source
            .set(
                AVAILABILITY_SETTINGS_KEY,
                r#"{"regions": [{"settings": {}, "service_region_ids": [99]}]}"#,
            )
            .await;
        assert!(matches!(store.refresh().await, Err(DocumentError::UnknownRegion(99))));

        source.set(OPTIMIZER_SETTINGS_KEY, "not json").await;
        assert!(matches!(store.refresh().await, Err(DocumentError::Decode { .. })));

        source.remove(AVAILABILITY_SETTINGS_KEY).await;
        assert!(matches!(store.refresh().await, Err(DocumentError::Fetch { .. })));

        let all = store.all_settings().await.unwrap();
        assert_eq!(all.optimizer_region_settings_map.len(), 3);
        assert_eq!(all.availability_region_settings_map.len(), 1);
    }

    #[tokio::test]
    async fn test_returned_maps_are_copies() {
        let store = store_with(seeded_source().await, 3600);
        store.refresh().await.unwrap();

        let mut all = store.all_settings().await.unwrap();
        all.optimizer_region_settings_map.clear();
        all.availability_region_settings_map.insert(7, Default::default());

        let mut enabled = store.all_enabled_region_settings().await.unwrap();
        enabled.remove(&1);

        let mut settings = store.service_region_settings(2).await.unwrap();
        settings.optimize_horizon_days = 100;

        let again = store.all_settings().await.unwrap();
        assert_eq!(again.optimizer_region_settings_map.len(), 3);
        assert_eq!(again.availability_region_settings_map.len(), 1);
        assert_eq!(again.optimizer_region_settings_map[&2].optimize_horizon_days, 2);
    }

    /// Tracks how many fetches overlap.
    struct SlowSource {
        inner: MemoryDocumentSource,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    #[async_trait]
    impl DocumentSource for SlowSource {
        async fn fetch(&self, key: &str) -> Result<String, BackendError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.inner.fetch(key).await
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_refreshes_do_not_overlap() {
        let source = Arc::new(SlowSource {
            inner: seeded_source().await,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        });
        let store = Arc::new(RegionSettingsStore::new(source.clone(), StoreConfig::default()));

        let mut refreshes = Vec::new();
        for _ in 0..4 {
            let store = store.clone();
            refreshes.push(tokio::spawn(async move { store.refresh().await }));
        }
        for refresh in refreshes {
            refresh.await.unwrap().unwrap();
        }

        assert_eq!(source.max_in_flight.load(Ordering::SeqCst), 1);
        assert_eq!(store.all_enabled_region_settings().await.unwrap().len(), 3);
    }
}
