//! Read-side settings capability.

use async_trait::async_trait;
use thiserror::Error;

use crate::settings::schema::{AllSettings, RegionSettingsMap, Settings};

/// Errors returned to settings readers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// The region is not enabled in the current snapshot.
    #[error("service region {0} not found")]
    RegionNotFound(i64),

    /// The settings provider could not answer.
    #[error("settings unavailable: {0}")]
    Unavailable(String),
}

/// Region settings as seen by the dispatch pipeline.
///
/// Every returned value is an independent copy; mutating it never affects
/// what later calls observe.
#[async_trait]
pub trait SettingsService: Send + Sync {
    /// Settings for one region. Fails with [`SettingsError::RegionNotFound`]
    /// when the region is not enabled.
    async fn service_region_settings(&self, region_id: i64) -> Result<Settings, SettingsError>;

    /// Settings for every enabled region.
    async fn all_enabled_region_settings(&self) -> Result<RegionSettingsMap, SettingsError>;

    /// Optimizer and availability settings from the same snapshot.
    async fn all_settings(&self) -> Result<AllSettings, SettingsError>;
}
