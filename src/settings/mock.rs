//! Canned [`SettingsService`] for tests of settings consumers.

use async_trait::async_trait;

use crate::settings::schema::{AllSettings, RegionSettingsMap, Settings};
use crate::settings::service::{SettingsError, SettingsService};

/// Returns whatever it was built with. `error`, when set, wins over every
/// canned value.
#[derive(Debug, Clone, Default)]
pub struct MockSettingsService {
    pub region_settings: Option<Settings>,
    pub region_settings_map: RegionSettingsMap,
    pub all_settings: Option<AllSettings>,
    pub error: Option<SettingsError>,
}

impl MockSettingsService {
    pub fn with_error(error: SettingsError) -> Self {
        Self {
            error: Some(error),
            ..Default::default()
        }
    }

    fn check_error(&self) -> Result<(), SettingsError> {
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl SettingsService for MockSettingsService {
    async fn service_region_settings(&self, region_id: i64) -> Result<Settings, SettingsError> {
        self.check_error()?;
        self.region_settings
            .clone()
            .ok_or(SettingsError::RegionNotFound(region_id))
    }

    async fn all_enabled_region_settings(&self) -> Result<RegionSettingsMap, SettingsError> {
        self.check_error()?;
        Ok(self.region_settings_map.clone())
    }

    async fn all_settings(&self) -> Result<AllSettings, SettingsError> {
        self.check_error()?;
        Ok(self.all_settings.clone().unwrap_or_default())
    }
}
