//! Settings documents as stored in the configuration backend.
//!
//! Both documents share one shape: a list of settings groups, each applied to
//! a list of service regions. Flattening a document into a per-region map
//! rejects the whole document if any region id appears twice. Availability
//! regions must also exist in the optimizer map they are paired with.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backend::{BackendError, DocumentSource};
use crate::settings::schema::{
    AllSettings, AvailabilityRegionSettingsMap, AvailabilitySettings, RegionSettingsMap, Settings,
};

/// Backend key of the optimizer settings document.
pub const OPTIMIZER_SETTINGS_KEY: &str = "logistics_optimizer_settings";

/// Backend key of the availability settings document.
pub const AVAILABILITY_SETTINGS_KEY: &str = "logistics_availability_settings";

/// Errors that discard a settings refresh.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to fetch {key}: {source}")]
    Fetch {
        key: String,
        #[source]
        source: BackendError,
    },

    #[error("failed to decode {key}: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A region id appears in more than one settings group.
    #[error("duplicate service region id {0}")]
    DuplicateRegion(i64),

    /// An availability region has no optimizer settings.
    #[error("service region id {0} has availability settings but no optimizer settings")]
    UnknownRegion(i64),
}

/// One settings group and the regions it applies to.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RegionSettingsGroup<T> {
    pub settings: T,
    pub service_region_ids: Vec<i64>,
}

/// A whole settings document.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RegionSettingsDocument<T> {
    pub regions: Vec<RegionSettingsGroup<T>>,
}

pub type OptimizerSettingsDocument = RegionSettingsDocument<Settings>;
pub type AvailabilitySettingsDocument = RegionSettingsDocument<AvailabilitySettings>;

impl<T: Clone> RegionSettingsDocument<T> {
    /// Flatten into a per-region map, requiring every region id to pass `admit`.
    fn to_region_map<F>(&self, mut admit: F) -> Result<HashMap<i64, T>, DocumentError>
    where
        F: FnMut(i64) -> Result<(), DocumentError>,
    {
        let mut map = HashMap::new();
        for group in &self.regions {
            for &region_id in &group.service_region_ids {
                admit(region_id)?;
                if map.insert(region_id, group.settings.clone()).is_some() {
                    return Err(DocumentError::DuplicateRegion(region_id));
                }
            }
        }
        Ok(map)
    }
}

impl OptimizerSettingsDocument {
    pub fn region_settings_map(&self) -> Result<RegionSettingsMap, DocumentError> {
        self.to_region_map(|_| Ok(()))
    }
}

impl AvailabilitySettingsDocument {
    /// Flatten, requiring every region to be present in `optimizer_settings`.
    pub fn region_settings_map(
        &self,
        optimizer_settings: &RegionSettingsMap,
    ) -> Result<AvailabilityRegionSettingsMap, DocumentError> {
        self.to_region_map(|region_id| {
            if optimizer_settings.contains_key(&region_id) {
                Ok(())
            } else {
                Err(DocumentError::UnknownRegion(region_id))
            }
        })
    }
}

pub fn decode_document<T: DeserializeOwned>(key: &str, content: &str) -> Result<T, DocumentError> {
    serde_json::from_str(content).map_err(|source| DocumentError::Decode {
        key: key.to_string(),
        source,
    })
}

/// Builds a cross-validated snapshot from the two raw documents.
pub fn parse_all_settings(
    optimizer_document: &str,
    availability_document: &str,
) -> Result<AllSettings, DocumentError> {
    let optimizer: OptimizerSettingsDocument = decode_document(OPTIMIZER_SETTINGS_KEY, optimizer_document)?;
    let availability: AvailabilitySettingsDocument =
        decode_document(AVAILABILITY_SETTINGS_KEY, availability_document)?;

    let optimizer_region_settings_map = optimizer.region_settings_map()?;
    let availability_region_settings_map = availability.region_settings_map(&optimizer_region_settings_map)?;

    Ok(AllSettings {
        optimizer_region_settings_map,
        availability_region_settings_map,
    })
}

/// Fetches both documents and builds a cross-validated snapshot.
pub async fn fetch_all_settings(source: &dyn DocumentSource) -> Result<AllSettings, DocumentError> {
    let optimizer_document = fetch_document(source, OPTIMIZER_SETTINGS_KEY).await?;
    let availability_document = fetch_document(source, AVAILABILITY_SETTINGS_KEY).await?;

    parse_all_settings(&optimizer_document, &availability_document)
}

async fn fetch_document(source: &dyn DocumentSource, key: &str) -> Result<String, DocumentError> {
    source.fetch(key).await.map_err(|source| DocumentError::Fetch {
        key: key.to_string(),
        source,
    })
}
