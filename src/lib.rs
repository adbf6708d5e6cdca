//! Configuration and input-validation control plane for a per-region
//! vehicle routing optimizer.

pub mod backend;
pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod settings;
pub mod validation;

pub use config::schema::ServiceConfig;
pub use lifecycle::Shutdown;
pub use settings::{RegionSettingsStore, SettingsService};
pub use validation::{ValidationConfig, ValidationError, Validator};
