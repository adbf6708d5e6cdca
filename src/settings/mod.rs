//! Region settings subsystem.
//!
//! # Data Flow
//! ```text
//! configuration backend (two JSON documents)
//!     → document.rs (decode, flatten groups, reject duplicates,
//!                    check availability regions against optimizer regions)
//!     → store.rs    (publish both maps together under a write lock)
//!     → SettingsService (service.rs) readers get copies
//!
//! Per-region values:
//!     schema.rs      every tunable knob, nil-vs-zero preserved
//!     jitter.rs      jittered poll intervals
//!     constraints.rs optimizer constraint sub-configurations
//! ```
//!
//! # Design Decisions
//! - Snapshots are replaced wholesale, never mutated in place
//! - Validation happens outside the lock; only the swap holds it
//! - Refresh failures never reach readers; stale settings beat no settings

pub mod constraints;
pub mod document;
pub mod jitter;
pub mod mock;
pub mod schema;
pub mod service;
pub mod store;

pub use mock::MockSettingsService;
pub use schema::{
    AllSettings, AvailabilityAttribute, AvailabilityRegionSettingsMap, AvailabilitySettings,
    CapacitySettings, RegionSettingsMap, Settings,
};
pub use service::{SettingsError, SettingsService};
pub use store::RegionSettingsStore;
