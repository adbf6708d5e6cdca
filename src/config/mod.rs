//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//!     → backend, store, validation policy and observability built from it
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; region settings are the only live config
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::BackendConfig;
pub use schema::Environment;
pub use schema::ObservabilityConfig;
pub use schema::ServiceConfig;
pub use schema::StoreConfig;
pub use schema::ValidationPolicyConfig;
