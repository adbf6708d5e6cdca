//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (intervals, ratios, timeouts)
//! - Check addresses and URLs parse before anything binds or connects
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ConfigViolation>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::{BackendConfig, ServiceConfig};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigViolation {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl ConfigViolation {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ConfigViolation>> {
    let mut violations = Vec::new();

    if config.store.refresh_interval_secs < 0 {
        violations.push(ConfigViolation::new(
            "store.refresh_interval_secs",
            "must not be negative (use 0 to disable refresh)",
        ));
    }

    let ratio = config.store.refresh_jitter_ratio;
    if !(0.0..=1.0).contains(&ratio) {
        violations.push(ConfigViolation::new(
            "store.refresh_jitter_ratio",
            format!("must be between 0 and 1, got {}", ratio),
        ));
    }

    match &config.backend {
        BackendConfig::File { dir } => {
            if dir.trim().is_empty() {
                violations.push(ConfigViolation::new("backend.dir", "must not be empty"));
            }
        }
        BackendConfig::Http { base_url, timeout_secs } => {
            if let Err(e) = url::Url::parse(base_url) {
                violations.push(ConfigViolation::new(
                    "backend.base_url",
                    format!("invalid URL {:?}: {}", base_url, e),
                ));
            }
            if *timeout_secs == 0 {
                violations.push(ConfigViolation::new("backend.timeout_secs", "must be greater than 0"));
            }
        }
    }

    let observability = &config.observability;
    if observability.metrics_enabled && observability.metrics_address.parse::<SocketAddr>().is_err() {
        violations.push(ConfigViolation::new(
            "observability.metrics_address",
            format!("invalid socket address {:?}", observability.metrics_address),
        ));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}
