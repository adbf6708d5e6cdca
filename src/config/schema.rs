//! Configuration schema definitions.
//!
//! This module defines the daemon's own configuration. Region settings are
//! not configured here; they come from the configuration backend at runtime.

use serde::{Deserialize, Serialize};

/// Root configuration for the settings daemon.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Region settings refresh cadence.
    pub store: StoreConfig,

    /// Where settings documents are fetched from.
    pub backend: BackendConfig,

    /// Problem validation policy.
    pub validation: ValidationPolicyConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Region settings store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Seconds between refreshes. 0 disables refreshing entirely.
    pub refresh_interval_secs: i64,

    /// Ratio of the interval applied as jitter.
    pub refresh_jitter_ratio: f64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 60,
            refresh_jitter_ratio: 0.1,
        }
    }
}

/// Configuration backend selection.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BackendConfig {
    /// Documents read from `<dir>/<key>.json`.
    File { dir: String },

    /// Documents fetched from `<base_url>/<key>`.
    Http {
        base_url: String,
        #[serde(default = "default_http_timeout_secs")]
        timeout_secs: u64,
    },
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig::File {
            dir: "settings".to_string(),
        }
    }
}

fn default_http_timeout_secs() -> u64 {
    5
}

/// Deployment environment, which decides the default validation strictness.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    #[default]
    Production,
    Staging,
    Development,
    Test,
}

impl Environment {
    /// Whether recoverable problem defects should abort a run by default.
    pub fn fails_on_recoverable_error(self) -> bool {
        matches!(self, Environment::Development | Environment::Test)
    }
}

/// Problem validation policy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ValidationPolicyConfig {
    pub environment: Environment,

    /// Explicit override of the environment default.
    pub fail_on_recoverable_error: Option<bool>,
}

impl ValidationPolicyConfig {
    pub fn fail_on_recoverable_error(&self) -> bool {
        self.fail_on_recoverable_error
            .unwrap_or_else(|| self.environment.fails_on_recoverable_error())
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
