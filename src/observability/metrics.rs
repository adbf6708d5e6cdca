//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define control plane metrics (settings refreshes, enabled regions)
//! - Carry validation error points through the `MetricsScope` seam
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `settings_refresh_total` (counter): refresh attempts by outcome
//! - `settings_enabled_regions` (gauge): regions in the published snapshot, by document
//! - `<measurement>_total` (counter): points written through `RecorderScope`, by tag
//! - `<measurement>_<field>` (histogram): numeric fields of those points
//!
//! # Design Decisions
//! - Low-overhead metric updates (atomic operations)
//! - Recording is a no-op until a recorder is installed

use std::collections::BTreeMap;
use std::net::SocketAddr;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Numeric payload attached to a metrics point.
pub type Fields = BTreeMap<String, f64>;

/// Sink for tagged measurement points.
pub trait MetricsScope: Send + Sync {
    fn write_point(&self, measurement: &str, tags: &[(&'static str, String)], fields: &Fields);
}

/// Drops every point.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopScope;

impl MetricsScope for NoopScope {
    fn write_point(&self, _measurement: &str, _tags: &[(&'static str, String)], _fields: &Fields) {}
}

/// Forwards points to the installed `metrics` recorder.
#[derive(Debug, Clone, Default)]
pub struct RecorderScope {
    prefix: Option<String>,
}

impl RecorderScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefix every measurement name, e.g. `validation` → `validation_error_total`.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }

    fn metric_name(&self, measurement: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}_{}", prefix, measurement),
            None => measurement.to_string(),
        }
    }
}

impl MetricsScope for RecorderScope {
    fn write_point(&self, measurement: &str, tags: &[(&'static str, String)], fields: &Fields) {
        let name = self.metric_name(measurement);
        let labels: Vec<(&'static str, String)> = tags.to_vec();

        counter!(format!("{}_total", name), &labels).increment(1);
        for (field, value) in fields {
            histogram!(format!("{}_{}", name, field), &labels).record(*value);
        }
    }
}

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_settings_refresh(outcome: &'static str) {
    counter!("settings_refresh_total", "outcome" => outcome).increment(1);
}

pub fn record_enabled_regions(optimizer: usize, availability: usize) {
    gauge!("settings_enabled_regions", "document" => "optimizer").set(optimizer as f64);
    gauge!("settings_enabled_regions", "document" => "availability").set(availability as f64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_name_prefix() {
        assert_eq!(RecorderScope::new().metric_name("error"), "error");
        assert_eq!(RecorderScope::with_prefix("validation").metric_name("error"), "validation_error");
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        let fields: Fields = [("dropped_visits".to_string(), 2.0)].into_iter().collect();
        RecorderScope::new().write_point("error", &[("name", "x".to_string())], &fields);
        NoopScope.write_point("error", &[], &fields);
        record_settings_refresh("success");
        record_enabled_regions(1, 1);
    }
}
