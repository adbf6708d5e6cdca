//! Structured validator defects.

use thiserror::Error;

use crate::observability::metrics::Fields;

/// A defect found by a problem validator.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{name}: {msg}")]
pub struct ValidationError {
    /// Low-cardinality tag, used as a metrics label.
    pub name: String,

    /// Human-readable description.
    pub msg: String,

    /// Whether the run may continue, possibly after an in-place fix.
    pub recoverable: bool,

    /// Metrics payload.
    pub fields: Fields,
}

impl ValidationError {
    /// A defect the run can continue past.
    pub fn recoverable(name: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            msg: msg.into(),
            recoverable: true,
            fields: Fields::new(),
        }
    }

    /// A defect that must abort the run.
    pub fn fatal(name: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            msg: msg.into(),
            recoverable: false,
            fields: Fields::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: f64) -> Self {
        self.fields.insert(key.into(), value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_and_fields() {
        let err = ValidationError::recoverable("duplicate_visit", "visit 4 appears twice")
            .with_field("dropped", 1.0);
        assert!(err.recoverable);
        assert_eq!(err.to_string(), "duplicate_visit: visit 4 appears twice");
        assert_eq!(err.fields.get("dropped"), Some(&1.0));

        assert!(!ValidationError::fatal("no_shift_teams", "empty").recoverable);
    }
}
