//! Routing problem validation subsystem.
//!
//! # Data Flow
//! ```text
//! routing problem (built from live region settings)
//!     → ProblemValidator::validate in configured order
//!         → Ok: next validator
//!         → Err(ValidationError): one "error" metrics point {name, recoverable}
//!             → fatal, or recoverable under fail-fast policy: abort this run
//!             → recoverable otherwise: keep any in-place fix, continue
//!     → (possibly patched) problem handed to the optimizer
//! ```
//!
//! # Design Decisions
//! - Validators may fix a problem forward by mutating it in place
//! - The same validator set runs permissively in production and strictly in
//!   development/test; only `fail_on_recoverable_error` differs
//! - A rejected problem aborts one dispatch attempt, never the process

pub mod error;
pub mod pipeline;

pub use error::ValidationError;
pub use pipeline::{ProblemValidator, ValidationConfig, Validator};
