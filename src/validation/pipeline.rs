//! Ordered validator pipeline with a fail-fast policy.

use std::fmt;
use std::sync::Arc;

use crate::config::schema::{Environment, ValidationPolicyConfig};
use crate::observability::metrics::MetricsScope;
use crate::validation::error::ValidationError;

const ERROR_MEASUREMENT: &str = "error";

/// A single check over a routing problem.
///
/// Validators may patch `problem` in place when a defect can be fixed forward;
/// the patch is kept only if the pipeline continues.
pub trait ProblemValidator<P>: Send + Sync {
    fn validate(&self, problem: &mut P) -> Result<(), ValidationError>;
}

impl<P, F> ProblemValidator<P> for F
where
    F: Fn(&mut P) -> Result<(), ValidationError> + Send + Sync,
{
    fn validate(&self, problem: &mut P) -> Result<(), ValidationError> {
        self(problem)
    }
}

/// Which validators run, in order, and how strictly.
pub struct ValidationConfig<P> {
    /// Abort on recoverable defects too. Set in development and test.
    pub fail_on_recoverable_error: bool,
    pub problem_validators: Vec<Arc<dyn ProblemValidator<P>>>,
}

impl<P> ValidationConfig<P> {
    pub fn new(fail_on_recoverable_error: bool, problem_validators: Vec<Arc<dyn ProblemValidator<P>>>) -> Self {
        Self {
            fail_on_recoverable_error,
            problem_validators,
        }
    }

    /// Runs no validators.
    pub fn none() -> Self {
        Self::new(false, Vec::new())
    }

    /// Strict in development and test, permissive elsewhere.
    pub fn for_environment(environment: Environment, problem_validators: Vec<Arc<dyn ProblemValidator<P>>>) -> Self {
        Self::new(environment.fails_on_recoverable_error(), problem_validators)
    }

    /// Strictness resolved from the deployment policy.
    pub fn from_policy(policy: &ValidationPolicyConfig, problem_validators: Vec<Arc<dyn ProblemValidator<P>>>) -> Self {
        Self::new(policy.fail_on_recoverable_error(), problem_validators)
    }
}

impl<P> Clone for ValidationConfig<P> {
    fn clone(&self) -> Self {
        Self {
            fail_on_recoverable_error: self.fail_on_recoverable_error,
            problem_validators: self.problem_validators.clone(),
        }
    }
}

impl<P> fmt::Debug for ValidationConfig<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationConfig")
            .field("fail_on_recoverable_error", &self.fail_on_recoverable_error)
            .field("problem_validators", &self.problem_validators.len())
            .finish()
    }
}

/// Runs a [`ValidationConfig`] and reports every defect to metrics.
pub struct Validator<P> {
    scope: Arc<dyn MetricsScope>,
    config: ValidationConfig<P>,
}

impl<P> Validator<P> {
    pub fn new(scope: Arc<dyn MetricsScope>, config: ValidationConfig<P>) -> Self {
        Self { scope, config }
    }

    pub fn config(&self) -> &ValidationConfig<P> {
        &self.config
    }

    /// Validate `problem`, possibly patching it.
    ///
    /// Returns the first defect that must abort the run: any fatal defect, or
    /// a recoverable one when `fail_on_recoverable_error` is set. Recoverable
    /// defects are otherwise recorded and skipped.
    pub fn validate(&self, problem: &mut P) -> Result<(), ValidationError> {
        for validator in &self.config.problem_validators {
            let Err(err) = validator.validate(problem) else {
                continue;
            };

            self.scope.write_point(
                ERROR_MEASUREMENT,
                &[
                    ("name", err.name.clone()),
                    ("recoverable", err.recoverable.to_string()),
                ],
                &err.fields,
            );

            if !err.recoverable || self.config.fail_on_recoverable_error {
                tracing::error!(
                    name = %err.name,
                    recoverable = err.recoverable,
                    msg = %err.msg,
                    "Problem validation failed"
                );
                return Err(err);
            }

            tracing::warn!(name = %err.name, msg = %err.msg, "Recoverable problem defect, continuing");
        }

        Ok(())
    }
}
