//! Optimizer constraint sub-configurations derived from region settings.
//!
//! Each translator returns `None` when its knob is absent so the optimizer keeps
//! its configured default. A knob explicitly set to zero still produces a
//! config carrying zero, which disables that cost term.

use std::time::Duration;

use serde::Serialize;

use crate::settings::schema::Settings;

const CLINICAL_URGENCY_OFFSET_PRIOR_TO_WINDOW_END: Duration = Duration::from_secs(60 * 60);

const WORK_DISTRIBUTION_BASE_NUMERATOR: u32 = 2;
const WORK_DISTRIBUTION_BASE_DENOMINATOR: u32 = 1;

/// Clinical urgency lateness constraint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClinicalUrgencyConfig {
    /// A higher urgency level wins when a visit matches several levels.
    pub higher_level_value_wins: bool,
    pub policy: ClinicalUrgencyPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClinicalUrgencyPolicy {
    LinearOffsetPolicy(LinearOffsetPolicy),
}

/// Lateness cost accrues linearly from a fixed offset before the urgency window ends.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinearOffsetPolicy {
    pub lateness_cost_usd_mills_per_ms: f32,
    pub offset_prior_to_urgency_window_end_ms: u64,
}

/// Work distribution constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkDistributionConstraintConfig {
    pub policy: WorkDistributionPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkDistributionPolicy {
    ExponentialPolicy(ExponentialPolicy),
}

/// Queue value grows as `(numerator / denominator) ^ n` up to the full queue limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExponentialPolicy {
    pub base_numerator: u32,
    pub base_denominator: u32,
    pub full_queue_value_limit_usd_mills: u64,
}

/// Opportunity cost constraint. At least one of the two terms is always set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpportunityCostConstraintConfig {
    pub on_scene_cost: Option<LinearOnSceneCostPolicy>,
    pub foregone_visit_cost: Option<LinearForegoneVisitValuePolicy>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinearOnSceneCostPolicy {
    pub scaling_factor: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinearForegoneVisitValuePolicy {
    pub cents_per_minute: f32,
}

impl Settings {
    pub fn clinical_urgency_config(&self) -> Option<ClinicalUrgencyConfig> {
        let cost = self.clinical_urgency_lateness_cost_usd_mills_per_ms?;

        Some(ClinicalUrgencyConfig {
            higher_level_value_wins: true,
            policy: ClinicalUrgencyPolicy::LinearOffsetPolicy(LinearOffsetPolicy {
                lateness_cost_usd_mills_per_ms: cost,
                offset_prior_to_urgency_window_end_ms: CLINICAL_URGENCY_OFFSET_PRIOR_TO_WINDOW_END
                    .as_millis() as u64,
            }),
        })
    }

    pub fn work_distribution_config(&self) -> Option<WorkDistributionConstraintConfig> {
        let limit = self.work_distribution_full_queue_value_limit_usd_mills?;

        Some(WorkDistributionConstraintConfig {
            policy: WorkDistributionPolicy::ExponentialPolicy(ExponentialPolicy {
                base_numerator: WORK_DISTRIBUTION_BASE_NUMERATOR,
                base_denominator: WORK_DISTRIBUTION_BASE_DENOMINATOR,
                full_queue_value_limit_usd_mills: limit,
            }),
        })
    }

    pub fn opportunity_cost_config(&self) -> Option<OpportunityCostConstraintConfig> {
        let on_scene_cost = self
            .on_scene_cost_scale_factor
            .map(|scaling_factor| LinearOnSceneCostPolicy { scaling_factor });

        // Unlike the other knobs, zero or below leaves the foregone visit term out.
        let foregone_visit_cost = self
            .foregone_visit_cost_cents_per_minute
            .filter(|cents| *cents > 0.0)
            .map(|cents_per_minute| LinearForegoneVisitValuePolicy { cents_per_minute });

        if on_scene_cost.is_none() && foregone_visit_cost.is_none() {
            return None;
        }

        Some(OpportunityCostConstraintConfig {
            on_scene_cost,
            foregone_visit_cost,
        })
    }
}
