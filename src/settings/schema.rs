//! Region settings schema.
//!
//! Every knob is individually optional in the configuration documents; missing
//! fields take their `Default`. Knobs typed `Option<_>` distinguish "absent"
//! (defer to the optimizer's own default) from "present with zero" (explicitly
//! disable the term), so they must never be collapsed to a plain number.

use std::collections::HashMap;
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use crate::settings::jitter::{next_jitter_interval, next_poll_interval};

const DEFAULT_SNAPSHOTS_LOOKBACK: Duration = Duration::from_secs(60 * 24 * 60 * 60);
const DEFAULT_AVAILABILITY_TIME_WINDOW: Duration = Duration::from_secs(4 * 60 * 60);

/// Default lookback for snapshot queries when a region does not set one (60 days).
pub fn default_snapshots_lookback_duration() -> Duration {
    DEFAULT_SNAPSHOTS_LOOKBACK
}

/// Optimizer tuning for one service region.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Free-form description of the settings group.
    pub description: String,

    /// Poll interval for new information in the region, in seconds.
    pub poll_interval_sec: i64,

    /// Ratio of `poll_interval_sec` to randomly apply as jitter.
    pub poll_interval_jitter_ratio: f64,

    /// Validity of distance data, in seconds.
    pub distance_validity_sec: i64,

    /// Lookback for snapshot queries, in seconds. Absent falls back to 60 days.
    pub snapshots_lookback_sec: Option<i64>,

    /// Number of days forward to optimize for, including the current day.
    pub optimize_horizon_days: i64,

    /// Optimizer config to use when optimizing.
    pub optimizer_config_id: i64,

    /// Overall optimization budget. 0 uses the optimizer config's own budget.
    pub optimizer_termination_duration_ms: i64,

    /// Stop once the score has not improved for this long. 0 disables the check.
    pub optimizer_unimproved_score_termination_duration_ms: i64,

    /// Feasibility-only overall budget. 0 uses the server default.
    pub feasibility_optimizer_termination_duration_ms: i64,

    /// Feasibility-only unimproved score budget. 0 disables the check.
    pub feasibility_optimizer_unimproved_score_termination_duration_ms: i64,

    /// Force a current-day recompute after this many seconds without new data.
    /// Absent never forces; 0 always considers the schedule stale.
    pub current_day_schedule_max_staleness_sec: Option<i64>,

    /// Report non-override visits infeasible this many minutes before market close.
    pub feasibility_check_lateness_minutes: i64,

    /// Extra start-of-shift prep time for feasibility checks.
    pub feasibility_shift_team_start_buffer_sec: i64,

    /// Use OSRM for all distance lookups instead of the region's map service.
    pub use_osrm_map_service: bool,

    /// Use Google Maps for en-route ETAs.
    pub use_google_maps_for_real_time_traffic: bool,

    /// Feasibility threshold for a long service duration.
    pub feasibility_long_service_duration_sec: i64,

    /// Shift team commitment (0-100) that flags a region as nearing capacity.
    pub feasibility_percent_capacity: i64,

    /// Adds response details for limited market availability.
    pub use_limited_market_availability_checks: bool,

    /// Overrides the default lateness threshold for feasibility checks.
    pub feasibility_check_lateness_threshold_override_ms: Option<i64>,

    /// Fetch distances from other map services for comparisons.
    pub fetch_other_map_service_distances: bool,
    pub fetch_other_map_service_distances_timeout_ms: i64,

    /// Clinical urgency lateness cost. Absent keeps the optimizer config, 0 zeroes the cost.
    pub clinical_urgency_lateness_cost_usd_mills_per_ms: Option<f32>,

    /// Work distribution full queue reward. Absent keeps the optimizer config, 0 zeroes the reward.
    pub work_distribution_full_queue_value_limit_usd_mills: Option<u64>,

    /// Send per-visit value based on revenue and partner priority.
    pub use_visit_value: bool,

    /// Include latest unscheduled visits in feasibility checks.
    pub feasibility_get_unscheduled_visits: bool,

    /// Use the last schedule run for feasibility checks.
    pub feasibility_check_use_last_schedule_run: bool,

    /// Replace feasibility locations with canonical ones for market availability.
    pub market_availability_use_canonical_locations_visits: bool,

    /// Extra setup time added to every visit. 0 adds nothing.
    pub visit_extra_setup_duration_sec: i64,

    /// Extra on-scene cost as a ratio of the base cost. Absent leaves the term unset.
    pub on_scene_cost_scale_factor: Option<f32>,

    /// Marginal opportunity cost per minute of ETA, in 1/100 points.
    /// Absent or non-positive leaves the term out of the score.
    pub foregone_visit_cost_cents_per_minute: Option<f32>,

    /// Time window length for availability, in hours. Absent falls back to 4 hours.
    pub availability_time_window_duration_hrs: Option<i64>,
}

impl Settings {
    /// Jittered delay until the next poll. Zero when polling is disabled.
    pub fn next_poll_interval(&self) -> Duration {
        next_poll_interval(self.poll_interval_sec, self.poll_interval_jitter_ratio)
    }

    /// Magnitude of a freshly drawn jitter sample.
    pub fn next_jitter_interval(&self) -> Duration {
        next_jitter_interval(self.poll_interval_sec, self.poll_interval_jitter_ratio)
    }

    pub fn snapshots_lookback_duration(&self) -> Duration {
        match self.snapshots_lookback_sec {
            Some(secs) => Duration::from_secs(secs.max(0) as u64),
            None => DEFAULT_SNAPSHOTS_LOOKBACK,
        }
    }

    /// Optimizer budget, falling back to the optimizer config's budget when unset.
    pub fn termination_duration_ms(&self, fallback_ms: i64) -> i64 {
        if self.optimizer_termination_duration_ms > 0 {
            self.optimizer_termination_duration_ms
        } else {
            fallback_ms
        }
    }

    /// Feasibility budget, falling back to the server default when unset.
    pub fn feasibility_termination_duration_ms(&self, fallback_ms: i64) -> i64 {
        if self.feasibility_optimizer_termination_duration_ms > 0 {
            self.feasibility_optimizer_termination_duration_ms
        } else {
            fallback_ms
        }
    }

    pub fn availability_time_window_duration(&self) -> Duration {
        match self.availability_time_window_duration_hrs {
            Some(hrs) => Duration::from_secs((hrs.max(0) as u64).saturating_mul(60 * 60)),
            None => DEFAULT_AVAILABILITY_TIME_WINDOW,
        }
    }

    /// Earliest timestamp whose distance data is still usable.
    pub fn distance_validity_cutoff(&self, latest: SystemTime) -> SystemTime {
        let validity = Duration::from_secs(self.distance_validity_sec.max(0) as u64);
        latest.checked_sub(validity).unwrap_or(SystemTime::UNIX_EPOCH)
    }

    /// Whether a region must be re-optimized even without new data.
    ///
    /// Only the current service day is ever forced, since feasibility relies on
    /// time advancing. A region that never ran is always recomputed.
    pub fn should_force_recompute(
        &self,
        last_run_snapshot: Option<SystemTime>,
        latest_snapshot: SystemTime,
        is_current_day: bool,
    ) -> bool {
        let Some(last_run) = last_run_snapshot else {
            return true;
        };
        let Some(staleness_sec) = self.current_day_schedule_max_staleness_sec else {
            return false;
        };
        if !is_current_day {
            return false;
        }

        // A staleness bound past the representable range never expires.
        match last_run.checked_add(Duration::from_secs(staleness_sec.max(0) as u64)) {
            Some(stale_after) => stale_after < latest_snapshot,
            None => false,
        }
    }
}

/// A named attribute and the variants availability is computed for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AvailabilityAttribute {
    pub name: String,
    pub variants: Vec<String>,
}

impl AvailabilityAttribute {
    /// Qualified `name:variant` attribute names.
    pub fn variant_names(&self) -> Vec<String> {
        self.variants
            .iter()
            .map(|variant| format!("{}:{}", self.name, variant))
            .collect()
    }
}

/// Shift team capacity, per horizon day, for teams carrying the given attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CapacitySettings {
    pub shift_team_attributes: Vec<String>,

    /// Capacity percentage indexed by horizon day (0 = today).
    pub capacity_percent_for_horizon_days: Vec<i32>,
}

impl CapacitySettings {
    pub fn percent_for_horizon_day(&self, horizon_day: usize) -> Option<i32> {
        self.capacity_percent_for_horizon_days.get(horizon_day).copied()
    }
}

/// Capacity resolved for a single horizon day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShiftTeamCapacity {
    pub shift_team_attributes: Vec<String>,
    pub capacity_percent: i32,
}

/// Availability computation tuning for one service region.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AvailabilitySettings {
    pub description: String,

    pub poll_interval_sec: i64,
    pub poll_interval_jitter_ratio: f64,

    /// Allow availability visits to be served late.
    pub allow_late_visits: bool,

    /// Allow availability visits to be dropped from the schedule.
    pub allow_expendable_visits: bool,

    /// Overall optimization budget. 0 uses the optimizer config's own budget.
    pub optimizer_termination_duration_ms: i64,

    /// Stop once the score has not improved for this long. 0 disables the check.
    pub optimizer_unimproved_score_termination_duration_ms: i64,

    pub attributes: Vec<AvailabilityAttribute>,

    pub capacity_settings: Vec<CapacitySettings>,
}

impl AvailabilitySettings {
    pub fn next_poll_interval(&self) -> Duration {
        next_poll_interval(self.poll_interval_sec, self.poll_interval_jitter_ratio)
    }

    pub fn next_jitter_interval(&self) -> Duration {
        next_jitter_interval(self.poll_interval_sec, self.poll_interval_jitter_ratio)
    }

    pub fn termination_duration_ms(&self, fallback_ms: i64) -> i64 {
        if self.optimizer_termination_duration_ms > 0 {
            self.optimizer_termination_duration_ms
        } else {
            fallback_ms
        }
    }

    /// Qualified attribute names, one group per attribute category.
    pub fn attribute_names_by_category(&self) -> Vec<Vec<String>> {
        self.attributes
            .iter()
            .map(AvailabilityAttribute::variant_names)
            .collect()
    }

    /// Capacities that define a percentage for `horizon_day`.
    pub fn capacities_for_horizon_day(&self, horizon_day: usize) -> Vec<ShiftTeamCapacity> {
        self.capacity_settings
            .iter()
            .filter_map(|cs| {
                cs.percent_for_horizon_day(horizon_day)
                    .map(|capacity_percent| ShiftTeamCapacity {
                        shift_team_attributes: cs.shift_team_attributes.clone(),
                        capacity_percent,
                    })
            })
            .collect()
    }
}

/// Optimizer settings keyed by service region id.
pub type RegionSettingsMap = HashMap<i64, Settings>;

/// Availability settings keyed by service region id.
pub type AvailabilityRegionSettingsMap = HashMap<i64, AvailabilitySettings>;

/// Both settings maps, published together as one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AllSettings {
    pub optimizer_region_settings_map: RegionSettingsMap,
    pub availability_region_settings_map: AvailabilityRegionSettingsMap,
}

impl AllSettings {
    /// Optimizer settings for a region, or defaults when the region is not enabled.
    pub fn optimizer_settings(&self, region_id: i64) -> Settings {
        self.optimizer_region_settings_map
            .get(&region_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Availability settings for a region, or defaults when the region is not enabled.
    pub fn availability_settings(&self, region_id: i64) -> AvailabilitySettings {
        self.availability_region_settings_map
            .get(&region_id)
            .cloned()
            .unwrap_or_default()
    }
}
