use orrery_config::PropagationConfig;
use orrery_core::time::days_to_seconds;
use orrery_integrator::IntegratorSettings;

use crate::HorizonPolicy;

/// Knobs shared by every propagation entry point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropagationSettings {
    pub integrator: IntegratorSettings,
    /// Points per predicted trajectory.
    pub num_points: usize,
    /// Host checkpoints per orbit propagation.
    pub progress_batches: usize,
    pub atmosphere_step_s: f64,
    pub reentry_max_seconds: f64,
    pub horizon: HorizonPolicy,
    pub periods: f64,
}

impl Default for PropagationSettings {
    fn default() -> Self {
        Self {
            integrator: IntegratorSettings::default(),
            num_points: 360,
            progress_batches: 20,
            atmosphere_step_s: 1.0,
            reentry_max_seconds: 10_800.0,
            horizon: HorizonPolicy::default(),
            periods: 1.0,
        }
    }
}

impl PropagationSettings {
    pub fn from_config(config: &PropagationConfig) -> Self {
        let integrator = &config.integrator;
        Self {
            integrator: IntegratorSettings {
                abs_tol: integrator.abs_tol,
                rel_tol: integrator.rel_tol,
                sensitivity_scale: integrator.sensitivity_scale,
                max_step_s: integrator.max_step_s,
                min_step_s: integrator.min_step_s,
                max_steps: integrator.max_steps,
            },
            num_points: config.num_points,
            progress_batches: config.progress_batches,
            atmosphere_step_s: config.atmosphere_step_s,
            reentry_max_seconds: config.reentry_max_seconds,
            horizon: HorizonPolicy {
                fallback_horizon_s: days_to_seconds(config.horizon.fallback_days),
                near_parabolic_eccentricity: config.horizon.near_parabolic_eccentricity,
            },
            periods: config.horizon.periods,
        }
    }
}
