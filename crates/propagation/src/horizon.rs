//! How long a prediction should run for a given orbit shape.

use orrery_core::time::days_to_seconds;
use orrery_elements::OrbitalElements;

/// Horizon selection for predicted trajectories.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizonPolicy {
    /// Span used for open and near-parabolic orbits.
    pub fallback_horizon_s: f64,
    pub near_parabolic_eccentricity: f64,
}

impl Default for HorizonPolicy {
    fn default() -> Self {
        Self {
            fallback_horizon_s: days_to_seconds(30.0),
            near_parabolic_eccentricity: 0.99,
        }
    }
}

/// `period × periods` for bound orbits, the fallback once `e` reaches the near-parabolic
/// threshold or no period exists.
pub fn prediction_horizon(elements: &OrbitalElements, periods: f64, policy: &HorizonPolicy) -> f64 {
    match elements.period_s {
        Some(period) if elements.eccentricity < policy.near_parabolic_eccentricity => {
            period * periods
        }
        _ => policy.fallback_horizon_s,
    }
}
