//! Flying a time-ordered list of impulsive burns.

use orrery_core::{StateVector, Vector3};
use orrery_forces::ForceModel;
use orrery_integrator::{AdaptiveIntegrator, IntegrationStats};
use orrery_maneuver::Maneuver;
use tracing::debug;

use crate::PropagationError;

/// A burn as it was actually applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExecutedBurn {
    pub time_s: f64,
    pub delta_v_inertial_km_s: Vector3,
    pub state_before: StateVector,
    pub state_after: StateVector,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SequenceOutcome {
    /// State right after the last burn.
    pub state: StateVector,
    pub time_s: f64,
    pub burns: Vec<ExecutedBurn>,
    pub stats: IntegrationStats,
}

impl SequenceOutcome {
    pub fn total_delta_v_km_s(&self) -> f64 {
        self.burns
            .iter()
            .map(|b| orrery_core::vector::norm(&b.delta_v_inertial_km_s))
            .sum()
    }
}

/// Integrate from `start_time_s` to each burn in turn and apply it.
///
/// Burns must be in non-decreasing time order and none may precede `start_time_s`.
/// Local-frame burns are resolved against the state reached at their execution time.
pub fn execute_maneuvers(
    initial: &StateVector,
    start_time_s: f64,
    maneuvers: &[Maneuver],
    forces: &ForceModel<'_>,
    integrator: &AdaptiveIntegrator,
) -> Result<SequenceOutcome, PropagationError> {
    forces.validate()?;
    let mut state = *initial;
    let mut time = start_time_s;
    let mut burns = Vec::with_capacity(maneuvers.len());
    let mut stats = IntegrationStats::default();

    for maneuver in maneuvers {
        let t_burn = maneuver.execution_time_s;
        if !t_burn.is_finite() || t_burn < time {
            return Err(PropagationError::InvalidRequest(format!(
                "burn at {t_burn} s is before the current time {time} s"
            )));
        }

        let coast = integrator.integrate(&state, t_burn - time, forces)?;
        stats.accepted_steps += coast.stats.accepted_steps;
        stats.rejected_steps += coast.stats.rejected_steps;
        stats.acceleration_evaluations += coast.stats.acceleration_evaluations;
        if coast.stats.accepted_steps > 0 {
            stats.last_step_s = coast.stats.last_step_s;
        }

        let before = coast.state;
        let delta_v = maneuver.inertial_delta_v(&before)?;
        state = before.with_delta_v(&delta_v);
        time = t_burn;
        debug!(time_s = time, dv = maneuver.magnitude_km_s(), "burn executed");
        burns.push(ExecutedBurn {
            time_s: time,
            delta_v_inertial_km_s: delta_v,
            state_before: before,
            state_after: state,
        });
    }

    Ok(SequenceOutcome {
        state,
        time_s: time,
        burns,
        stats,
    })
}
