//! Fixed-step descent through the atmosphere.

use std::ops::ControlFlow;

use orrery_core::StateVector;
use orrery_forces::ForceModel;
use orrery_integrator::{IntegrationError, euler_step};
use tracing::{debug, warn};

use crate::{PropagationError, PropagationHost, Termination, Trajectory, TrajectorySample};

/// Iterations between host checkpoints.
const CHECKPOINT_INTERVAL: usize = 20;

/// Explicit-Euler integration at `dt` until impact (`|r| ≤ R`) or `max_seconds`.
///
/// The final step is shortened so the trajectory never runs past `max_seconds`. The host
/// sees `elapsed / max_seconds` every few steps and `1.0` once the descent ends.
pub fn propagate_atmosphere<H: PropagationHost + ?Sized>(
    initial: &StateVector,
    forces: &ForceModel<'_>,
    max_seconds: f64,
    dt: f64,
    host: &mut H,
) -> Result<Trajectory, PropagationError> {
    if !(dt > 0.0 && dt.is_finite()) {
        return Err(PropagationError::InvalidRequest(format!(
            "atmosphere step must be positive (got {dt} s)"
        )));
    }
    if !(max_seconds >= 0.0 && max_seconds.is_finite()) {
        return Err(PropagationError::InvalidRequest(format!(
            "re-entry time limit must be non-negative (got {max_seconds} s)"
        )));
    }
    forces.validate()?;
    let surface = forces.environment.radius_km;

    let mut samples = vec![TrajectorySample::new(initial, 0.0)];
    let mut state = *initial;
    let mut elapsed = 0.0;
    let mut iterations = 0usize;

    let termination = loop {
        if state.radius() <= surface {
            debug!(time_s = elapsed, "impact");
            break Termination::Impact;
        }
        if elapsed >= max_seconds {
            break Termination::Completed;
        }

        let step = dt.min(max_seconds - elapsed);
        state = euler_step(&state, step, forces);
        if !state.is_finite() {
            return Err(IntegrationError::NonFiniteState { elapsed_s: elapsed }.into());
        }
        elapsed = if step < dt { max_seconds } else { elapsed + step };
        iterations += 1;
        samples.push(TrajectorySample::new(&state, elapsed));

        if iterations % CHECKPOINT_INTERVAL == 0 {
            let progress = if max_seconds > 0.0 { elapsed / max_seconds } else { 1.0 };
            if let ControlFlow::Break(()) = host.checkpoint(progress) {
                warn!(time_s = elapsed, "atmospheric propagation cancelled by host");
                break Termination::Cancelled;
            }
        }
    };

    if termination != Termination::Cancelled {
        let _ = host.checkpoint(1.0);
    }
    Ok(Trajectory {
        samples,
        termination,
    })
}
