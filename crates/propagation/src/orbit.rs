//! Sampled orbit propagation with re-entry handover.

use std::ops::ControlFlow;

use orrery_core::StateVector;
use orrery_elements::OrbitalElements;
use orrery_forces::ForceModel;
use orrery_integrator::AdaptiveIntegrator;
use tracing::{debug, info, warn};

use crate::host::RemainingProgress;
use crate::{
    PropagationError, PropagationHost, PropagationSettings, Termination, Trajectory,
    TrajectorySample, primary_mu, propagate_atmosphere,
};

/// Largest sample count a single request may ask for.
pub const MAX_ORBIT_POINTS: usize = 1_000_000;

/// What to sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitRequest {
    /// Span covered by the samples (s): an orbital period or a fallback horizon.
    pub period_s: f64,
    pub num_points: usize,
    /// Keep integrating through the atmosphere instead of resolving re-entry.
    pub allow_full_ellipse: bool,
}

/// Sample `request.num_points` evenly spaced states after `initial`.
///
/// The returned trajectory starts with `initial` at `t = 0`. When a bound orbit sinks to
/// the top of the atmosphere (or to the surface of an airless primary) the rest of the
/// path is resolved by [`propagate_atmosphere`] and the trajectory ends there. The descent
/// reports its progress on the part of `[0, 1]` the orbit had not covered yet.
pub fn propagate_orbit<H: PropagationHost + ?Sized>(
    initial: &StateVector,
    forces: &ForceModel<'_>,
    request: &OrbitRequest,
    settings: &PropagationSettings,
    host: &mut H,
) -> Result<Trajectory, PropagationError> {
    if request.num_points == 0 || request.num_points > MAX_ORBIT_POINTS {
        return Err(PropagationError::InvalidRequest(format!(
            "num_points must be between 1 and {MAX_ORBIT_POINTS} (got {})",
            request.num_points
        )));
    }
    if !(request.period_s > 0.0 && request.period_s.is_finite()) {
        return Err(PropagationError::InvalidRequest(format!(
            "propagation span must be positive and finite (got {} s)",
            request.period_s
        )));
    }
    let mu = primary_mu(forces)?;
    let elements =
        OrbitalElements::from_state(initial, mu, Some(forces.environment.radius_km))?;
    let hyperbolic = elements.is_hyperbolic();
    let resolve_reentry = !hyperbolic && !request.allow_full_ellipse;
    let reentry_radius = forces.reentry_radius();

    let integrator = AdaptiveIntegrator::new(settings.integrator);
    let dt = request.period_s / request.num_points as f64;
    let batch = request
        .num_points
        .div_ceil(settings.progress_batches.max(1))
        .max(1);
    debug!(
        e = elements.eccentricity,
        dt,
        points = request.num_points,
        hyperbolic,
        "propagating orbit"
    );

    let mut samples = Vec::with_capacity(request.num_points + 1);
    samples.push(TrajectorySample::new(initial, 0.0));
    let mut state = *initial;

    for i in 1..=request.num_points {
        state = integrator.integrate(&state, dt, forces)?.state;
        let t = i as f64 * dt;
        samples.push(TrajectorySample::new(&state, t));

        if resolve_reentry && state.radius() <= reentry_radius {
            info!(
                time_s = t,
                radius_km = state.radius(),
                "handing over to atmospheric propagation"
            );
            let handover_progress = i as f64 / request.num_points as f64;
            let descent = propagate_atmosphere(
                &state,
                forces,
                settings.reentry_max_seconds,
                settings.atmosphere_step_s,
                &mut RemainingProgress::new(host, handover_progress),
            )?;
            samples.extend(descent.samples.iter().skip(1).map(|s| TrajectorySample {
                time_offset_s: t + s.time_offset_s,
                ..*s
            }));
            return Ok(Trajectory {
                samples,
                termination: descent.termination,
            });
        }

        if i % batch == 0 && i < request.num_points {
            let progress = i as f64 / request.num_points as f64;
            if let ControlFlow::Break(()) = host.checkpoint(progress) {
                warn!(progress, "orbit propagation cancelled by host");
                return Ok(Trajectory {
                    samples,
                    termination: Termination::Cancelled,
                });
            }
        }
    }

    let _ = host.checkpoint(1.0);
    Ok(Trajectory {
        samples,
        termination: Termination::Completed,
    })
}
