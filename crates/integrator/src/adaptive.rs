//! Two-stage adaptive integrator with acceleration-sensitive error control.

use orrery_core::StateVector;
use orrery_core::vector::{self, Vector3};
use tracing::{debug, trace, warn};

use crate::{Acceleration, IntegrationError};

const SAFETY: f64 = 0.9;
const MAX_GROWTH: f64 = 5.0;
const MAX_SHRINK: f64 = 0.2;
const ERROR_EXPONENT: f64 = -0.2;

/// Tolerances and step bounds for [`AdaptiveIntegrator`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegratorSettings {
    /// Absolute tolerance before acceleration tightening (km, km/s).
    pub abs_tol: f64,
    pub rel_tol: f64,
    /// Scales `|a|` inside `ln(1 + s·|a|)` when tightening the absolute tolerance.
    pub sensitivity_scale: f64,
    pub max_step_s: f64,
    /// Rejecting a step at this size is fatal.
    pub min_step_s: f64,
    /// Cap on step attempts (accepted plus rejected) per call.
    pub max_steps: usize,
}

impl Default for IntegratorSettings {
    fn default() -> Self {
        Self {
            abs_tol: 1e-6,
            rel_tol: 1e-6,
            sensitivity_scale: 1e3,
            max_step_s: 300.0,
            min_step_s: 1e-4,
            max_steps: 1_000_000,
        }
    }
}

impl IntegratorSettings {
    pub fn validate(&self) -> Result<(), IntegrationError> {
        if !(self.abs_tol > 0.0) || !(self.rel_tol >= 0.0) {
            return Err(IntegrationError::InvalidSettings("tolerances must be positive"));
        }
        if !(self.sensitivity_scale >= 0.0) {
            return Err(IntegrationError::InvalidSettings(
                "sensitivity scale must be non-negative",
            ));
        }
        if !(self.min_step_s > 0.0) || !(self.max_step_s >= self.min_step_s) {
            return Err(IntegrationError::InvalidSettings(
                "step bounds must satisfy 0 < min_step_s <= max_step_s",
            ));
        }
        if self.max_steps == 0 {
            return Err(IntegrationError::InvalidSettings("max_steps must be at least 1"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IntegrationStats {
    pub accepted_steps: usize,
    pub rejected_steps: usize,
    pub acceleration_evaluations: usize,
    /// Size of the last accepted step (s).
    pub last_step_s: f64,
}

/// End state of an [`AdaptiveIntegrator::integrate`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Integration {
    pub state: StateVector,
    pub stats: IntegrationStats,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AdaptiveIntegrator {
    pub settings: IntegratorSettings,
}

/// Per-call working state. Nothing here outlives one `integrate` call.
struct Scratch {
    state: StateVector,
    elapsed: f64,
    dt: f64,
    stats: IntegrationStats,
}

struct Trial {
    candidate: StateVector,
    error: f64,
}

impl AdaptiveIntegrator {
    pub fn new(settings: IntegratorSettings) -> Self {
        Self { settings }
    }

    /// Advance `initial` by `duration_s` seconds under `forces`.
    ///
    /// Zero duration returns the input unchanged. The first trial step is
    /// `min(max_step_s, duration_s)` and the last step is clamped to land exactly on
    /// `duration_s`.
    pub fn integrate<A: Acceleration + ?Sized>(
        &self,
        initial: &StateVector,
        duration_s: f64,
        forces: &A,
    ) -> Result<Integration, IntegrationError> {
        let settings = &self.settings;
        settings.validate()?;
        if !(duration_s >= 0.0) || !duration_s.is_finite() {
            return Err(IntegrationError::InvalidDuration(duration_s));
        }

        let mut scratch = Scratch {
            state: *initial,
            elapsed: 0.0,
            dt: settings.max_step_s.min(duration_s),
            stats: IntegrationStats::default(),
        };

        while scratch.elapsed < duration_s {
            let attempts = scratch.stats.accepted_steps + scratch.stats.rejected_steps;
            if attempts >= settings.max_steps {
                warn!(
                    max_steps = settings.max_steps,
                    elapsed_s = scratch.elapsed,
                    "step budget exhausted"
                );
                return Err(IntegrationError::MaxStepsExceeded {
                    max_steps: settings.max_steps,
                    elapsed_s: scratch.elapsed,
                });
            }

            let remaining = duration_s - scratch.elapsed;
            let dt = scratch.dt.min(remaining);
            let trial = self.trial_step(&scratch.state, dt, forces);
            scratch.stats.acceleration_evaluations += 2;
            let error = if trial.error.is_nan() { f64::INFINITY } else { trial.error };

            if error <= 1.0 {
                if !trial.candidate.is_finite() {
                    return Err(IntegrationError::NonFiniteState {
                        elapsed_s: scratch.elapsed,
                    });
                }
                scratch.state = trial.candidate;
                // The clamped final step lands on the end time exactly.
                scratch.elapsed = if dt == remaining {
                    duration_s
                } else {
                    scratch.elapsed + dt
                };
                scratch.stats.accepted_steps += 1;
                scratch.stats.last_step_s = dt;
                let growth = (SAFETY * error.powf(ERROR_EXPONENT)).min(MAX_GROWTH);
                scratch.dt = (dt * growth).min(settings.max_step_s);
                trace!(dt, error, elapsed_s = scratch.elapsed, "accepted step");
            } else {
                scratch.stats.rejected_steps += 1;
                if dt <= settings.min_step_s {
                    warn!(dt, error, elapsed_s = scratch.elapsed, "integrator stagnated");
                    return Err(IntegrationError::Stagnation {
                        elapsed_s: scratch.elapsed,
                        step_s: dt,
                        error,
                    });
                }
                let shrink = (SAFETY * error.powf(ERROR_EXPONENT)).max(MAX_SHRINK);
                scratch.dt = (dt * shrink).max(settings.min_step_s);
                trace!(dt, error, next_dt = scratch.dt, "rejected step");
            }
        }

        debug!(
            duration_s,
            accepted = scratch.stats.accepted_steps,
            rejected = scratch.stats.rejected_steps,
            "integration complete"
        );
        Ok(Integration {
            state: scratch.state,
            stats: scratch.stats,
        })
    }

    fn trial_step<A: Acceleration + ?Sized>(
        &self,
        start: &StateVector,
        dt: f64,
        forces: &A,
    ) -> Trial {
        let r0 = &start.position;
        let v0 = &start.velocity;
        let a1 = forces.acceleration(r0, v0);

        let drift = vector::add_scaled(r0, v0, dt);
        let predicted_position = vector::add_scaled(&drift, &a1, 0.5 * dt * dt);
        let predicted_velocity = vector::add_scaled(v0, &a1, dt);
        let a2 = forces.acceleration(&predicted_position, &predicted_velocity);

        // r0 + v0·dt + (2a1 + a2)·dt²/6, v0 + (a1 + a2)·dt/2
        let weighted = vector::add_scaled(&a2, &a1, 2.0);
        let candidate = StateVector {
            position: vector::add_scaled(&drift, &weighted, dt * dt / 6.0),
            velocity: vector::add_scaled(v0, &vector::add(&a1, &a2), 0.5 * dt),
        };
        let extrapolated = StateVector {
            position: vector::add_scaled(&drift, &a2, 0.5 * dt * dt),
            velocity: vector::add_scaled(v0, &a2, dt),
        };

        let s = self.settings;
        let dynamic_abs = s.abs_tol / (1.0 + (s.sensitivity_scale * vector::norm(&a1)).ln_1p());
        let error = normalized_error(start, &candidate, &extrapolated, dynamic_abs, s.rel_tol);
        Trial { candidate, error }
    }
}

/// Worst componentwise `|candidate − extrapolated| / tol` over all six state components.
fn normalized_error(
    start: &StateVector,
    candidate: &StateVector,
    extrapolated: &StateVector,
    abs_tol: f64,
    rel_tol: f64,
) -> f64 {
    let component = |s: &Vector3, c: &Vector3, x: &Vector3| {
        (0..3).fold(0.0_f64, |worst, k| {
            let tol = abs_tol + rel_tol * s[k].abs().max(c[k].abs());
            let ratio = (c[k] - x[k]).abs() / tol;
            if ratio.is_nan() { f64::NAN } else { worst.max(ratio) }
        })
    };
    let position = component(&start.position, &candidate.position, &extrapolated.position);
    let velocity = component(&start.velocity, &candidate.velocity, &extrapolated.velocity);
    if position.is_nan() || velocity.is_nan() {
        f64::NAN
    } else {
        position.max(velocity)
    }
}
