//! Numerical integration of a point mass under an acceleration field.
//!
//! [`AdaptiveIntegrator`] is the workhorse for orbit stepping; [`FixedStepIntegrator`]
//! is the explicit-Euler stepper used once a trajectory has dropped into the atmosphere.

pub mod adaptive;
pub mod fixed;

pub use adaptive::{AdaptiveIntegrator, Integration, IntegrationStats, IntegratorSettings};
pub use fixed::{FixedStepIntegrator, euler_step};

use orrery_core::vector::Vector3;
use orrery_forces::ForceModel;
use thiserror::Error;

/// Anything that yields an acceleration (km/s²) for a position and velocity.
pub trait Acceleration {
    fn acceleration(&self, position: &Vector3, velocity: &Vector3) -> Vector3;
}

impl Acceleration for ForceModel<'_> {
    fn acceleration(&self, position: &Vector3, velocity: &Vector3) -> Vector3 {
        ForceModel::acceleration(self, position, velocity)
    }
}

impl<T: Acceleration + ?Sized> Acceleration for &T {
    fn acceleration(&self, position: &Vector3, velocity: &Vector3) -> Vector3 {
        (**self).acceleration(position, velocity)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntegrationError {
    #[error("integration duration must be non-negative and finite (got {0} s)")]
    InvalidDuration(f64),
    #[error("invalid integrator settings: {0}")]
    InvalidSettings(&'static str),
    #[error(
        "step size stagnated at {step_s:e} s after {elapsed_s:.3} s (normalized error {error:.3e})"
    )]
    Stagnation {
        elapsed_s: f64,
        step_s: f64,
        error: f64,
    },
    #[error("exceeded {max_steps} step attempts after {elapsed_s:.3} s")]
    MaxStepsExceeded { max_steps: usize, elapsed_s: f64 },
    #[error("state became non-finite after {elapsed_s:.3} s")]
    NonFiniteState { elapsed_s: f64 },
}
