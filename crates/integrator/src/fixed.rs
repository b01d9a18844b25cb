use orrery_core::StateVector;
use orrery_core::vector;

use crate::Acceleration;

/// One explicit-Euler step: both updates use the state at the start of the step.
pub fn euler_step<A: Acceleration + ?Sized>(
    state: &StateVector,
    dt: f64,
    forces: &A,
) -> StateVector {
    let acc = forces.acceleration(&state.position, &state.velocity);
    StateVector {
        position: vector::add_scaled(&state.position, &state.velocity, dt),
        velocity: vector::add_scaled(&state.velocity, &acc, dt),
    }
}

/// Fixed-step explicit Euler integrator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedStepIntegrator {
    pub step_s: f64,
}

impl Default for FixedStepIntegrator {
    fn default() -> Self {
        Self { step_s: 1.0 }
    }
}

impl FixedStepIntegrator {
    pub fn new(step_s: f64) -> Self {
        Self { step_s }
    }

    pub fn step<A: Acceleration + ?Sized>(&self, state: &StateVector, forces: &A) -> StateVector {
        euler_step(state, self.step_s, forces)
    }
}
