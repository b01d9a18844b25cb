use orrery_core::{StateVector, Vector3};

/// One propagated point, `time_offset_s` seconds after the start of the call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectorySample {
    pub position: Vector3,
    pub velocity: Vector3,
    pub time_offset_s: f64,
}

impl TrajectorySample {
    pub fn new(state: &StateVector, time_offset_s: f64) -> Self {
        Self {
            position: state.position,
            velocity: state.velocity,
            time_offset_s,
        }
    }

    pub fn state(&self) -> StateVector {
        StateVector::new(self.position, self.velocity)
    }
}

/// Why a trajectory stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Ran for the whole requested span.
    Completed,
    /// Reached the primary's surface.
    Impact,
    /// The host asked to stop at a checkpoint.
    Cancelled,
}

/// Samples in strictly increasing time order, starting with the initial state at `t = 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    pub samples: Vec<TrajectorySample>,
    pub termination: Termination,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn last(&self) -> Option<&TrajectorySample> {
        self.samples.last()
    }

    pub fn duration_s(&self) -> f64 {
        self.last().map_or(0.0, |s| s.time_offset_s)
    }

    pub fn final_state(&self) -> Option<StateVector> {
        self.last().map(TrajectorySample::state)
    }
}
