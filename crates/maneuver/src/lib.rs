//! Impulsive maneuver planning.
//!
//! Planners return [`Maneuver`] records; applying them to a trajectory is the
//! propagation layer's job. All planners take the current time `now_s` so execution
//! times can be expressed on the caller's clock.

pub mod intercept;
pub mod lambert;
pub mod maneuver;
pub mod plane;
pub mod request;
pub mod transfers;

pub use intercept::{InterceptPlan, plan_hohmann_intercept, plan_lambert_intercept};
pub use lambert::{LambertSolverError, solve as lambert_solve};
pub use maneuver::{LocalFrame, Maneuver, ManeuverFrame};
pub use plane::{
    PlaneChangingTransfer, orbit_normal, plan_hohmann_plane_change, plan_plane_change,
    plane_change_delta_v,
};
pub use request::{ManeuverKind, ManeuverRequest, PlaneTarget, plan};
pub use transfers::{
    BurnTiming, HohmannResult, hohmann, plan_circularization, plan_circularization_at,
    plan_hohmann_transfer,
};

use orrery_elements::ElementsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManeuverError {
    #[error(transparent)]
    Elements(#[from] ElementsError),
    #[error(transparent)]
    Lambert(#[from] LambertSolverError),
    #[error("invalid maneuver request: {0}")]
    InvalidRequest(String),
}

pub(crate) fn check_positive(name: &str, value: f64) -> Result<(), ManeuverError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ManeuverError::InvalidRequest(format!(
            "{name} must be positive and finite (got {value})"
        )))
    }
}
