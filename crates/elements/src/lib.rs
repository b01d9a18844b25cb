//! Orbital-element extraction, its inverse, and Kepler's equation.
//!
//! Everything here is pure two-body math: a state vector plus a gravitational parameter
//! in, elements or anomalies out. Angles in [`OrbitalElements`] are degrees; every
//! function argument that takes an angle takes radians.

pub mod elements;
pub mod kepler;

pub use elements::{
    CIRCULAR_TOLERANCE, EQUATORIAL_TOLERANCE, OrbitShape, OrbitalElements, calculate_elements,
    state_at_anomaly,
};
pub use kepler::{
    DEFAULT_KEPLER_TOLERANCE, MAX_KEPLER_ITERATIONS, PARABOLIC_TOLERANCE, advance_state,
    eccentric_from_true, mean_anomaly_from_true_anomaly, solve_keplers_equation,
    time_to_true_anomaly, true_anomaly_from_mean_anomaly, true_from_eccentric,
};

use thiserror::Error;

/// Failures surfaced by element extraction and anomaly conversion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ElementsError {
    #[error(
        "degenerate orbit: angular momentum {angular_momentum:e} km²/s cannot define an orbital plane"
    )]
    DegenerateOrbit { angular_momentum: f64 },
    #[error("gravitational parameter must be positive and finite (got {0})")]
    InvalidGravitationalParameter(f64),
    #[error("state vector contains non-finite components")]
    NonFiniteState,
    #[error("operation requires an elliptical orbit (eccentricity {eccentricity})")]
    NotElliptical { eccentricity: f64 },
    #[error(
        "Kepler's equation did not converge after {iterations} iterations (M = {mean_anomaly}, e = {eccentricity})"
    )]
    KeplerDidNotConverge {
        mean_anomaly: f64,
        eccentricity: f64,
        iterations: usize,
    },
    #[error("true anomaly {true_anomaly_deg:.3}° is not reachable on this trajectory")]
    UnreachableAnomaly { true_anomaly_deg: f64 },
}

/// Laplace sphere-of-influence radius `a·(m/M)^(2/5)` of a body orbiting a parent.
pub fn sphere_of_influence_radius(
    semi_major_axis_km: f64,
    body_mass_kg: f64,
    parent_mass_kg: f64,
) -> f64 {
    semi_major_axis_km * (body_mass_kg / parent_mass_kg).powf(0.4)
}

pub(crate) fn check_mu(mu: f64) -> Result<(), ElementsError> {
    if mu > 0.0 && mu.is_finite() {
        Ok(())
    } else {
        Err(ElementsError::InvalidGravitationalParameter(mu))
    }
}

/// Wrap an angle into `[0, 2π)`.
pub(crate) fn wrap_two_pi(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(std::f64::consts::TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= std::f64::consts::TAU { 0.0 } else { wrapped }
}
