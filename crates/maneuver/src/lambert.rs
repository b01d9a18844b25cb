use lambert_bate::get_velocities;
use orrery_core::Vector3;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LambertSolverError {
    #[error("lambert solver failed: {0}")]
    Failure(String),
}

/// Departure and arrival velocities (km/s) of the conic joining `r1_km` and `r2_km` in
/// `time_of_flight_s`. `short` selects the transfer angle below 180°.
pub fn solve(
    r1_km: Vector3,
    r2_km: Vector3,
    time_of_flight_s: f64,
    mu_km3_s2: f64,
    short: bool,
) -> Result<(Vector3, Vector3), LambertSolverError> {
    get_velocities(r1_km, r2_km, time_of_flight_s, mu_km3_s2, short, 1e-8, 500)
        .map_err(|e| LambertSolverError::Failure(format!("{e:?}")))
}
