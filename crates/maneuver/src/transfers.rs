//! Coplanar circular-orbit transfers and circularization.

use std::f64::consts::PI;

use orrery_core::StateVector;
use orrery_elements::{OrbitalElements, state_at_anomaly, time_to_true_anomaly};
use serde::Deserialize;
use tracing::debug;

use crate::{Maneuver, ManeuverError, check_positive};

/// Result for a Hohmann transfer between circular, coplanar orbits of radii r1 and r2.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HohmannResult {
    /// Departure burn along the velocity. Negative when transferring inward.
    pub dv1_km_s: f64,
    /// Arrival burn along the velocity. Negative when transferring inward.
    pub dv2_km_s: f64,
    /// Sum of the two burn magnitudes.
    pub dv_total_km_s: f64,
    /// Half the transfer-ellipse period.
    pub tof_seconds: f64,
    pub transfer_semi_major_axis_km: f64,
}

/// Classical Hohmann transfer between two circular coplanar orbits.
pub fn hohmann(r1_km: f64, r2_km: f64, mu_km3_s2: f64) -> Result<HohmannResult, ManeuverError> {
    check_positive("initial radius", r1_km)?;
    check_positive("target radius", r2_km)?;
    check_positive("gravitational parameter", mu_km3_s2)?;

    let v1 = (mu_km3_s2 / r1_km).sqrt();
    let v2 = (mu_km3_s2 / r2_km).sqrt();
    let a_t = 0.5 * (r1_km + r2_km);
    let tof = PI * (a_t.powi(3) / mu_km3_s2).sqrt();

    // vis-viva at each end of the transfer ellipse
    let v_t1 = (mu_km3_s2 * (2.0 / r1_km - 1.0 / a_t)).sqrt();
    let v_t2 = (mu_km3_s2 * (2.0 / r2_km - 1.0 / a_t)).sqrt();

    let dv1 = v_t1 - v1;
    let dv2 = v2 - v_t2;

    Ok(HohmannResult {
        dv1_km_s: dv1,
        dv2_km_s: dv2,
        dv_total_km_s: dv1.abs() + dv2.abs(),
        tof_seconds: tof,
        transfer_semi_major_axis_km: a_t,
    })
}

/// Two prograde burns taking the current orbit radius `|r|` to `target_radius_km`.
///
/// The first burn executes at `now_s`, the second half a transfer period later.
pub fn plan_hohmann_transfer(
    state: &StateVector,
    target_radius_km: f64,
    mu: f64,
    now_s: f64,
) -> Result<[Maneuver; 2], ManeuverError> {
    // surfaces degenerate states before any speed is computed
    OrbitalElements::from_state(state, mu, None)?;
    let r1 = state.radius();
    let transfer = hohmann(r1, target_radius_km, mu)?;
    debug!(
        r1_km = r1,
        r2_km = target_radius_km,
        dv_total = transfer.dv_total_km_s,
        "planned Hohmann transfer"
    );
    Ok([
        Maneuver::prograde(now_s, transfer.dv1_km_s),
        Maneuver::prograde(now_s + transfer.tof_seconds, transfer.dv2_km_s),
    ])
}

/// Where along the orbit a circularization burn happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BurnTiming {
    #[default]
    Immediate,
    Periapsis,
    Apoapsis,
}

/// Prograde burn matching circular speed at the current radius, executed at `now_s`.
pub fn plan_circularization(
    state: &StateVector,
    mu: f64,
    now_s: f64,
) -> Result<Maneuver, ManeuverError> {
    plan_circularization_at(state, mu, now_s, BurnTiming::Immediate)
}

/// Circularization burn, either now or at the next apsis.
///
/// At an apsis the velocity is purely horizontal, so the prograde burn leaves a circular
/// orbit. Apoapsis timing requires a bound orbit.
pub fn plan_circularization_at(
    state: &StateVector,
    mu: f64,
    now_s: f64,
    timing: BurnTiming,
) -> Result<Maneuver, ManeuverError> {
    let elements = OrbitalElements::from_state(state, mu, None)?;
    let (burn_state, wait) = match timing {
        BurnTiming::Immediate => (*state, 0.0),
        BurnTiming::Periapsis => apsis_state(&elements, 0.0, mu)?,
        BurnTiming::Apoapsis => {
            if elements.is_hyperbolic() {
                return Err(ManeuverError::InvalidRequest(format!(
                    "open trajectory (e = {:.4}) has no apoapsis",
                    elements.eccentricity
                )));
            }
            apsis_state(&elements, PI, mu)?
        }
    };

    let circular_speed = (mu / burn_state.radius()).sqrt();
    let delta_v = circular_speed - burn_state.speed();
    debug!(?timing, wait_s = wait, delta_v, "planned circularization");
    Ok(Maneuver::prograde(now_s + wait, delta_v))
}

fn apsis_state(
    elements: &OrbitalElements,
    true_anomaly: f64,
    mu: f64,
) -> Result<(StateVector, f64), ManeuverError> {
    let wait = time_to_true_anomaly(elements, true_anomaly, mu)?;
    let state = state_at_anomaly(elements, true_anomaly, mu)?;
    Ok((state, wait))
}
