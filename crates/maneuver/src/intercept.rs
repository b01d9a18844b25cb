//! Rendezvous planning against a target on its own orbit.

use std::f64::consts::{PI, TAU};

use orrery_core::StateVector;
use orrery_core::vector;
use orrery_elements::{OrbitalElements, advance_state};
use tracing::debug;

use crate::{Maneuver, ManeuverError, check_positive, hohmann, lambert};

/// Two burns that put the chaser alongside the target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterceptPlan {
    pub maneuvers: [Maneuver; 2],
    pub departure_time_s: f64,
    pub arrival_time_s: f64,
    pub total_delta_v_km_s: f64,
}

/// Phase the chaser until a Hohmann transfer to the target's radius arrives where the
/// target will be, then transfer.
///
/// Both orbits are treated as circular and coplanar with radii `|r|`. The phase angle is
/// measured in the chaser's orbital plane.
pub fn plan_hohmann_intercept(
    chaser: &StateVector,
    target: &StateVector,
    mu: f64,
    now_s: f64,
) -> Result<InterceptPlan, ManeuverError> {
    OrbitalElements::from_state(chaser, mu, None)?;
    OrbitalElements::from_state(target, mu, None)?;
    let r1 = chaser.radius();
    let r2 = target.radius();
    let transfer = hohmann(r1, r2, mu)?;

    let chaser_rate = (mu / r1.powi(3)).sqrt();
    let target_rate = (mu / r2.powi(3)).sqrt();
    let relative_rate = target_rate - chaser_rate;
    if relative_rate.abs() < 1e-15 {
        return Err(ManeuverError::InvalidRequest(
            "chaser and target share an orbit radius, phasing never converges".to_string(),
        ));
    }

    let normal = vector::normalize(&chaser.angular_momentum());
    let current_phase = vector::dot(&normal, &vector::cross(&chaser.position, &target.position))
        .atan2(vector::dot(&chaser.position, &target.position));
    let required_phase = PI - target_rate * transfer.tof_seconds;
    let wait = ((required_phase - current_phase) * relative_rate.signum()).rem_euclid(TAU)
        / relative_rate.abs();

    let departure = now_s + wait;
    let arrival = departure + transfer.tof_seconds;
    debug!(
        current_phase,
        required_phase,
        wait_s = wait,
        "planned Hohmann intercept"
    );
    Ok(InterceptPlan {
        maneuvers: [
            Maneuver::prograde(departure, transfer.dv1_km_s),
            Maneuver::prograde(arrival, transfer.dv2_km_s),
        ],
        departure_time_s: departure,
        arrival_time_s: arrival,
        total_delta_v_km_s: transfer.dv_total_km_s,
    })
}

/// Depart now and meet the target after `time_of_flight_s`, solving Lambert's problem
/// between the chaser's position and the target's two-body position at arrival.
///
/// The transfer direction follows the chaser's sense of motion. The arrival burn matches
/// the target's velocity.
pub fn plan_lambert_intercept(
    chaser: &StateVector,
    target: &StateVector,
    time_of_flight_s: f64,
    mu: f64,
    now_s: f64,
) -> Result<InterceptPlan, ManeuverError> {
    check_positive("time of flight", time_of_flight_s)?;
    OrbitalElements::from_state(chaser, mu, None)?;
    let arrival_state = advance_state(target, time_of_flight_s, mu)?;

    let sweep = vector::cross(&chaser.position, &arrival_state.position);
    let short = vector::dot(&sweep, &chaser.angular_momentum()) >= 0.0;
    let (v_depart, v_arrive) = lambert::solve(
        chaser.position,
        arrival_state.position,
        time_of_flight_s,
        mu,
        short,
    )?;

    let dv1 = vector::sub(&v_depart, &chaser.velocity);
    let dv2 = vector::sub(&arrival_state.velocity, &v_arrive);
    let arrival = now_s + time_of_flight_s;
    let total = vector::norm(&dv1) + vector::norm(&dv2);
    debug!(short, total_delta_v = total, "planned Lambert intercept");
    Ok(InterceptPlan {
        maneuvers: [
            Maneuver::inertial(now_s, dv1),
            Maneuver::inertial(arrival, dv2),
        ],
        departure_time_s: now_s,
        arrival_time_s: arrival,
        total_delta_v_km_s: total,
    })
}
