//! Orbital-plane changes.

use orrery_core::StateVector;
use orrery_core::vector::{self, Vector3};
use orrery_elements::{OrbitalElements, advance_state, state_at_anomaly, time_to_true_anomaly};
use tracing::debug;

use crate::{Maneuver, ManeuverError, hohmann};

/// Sine of the plane-separation angle below which two planes are treated as one.
const COPLANAR_TOLERANCE: f64 = 1e-12;

/// Unit normal of the plane with inclination `i` and node `Ω` (radians).
pub fn orbit_normal(inclination: f64, raan: f64) -> Vector3 {
    let (sin_i, cos_i) = inclination.sin_cos();
    let (sin_raan, cos_raan) = raan.sin_cos();
    [sin_i * sin_raan, -sin_i * cos_raan, cos_i]
}

/// `2·v·sin(Δi/2)` where Δi is the single angle between the two plane normals.
pub fn plane_change_delta_v(current_normal: &Vector3, target_normal: &Vector3, speed: f64) -> f64 {
    let delta_i = vector::angle_between(current_normal, target_normal);
    2.0 * speed * (0.5 * delta_i).sin()
}

/// Rotate the orbit into the plane with normal `target_normal` at the next common node.
///
/// The burn keeps radial speed and horizontal speed, only turning the horizontal
/// velocity into the new plane. The returned Δv is inertial.
pub fn plan_plane_change(
    state: &StateVector,
    target_normal: &Vector3,
    mu: f64,
    now_s: f64,
) -> Result<Maneuver, ManeuverError> {
    let elements = OrbitalElements::from_state(state, mu, None)?;
    let target = unit_target(target_normal)?;

    // coplanar or exactly reversed: every point lies on both planes
    let Some((wait, burn_state)) = next_node(state, &elements, &target, mu)? else {
        let delta_v = rotated_velocity_delta(state, &target);
        return Ok(Maneuver::inertial(now_s, delta_v));
    };

    let delta_v = rotated_velocity_delta(&burn_state, &target);
    debug!(wait_s = wait, delta_v = vector::norm(&delta_v), "planned plane change");
    Ok(Maneuver::inertial(now_s + wait, delta_v))
}

/// A Hohmann transfer whose arrival burn also rotates the orbit into a new plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneChangingTransfer {
    /// Prograde departure burn at a node, then the inertial combined arrival burn.
    pub maneuvers: [Maneuver; 2],
    /// Cost of rotating the target circular velocity on its own, `2·√(μ/r₂)·sin(Δi/2)`.
    pub plane_change_delta_v_km_s: f64,
    /// Magnitude of the combined arrival burn.
    pub arrival_delta_v_km_s: f64,
}

impl PlaneChangingTransfer {
    pub fn total_delta_v_km_s(&self) -> f64 {
        self.maneuvers.iter().map(Maneuver::magnitude_km_s).sum()
    }
}

/// Hohmann transfer to `target_radius_km` that ends circular in the plane with normal
/// `target_normal`.
///
/// The departure waits for the next node of the target plane so that the transfer
/// apoapsis lies on the node line. There the arrival burn turns the transfer velocity
/// into circular velocity in the target plane in a single impulse. Coplanar targets
/// depart at `now_s`.
pub fn plan_hohmann_plane_change(
    state: &StateVector,
    target_radius_km: f64,
    target_normal: &Vector3,
    mu: f64,
    now_s: f64,
) -> Result<PlaneChangingTransfer, ManeuverError> {
    let elements = OrbitalElements::from_state(state, mu, None)?;
    let target = unit_target(target_normal)?;
    let current = vector::normalize(&state.angular_momentum());
    let (wait, departure) = next_node(state, &elements, &target, mu)?.unwrap_or((0.0, *state));

    let transfer = hohmann(departure.radius(), target_radius_km, mu)?;
    let first = Maneuver::prograde(now_s + wait, transfer.dv1_km_s);
    let arrival = advance_state(&first.apply(&departure)?, transfer.tof_seconds, mu)?;

    let circular_speed = (mu / target_radius_km).sqrt();
    let r_hat = vector::normalize(&arrival.position);
    let along_track = vector::normalize(&vector::cross(&target, &r_hat));
    let delta_v = vector::sub(&vector::scale(&along_track, circular_speed), &arrival.velocity);
    let second = Maneuver::inertial(now_s + wait + transfer.tof_seconds, delta_v);

    let plane_change = plane_change_delta_v(&current, &target, circular_speed);
    let arrival_delta_v = vector::norm(&delta_v);
    debug!(
        wait_s = wait,
        plane_change_dv = plane_change,
        arrival_dv = arrival_delta_v,
        separate_dv = transfer.dv2_km_s.abs() + plane_change,
        "planned plane-changing Hohmann transfer"
    );
    Ok(PlaneChangingTransfer {
        maneuvers: [first, second],
        plane_change_delta_v_km_s: plane_change,
        arrival_delta_v_km_s: arrival_delta_v,
    })
}

fn unit_target(target_normal: &Vector3) -> Result<Vector3, ManeuverError> {
    let target = vector::normalize(target_normal);
    if target == vector::ZERO {
        return Err(ManeuverError::InvalidRequest(
            "target plane normal must be non-zero".to_string(),
        ));
    }
    Ok(target)
}

/// Wait and state at the nearer crossing of the line shared with the target plane.
///
/// `None` when the planes coincide or are reversed, so that no single node exists.
fn next_node(
    state: &StateVector,
    elements: &OrbitalElements,
    target: &Vector3,
    mu: f64,
) -> Result<Option<(f64, StateVector)>, ManeuverError> {
    let current = vector::normalize(&state.angular_momentum());
    let line = vector::cross(&current, target);
    if vector::norm(&line) < COPLANAR_TOLERANCE {
        return Ok(None);
    }

    let node = vector::normalize(&line);
    let periapsis = vector::normalize(&state_at_anomaly(elements, 0.0, mu)?.position);
    let in_plane = vector::cross(&current, &periapsis);

    let mut best: Option<(f64, StateVector)> = None;
    for direction in [node, vector::neg(&node)] {
        let anomaly = vector::dot(&direction, &in_plane).atan2(vector::dot(&direction, &periapsis));
        let Ok(wait) = time_to_true_anomaly(elements, anomaly, mu) else {
            continue;
        };
        if best.as_ref().is_none_or(|(w, _)| wait < *w) {
            best = Some((wait, state_at_anomaly(elements, anomaly, mu)?));
        }
    }

    best.map(Some).ok_or_else(|| {
        ManeuverError::InvalidRequest("trajectory never reaches a node of the target plane".into())
    })
}

/// `v_new − v` where `v_new` keeps the radial component and horizontal speed of `v` but
/// moves prograde in the plane with unit normal `target`.
fn rotated_velocity_delta(state: &StateVector, target: &Vector3) -> Vector3 {
    let r_hat = vector::normalize(&state.position);
    let radial_speed = vector::dot(&state.velocity, &r_hat);
    let horizontal = vector::add_scaled(&state.velocity, &r_hat, -radial_speed);
    let along_track = vector::cross(target, &r_hat);
    let new_velocity = vector::add_scaled(
        &vector::scale(&r_hat, radial_speed),
        &along_track,
        vector::norm(&horizontal),
    );
    vector::sub(&new_velocity, &state.velocity)
}
