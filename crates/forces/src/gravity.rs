//! Point-mass gravity from a primary plus third-body perturbers.

use orrery_core::Body;
use orrery_core::vector::{self, Vector3};

/// Acceleration (km/s²) at `position` from `bodies`.
///
/// `bodies[0]` attracts directly. Every other body contributes the differential
/// third-body term `μ_k[(r_k − r)/|r_k − r|³ − r_k/|r_k|³]` scaled by `perturbation_scale`.
/// Positions are relative to the primary. Coincident positions are skipped and an empty
/// slice yields zero.
pub fn gravity_acceleration(
    position: &Vector3,
    bodies: &[Body],
    perturbation_scale: f64,
) -> Vector3 {
    let Some((primary, perturbers)) = bodies.split_first() else {
        return vector::ZERO;
    };

    let mut acc = point_mass(position, primary);
    if perturbation_scale == 0.0 {
        return acc;
    }

    for body in perturbers {
        let mu = body.mu();
        let direct = point_mass(position, body);
        let body_distance = vector::norm(&body.position);
        if body_distance == 0.0 {
            acc = vector::add_scaled(&acc, &direct, perturbation_scale);
            continue;
        }
        let indirect = vector::scale(&body.position, mu / body_distance.powi(3));
        let perturbation = vector::sub(&direct, &indirect);
        acc = vector::add_scaled(&acc, &perturbation, perturbation_scale);
    }
    acc
}

/// Oblateness acceleration (km/s²) of the primary's `J2` zonal harmonic.
///
/// The symmetry axis is +z, the same axis the atmosphere rotates about. `reference_radius_km`
/// is the equatorial radius `J2` is referred to. Zero at the origin.
pub fn j2_acceleration(position: &Vector3, mu: f64, j2: f64, reference_radius_km: f64) -> Vector3 {
    let r2 = vector::norm_squared(position);
    if r2 == 0.0 || j2 == 0.0 {
        return vector::ZERO;
    }
    let r = r2.sqrt();
    let z2_over_r2 = position[2] * position[2] / r2;
    let k = -1.5 * j2 * mu * reference_radius_km * reference_radius_km / (r2 * r2 * r);
    [
        k * position[0] * (1.0 - 5.0 * z2_over_r2),
        k * position[1] * (1.0 - 5.0 * z2_over_r2),
        k * position[2] * (3.0 - 5.0 * z2_over_r2),
    ]
}

/// `μ(r_b − r)/|r_b − r|³`, zero when the two points coincide.
fn point_mass(position: &Vector3, body: &Body) -> Vector3 {
    let offset = vector::sub(&body.position, position);
    let distance = vector::norm(&offset);
    if distance == 0.0 || !distance.is_finite() {
        return vector::ZERO;
    }
    vector::scale(&offset, body.mu() / distance.powi(3))
}
