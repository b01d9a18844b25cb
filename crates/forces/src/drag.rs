//! Drag against a co-rotating exponential atmosphere.

use orrery_core::units::km_to_m;
use orrery_core::vector::{self, Vector3};

use crate::atmosphere::PlanetEnvironment;

/// Drag acceleration (km/s²) on a body with ballistic coefficient `m / (Cd·A)` (kg/m²).
///
/// Density comes from the environment's atmosphere at altitude `|r| − R` and is zero
/// outside `(0, cutoff]`. The flow velocity is `v − ω ẑ × r`.
pub fn drag_acceleration(
    position: &Vector3,
    velocity: &Vector3,
    ballistic_coefficient: f64,
    environment: &PlanetEnvironment,
) -> Vector3 {
    if !(ballistic_coefficient > 0.0) {
        return vector::ZERO;
    }
    let altitude = vector::norm(position) - environment.radius_km;
    let density = environment.density_at(altitude);
    if density <= 0.0 {
        return vector::ZERO;
    }

    let omega = environment.rotation_rate_rad_s;
    let atmosphere_velocity = [-omega * position[1], omega * position[0], 0.0];
    let v_rel = vector::sub(velocity, &atmosphere_velocity);
    let speed = vector::norm(&v_rel);
    if speed == 0.0 {
        return vector::ZERO;
    }

    // ½ρv² / Bc with v in m/s gives m/s²; divide by 1000 for km/s²
    let magnitude_m_s2 = 0.5 * density * km_to_m(speed).powi(2) / ballistic_coefficient;
    let magnitude = magnitude_m_s2 / 1_000.0;
    vector::scale(&v_rel, -magnitude / speed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Atmosphere;

    #[test]
    fn opposes_relative_velocity_in_non_rotating_atmosphere() {
        let env = PlanetEnvironment {
            radius_km: 6_378.0,
            rotation_rate_rad_s: 0.0,
            atmosphere: Some(Atmosphere::earth()),
        };
        let a = drag_acceleration(&[6_478.0, 0.0, 0.0], &[0.0, 7.8, 0.0], 50.0, &env);
        assert_eq!(a[0], 0.0);
        assert!(a[1] < 0.0);
        assert_eq!(a[2], 0.0);
    }

    #[test]
    fn co_rotating_body_feels_no_drag() {
        let env = PlanetEnvironment::earth();
        let r = [env.radius_km + 50.0, 0.0, 0.0];
        let v = [0.0, env.rotation_rate_rad_s * r[0], 0.0];
        assert_eq!(drag_acceleration(&r, &v, 50.0, &env), vector::ZERO);
    }
}
