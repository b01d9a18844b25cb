//! Cartesian state ⇄ classical orbital elements.

use std::f64::consts::TAU;

use orrery_core::StateVector;
use orrery_core::units::{deg_to_rad, rad_to_deg};
use orrery_core::vector::{self, UNIT_Z, Vector3};
use serde::{Deserialize, Serialize};

use crate::{ElementsError, check_mu, kepler, wrap_two_pi};

/// Below this eccentricity the periapsis direction is treated as undefined.
pub const CIRCULAR_TOLERANCE: f64 = 1e-9;
/// Node-vector length, relative to `h`, below which the orbit is treated as equatorial.
pub const EQUATORIAL_TOLERANCE: f64 = 1e-10;
/// `h / (r·v)` below which the trajectory is rectilinear.
const DEGENERATE_TOLERANCE: f64 = 1e-10;

/// Conic section classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrbitShape {
    Circular,
    Elliptical,
    Parabolic,
    Hyperbolic,
}

/// Osculating classical elements of a state about a single central body.
///
/// Angles are degrees. Fields that only exist for closed orbits are `None` otherwise, and
/// altitudes are only populated when a central-body radius was supplied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitalElements {
    /// Negative for hyperbolic trajectories, infinite for an exactly parabolic one.
    pub semi_major_axis_km: f64,
    pub eccentricity: f64,
    pub inclination_deg: f64,
    pub raan_deg: f64,
    pub argument_of_periapsis_deg: f64,
    pub true_anomaly_deg: f64,
    /// Elliptic, parabolic (Barker), or hyperbolic mean anomaly depending on shape.
    pub mean_anomaly_deg: f64,
    pub period_s: Option<f64>,
    pub specific_angular_momentum_km2_s: f64,
    pub specific_energy_km2_s2: f64,
    pub semi_latus_rectum_km: f64,
    pub periapsis_radius_km: f64,
    pub apoapsis_radius_km: Option<f64>,
    pub periapsis_altitude_km: Option<f64>,
    pub apoapsis_altitude_km: Option<f64>,
}

impl OrbitalElements {
    /// Elements of `state` about a body with parameter `mu`.
    pub fn from_state(
        state: &StateVector,
        mu: f64,
        central_radius_km: Option<f64>,
    ) -> Result<Self, ElementsError> {
        calculate_elements(&state.position, &state.velocity, mu, central_radius_km)
    }

    /// Closed-orbit elements from `a`, `e` and the classical angles in degrees.
    ///
    /// Angles are wrapped into `[0°, 360°)`. Altitudes stay unset.
    pub fn from_classical(
        semi_major_axis_km: f64,
        eccentricity: f64,
        inclination_deg: f64,
        raan_deg: f64,
        argument_of_periapsis_deg: f64,
        true_anomaly_deg: f64,
        mu: f64,
    ) -> Result<Self, ElementsError> {
        check_mu(mu)?;
        if !(0.0..1.0).contains(&eccentricity)
            || !(semi_major_axis_km > 0.0 && semi_major_axis_km.is_finite())
        {
            return Err(ElementsError::NotElliptical { eccentricity });
        }
        let a = semi_major_axis_km;
        let e = eccentricity;
        let semi_latus_rectum = a * (1.0 - e * e);
        let true_anomaly = wrap_two_pi(deg_to_rad(true_anomaly_deg));
        let mean_anomaly = kepler::mean_anomaly_unchecked(true_anomaly, e);

        Ok(Self {
            semi_major_axis_km: a,
            eccentricity: e,
            inclination_deg,
            raan_deg: raan_deg.rem_euclid(360.0),
            argument_of_periapsis_deg: argument_of_periapsis_deg.rem_euclid(360.0),
            true_anomaly_deg: rad_to_deg(true_anomaly),
            mean_anomaly_deg: rad_to_deg(mean_anomaly),
            period_s: Some(TAU * (a.powi(3) / mu).sqrt()),
            specific_angular_momentum_km2_s: (mu * semi_latus_rectum).sqrt(),
            specific_energy_km2_s2: -mu / (2.0 * a),
            semi_latus_rectum_km: semi_latus_rectum,
            periapsis_radius_km: a * (1.0 - e),
            apoapsis_radius_km: Some(a * (1.0 + e)),
            periapsis_altitude_km: None,
            apoapsis_altitude_km: None,
        })
    }

    pub fn inclination_rad(&self) -> f64 {
        deg_to_rad(self.inclination_deg)
    }

    pub fn raan_rad(&self) -> f64 {
        deg_to_rad(self.raan_deg)
    }

    pub fn argument_of_periapsis_rad(&self) -> f64 {
        deg_to_rad(self.argument_of_periapsis_deg)
    }

    pub fn true_anomaly_rad(&self) -> f64 {
        deg_to_rad(self.true_anomaly_deg)
    }

    pub fn mean_anomaly_rad(&self) -> f64 {
        deg_to_rad(self.mean_anomaly_deg)
    }

    pub fn shape(&self) -> OrbitShape {
        let e = self.eccentricity;
        if e < CIRCULAR_TOLERANCE {
            OrbitShape::Circular
        } else if (e - 1.0).abs() <= kepler::PARABOLIC_TOLERANCE {
            OrbitShape::Parabolic
        } else if e < 1.0 {
            OrbitShape::Elliptical
        } else {
            OrbitShape::Hyperbolic
        }
    }

    /// Open trajectory (`e ≥ 1`).
    pub fn is_hyperbolic(&self) -> bool {
        self.eccentricity >= 1.0
    }

    /// Mean motion (rad/s) for closed orbits.
    pub fn mean_motion(&self, mu: f64) -> Option<f64> {
        (self.eccentricity < 1.0 && self.semi_major_axis_km > 0.0)
            .then(|| (mu / self.semi_major_axis_km.powi(3)).sqrt())
    }

    /// Unit normal of the orbital plane.
    pub fn orbit_normal(&self) -> Vector3 {
        let (sin_i, cos_i) = self.inclination_rad().sin_cos();
        let (sin_raan, cos_raan) = self.raan_rad().sin_cos();
        [sin_i * sin_raan, -sin_i * cos_raan, cos_i]
    }
}

/// Extract classical elements from an inertial position (km) and velocity (km/s).
///
/// Conventions where an angle is undefined:
/// - circular (`e < CIRCULAR_TOLERANCE`): ω = 0 and the true anomaly is the argument of
///   latitude, or the true longitude when the orbit is also equatorial;
/// - equatorial: Ω = 0 and ω is the longitude of periapsis from +x, mirrored for
///   retrograde orbits so that [`state_at_anomaly`] reproduces the state.
///
/// A rectilinear trajectory (`h ≈ 0`) is reported as [`ElementsError::DegenerateOrbit`].
pub fn calculate_elements(
    position: &Vector3,
    velocity: &Vector3,
    mu: f64,
    central_radius_km: Option<f64>,
) -> Result<OrbitalElements, ElementsError> {
    check_mu(mu)?;
    if !vector::is_finite(position) || !vector::is_finite(velocity) {
        return Err(ElementsError::NonFiniteState);
    }

    let r = vector::norm(position);
    let v = vector::norm(velocity);
    let h_vec = vector::cross(position, velocity);
    let h = vector::norm(&h_vec);
    if r == 0.0 || h <= DEGENERATE_TOLERANCE * r * v {
        return Err(ElementsError::DegenerateOrbit { angular_momentum: h });
    }

    let inclination = (h_vec[2] / h).clamp(-1.0, 1.0).acos();
    let n_vec = vector::cross(&UNIT_Z, &h_vec);
    let n = vector::norm(&n_vec);
    let e_vec = vector::sub(
        &vector::scale(&vector::cross(velocity, &h_vec), 1.0 / mu),
        &vector::scale(position, 1.0 / r),
    );
    let e = vector::norm(&e_vec);
    let energy = 0.5 * v * v - mu / r;
    let semi_major_axis = -mu / (2.0 * energy);

    let equatorial = n <= EQUATORIAL_TOLERANCE * h;
    let circular = e < CIRCULAR_TOLERANCE;
    let retrograde = h_vec[2] < 0.0;

    let raan = if equatorial {
        0.0
    } else {
        let raan = (n_vec[0] / n).clamp(-1.0, 1.0).acos();
        if n_vec[1] < 0.0 { TAU - raan } else { raan }
    };

    let argument_of_periapsis = if circular {
        0.0
    } else if equatorial {
        planar_longitude(&e_vec, retrograde)
    } else {
        let omega = (vector::dot(&n_vec, &e_vec) / (n * e)).clamp(-1.0, 1.0).acos();
        if e_vec[2] < 0.0 { TAU - omega } else { omega }
    };

    let true_anomaly = if !circular {
        let f = (vector::dot(&e_vec, position) / (e * r)).clamp(-1.0, 1.0).acos();
        if vector::dot(position, velocity) < 0.0 { TAU - f } else { f }
    } else if equatorial {
        planar_longitude(position, retrograde)
    } else {
        let u = (vector::dot(&n_vec, position) / (n * r)).clamp(-1.0, 1.0).acos();
        if position[2] < 0.0 { TAU - u } else { u }
    };

    let semi_latus_rectum = h * h / mu;
    let periapsis_radius = semi_latus_rectum / (1.0 + e);
    let apoapsis_radius = (e < 1.0).then(|| semi_latus_rectum / (1.0 - e));
    let period = (energy < 0.0).then(|| TAU * (semi_major_axis.powi(3) / mu).sqrt());
    let mean_anomaly = kepler::mean_anomaly_unchecked(true_anomaly, e);

    Ok(OrbitalElements {
        semi_major_axis_km: semi_major_axis,
        eccentricity: e,
        inclination_deg: rad_to_deg(inclination),
        raan_deg: rad_to_deg(raan),
        argument_of_periapsis_deg: rad_to_deg(argument_of_periapsis),
        true_anomaly_deg: rad_to_deg(true_anomaly),
        mean_anomaly_deg: rad_to_deg(mean_anomaly),
        period_s: period,
        specific_angular_momentum_km2_s: h,
        specific_energy_km2_s2: energy,
        semi_latus_rectum_km: semi_latus_rectum,
        periapsis_radius_km: periapsis_radius,
        apoapsis_radius_km: apoapsis_radius,
        periapsis_altitude_km: central_radius_km.map(|radius| periapsis_radius - radius),
        apoapsis_altitude_km: central_radius_km
            .and_then(|radius| apoapsis_radius.map(|apo| apo - radius)),
    })
}

/// State at `true_anomaly` (radians) on the conic described by `elements`.
///
/// The perifocal state is rotated by ω about the angular-momentum axis, by i about the node
/// line, then by Ω about the reference pole.
pub fn state_at_anomaly(
    elements: &OrbitalElements,
    true_anomaly: f64,
    mu: f64,
) -> Result<StateVector, ElementsError> {
    check_mu(mu)?;
    let e = elements.eccentricity;
    let p = elements.semi_latus_rectum_km;
    let (sin_f, cos_f) = true_anomaly.sin_cos();
    let denom = 1.0 + e * cos_f;
    if denom <= 0.0 {
        return Err(ElementsError::UnreachableAnomaly {
            true_anomaly_deg: rad_to_deg(true_anomaly),
        });
    }

    let r = p / denom;
    let speed_scale = (mu / p).sqrt();
    let position_pf = [r * cos_f, r * sin_f, 0.0];
    let velocity_pf = [-speed_scale * sin_f, speed_scale * (e + cos_f), 0.0];

    Ok(StateVector::new(
        perifocal_to_inertial(&position_pf, elements),
        perifocal_to_inertial(&velocity_pf, elements),
    ))
}

fn perifocal_to_inertial(v: &Vector3, elements: &OrbitalElements) -> Vector3 {
    let v = rotate_z(v, elements.argument_of_periapsis_rad());
    let v = rotate_x(&v, elements.inclination_rad());
    rotate_z(&v, elements.raan_rad())
}

fn rotate_z(v: &Vector3, angle: f64) -> Vector3 {
    let (s, c) = angle.sin_cos();
    [c * v[0] - s * v[1], s * v[0] + c * v[1], v[2]]
}

fn rotate_x(v: &Vector3, angle: f64) -> Vector3 {
    let (s, c) = angle.sin_cos();
    [v[0], c * v[1] - s * v[2], s * v[1] + c * v[2]]
}

/// In-plane longitude of `v` from +x for an equatorial orbit.
fn planar_longitude(v: &Vector3, retrograde: bool) -> f64 {
    let longitude = v[1].atan2(v[0]);
    wrap_two_pi(if retrograde { -longitude } else { longitude })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotations_compose_to_standard_pqw_matrix() {
        let elements = OrbitalElements {
            semi_major_axis_km: 7000.0,
            eccentricity: 0.1,
            inclination_deg: 30.0,
            raan_deg: 40.0,
            argument_of_periapsis_deg: 50.0,
            true_anomaly_deg: 0.0,
            mean_anomaly_deg: 0.0,
            period_s: None,
            specific_angular_momentum_km2_s: 0.0,
            specific_energy_km2_s2: 0.0,
            semi_latus_rectum_km: 6930.0,
            periapsis_radius_km: 6300.0,
            apoapsis_radius_km: None,
            periapsis_altitude_km: None,
            apoapsis_altitude_km: None,
        };
        let (sw, cw) = 50f64.to_radians().sin_cos();
        let (si, ci) = 30f64.to_radians().sin_cos();
        let (so, co) = 40f64.to_radians().sin_cos();
        // first column of the PQW -> IJK matrix
        let expected = [co * cw - so * sw * ci, so * cw + co * sw * ci, sw * si];
        let got = perifocal_to_inertial(&[1.0, 0.0, 0.0], &elements);
        for k in 0..3 {
            assert!((got[k] - expected[k]).abs() < 1e-14);
        }
    }

    #[test]
    fn classical_elements_survive_a_trip_through_the_state() {
        let mu = 398_600.4418;
        let elements = OrbitalElements::from_classical(8000.0, 0.2, 40.0, -30.0, 60.0, 100.0, mu)
            .unwrap();
        assert_eq!(elements.raan_deg, 330.0);
        let state = state_at_anomaly(&elements, elements.true_anomaly_rad(), mu).unwrap();
        let back = OrbitalElements::from_state(&state, mu, None).unwrap();
        assert!((back.semi_major_axis_km - 8000.0).abs() < 1e-6);
        assert!((back.eccentricity - 0.2).abs() < 1e-12);
        assert!((back.raan_deg - 330.0).abs() < 1e-9);
        assert!((back.true_anomaly_deg - 100.0).abs() < 1e-9);
        assert!((back.mean_anomaly_deg - elements.mean_anomaly_deg).abs() < 1e-9);

        assert!(OrbitalElements::from_classical(8000.0, 1.2, 0.0, 0.0, 0.0, 0.0, mu).is_err());
    }
}
