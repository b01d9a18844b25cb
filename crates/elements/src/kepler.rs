//! Kepler's equation and anomaly conversions.

use std::f64::consts::{PI, TAU};

use orrery_core::StateVector;
use orrery_core::units::rad_to_deg;

use crate::elements::{OrbitalElements, calculate_elements, state_at_anomaly};
use crate::{ElementsError, check_mu, wrap_two_pi};

/// Default residual tolerance for [`solve_keplers_equation`].
pub const DEFAULT_KEPLER_TOLERANCE: f64 = 1e-6;
/// Newton iteration cap.
pub const MAX_KEPLER_ITERATIONS: usize = 50;
/// `|e − 1|` below which a trajectory is handled as parabolic.
pub const PARABOLIC_TOLERANCE: f64 = 1e-9;

const TOLERANCE_FLOOR: f64 = 1e-14;
const ADVANCE_TOLERANCE: f64 = 1e-12;

/// Solve `M = E − e·sin E` for the eccentric anomaly `E` (radians) by Newton iteration.
///
/// The mean anomaly is wrapped into `[0, 2π)` first; the result lies in the same range.
/// Tolerances below `1e-14` are clamped to that floor.
pub fn solve_keplers_equation(
    mean_anomaly: f64,
    eccentricity: f64,
    tolerance: f64,
) -> Result<f64, ElementsError> {
    if !(0.0..1.0).contains(&eccentricity) {
        return Err(ElementsError::NotElliptical { eccentricity });
    }
    let tolerance = tolerance.max(TOLERANCE_FLOOR);
    let m = wrap_two_pi(mean_anomaly);
    let mut e_anom = if eccentricity < 0.8 { m } else { PI };

    for _ in 0..MAX_KEPLER_ITERATIONS {
        let residual = e_anom - eccentricity * e_anom.sin() - m;
        if residual.abs() < tolerance {
            return Ok(e_anom);
        }
        e_anom -= residual / (1.0 - eccentricity * e_anom.cos());
    }

    let residual = e_anom - eccentricity * e_anom.sin() - m;
    if residual.abs() < tolerance {
        Ok(e_anom)
    } else {
        Err(ElementsError::KeplerDidNotConverge {
            mean_anomaly,
            eccentricity,
            iterations: MAX_KEPLER_ITERATIONS,
        })
    }
}

/// Eccentric anomaly for a true anomaly on an ellipse, in `[0, 2π)`.
pub fn eccentric_from_true(true_anomaly: f64, eccentricity: f64) -> f64 {
    let (sin_f, cos_f) = true_anomaly.sin_cos();
    let beta = (1.0 - eccentricity * eccentricity).sqrt();
    wrap_two_pi((beta * sin_f).atan2(eccentricity + cos_f))
}

/// True anomaly for an eccentric anomaly on an ellipse, in `[0, 2π)`.
pub fn true_from_eccentric(eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    let (sin_e, cos_e) = eccentric_anomaly.sin_cos();
    let beta = (1.0 - eccentricity * eccentricity).sqrt();
    wrap_two_pi((beta * sin_e).atan2(cos_e - eccentricity))
}

/// Mean anomaly for a true anomaly on any conic.
///
/// Elliptic results are wrapped into `[0, 2π)`. Parabolic and hyperbolic mean anomalies are
/// signed and unbounded. A true anomaly outside a hyperbola's asymptotes is rejected.
pub fn mean_anomaly_from_true_anomaly(
    true_anomaly: f64,
    eccentricity: f64,
) -> Result<f64, ElementsError> {
    if eccentricity < 0.0 || !eccentricity.is_finite() {
        return Err(ElementsError::NotElliptical { eccentricity });
    }
    if eccentricity > 1.0 + PARABOLIC_TOLERANCE && 1.0 + eccentricity * true_anomaly.cos() <= 0.0
    {
        return Err(ElementsError::UnreachableAnomaly {
            true_anomaly_deg: rad_to_deg(true_anomaly),
        });
    }
    Ok(mean_anomaly_unchecked(true_anomaly, eccentricity))
}

pub(crate) fn mean_anomaly_unchecked(true_anomaly: f64, eccentricity: f64) -> f64 {
    if (eccentricity - 1.0).abs() <= PARABOLIC_TOLERANCE {
        // Barker's equation
        let d = signed_half_tan(true_anomaly);
        d + d.powi(3) / 3.0
    } else if eccentricity < 1.0 {
        let e_anom = eccentric_from_true(true_anomaly, eccentricity);
        wrap_two_pi(e_anom - eccentricity * e_anom.sin())
    } else {
        let ratio = ((eccentricity - 1.0) / (eccentricity + 1.0)).sqrt();
        let h_anom = 2.0 * (ratio * signed_half_tan(true_anomaly)).atanh();
        eccentricity * h_anom.sinh() - h_anom
    }
}

/// True anomaly for an elliptic mean anomaly, in `[0, 2π)`.
pub fn true_anomaly_from_mean_anomaly(
    mean_anomaly: f64,
    eccentricity: f64,
    tolerance: f64,
) -> Result<f64, ElementsError> {
    let e_anom = solve_keplers_equation(mean_anomaly, eccentricity, tolerance)?;
    Ok(true_from_eccentric(e_anom, eccentricity))
}

/// Seconds until the body described by `elements` next reaches `target_true_anomaly`.
///
/// Closed orbits always answer with a forward time in `[0, T)`. On open trajectories the
/// target must lie ahead of the current anomaly and inside the asymptotes.
pub fn time_to_true_anomaly(
    elements: &OrbitalElements,
    target_true_anomaly: f64,
    mu: f64,
) -> Result<f64, ElementsError> {
    check_mu(mu)?;
    let e = elements.eccentricity;
    let current = elements.true_anomaly_rad();

    if e < 1.0 - PARABOLIC_TOLERANCE {
        let n = (mu / elements.semi_major_axis_km.powi(3)).sqrt();
        let m0 = mean_anomaly_unchecked(current, e);
        let m1 = mean_anomaly_unchecked(target_true_anomaly, e);
        return Ok(wrap_two_pi(m1 - m0) / n);
    }

    let m0 = mean_anomaly_from_true_anomaly(current, e)?;
    let m1 = mean_anomaly_from_true_anomaly(target_true_anomaly, e)?;
    let n = if (e - 1.0).abs() <= PARABOLIC_TOLERANCE {
        2.0 * (mu / elements.semi_latus_rectum_km.powi(3)).sqrt()
    } else {
        (mu / (-elements.semi_major_axis_km).powi(3)).sqrt()
    };
    let dt = (m1 - m0) / n;
    if dt < 0.0 {
        return Err(ElementsError::UnreachableAnomaly {
            true_anomaly_deg: rad_to_deg(target_true_anomaly),
        });
    }
    Ok(dt)
}

/// Advance a bound two-body state by `dt` seconds along its Keplerian ellipse.
pub fn advance_state(state: &StateVector, dt: f64, mu: f64) -> Result<StateVector, ElementsError> {
    let elements = calculate_elements(&state.position, &state.velocity, mu, None)?;
    let e = elements.eccentricity;
    if e >= 1.0 {
        return Err(ElementsError::NotElliptical { eccentricity: e });
    }
    let n = (mu / elements.semi_major_axis_km.powi(3)).sqrt();
    let m0 = mean_anomaly_unchecked(elements.true_anomaly_rad(), e);
    let f = true_anomaly_from_mean_anomaly((m0 + n * dt).rem_euclid(TAU), e, ADVANCE_TOLERANCE)?;
    state_at_anomaly(&elements, f, mu)
}

/// `tan(f/2)` with `f` taken in `(−π, π]`.
fn signed_half_tan(true_anomaly: f64) -> f64 {
    let mut f = wrap_two_pi(true_anomaly);
    if f > PI {
        f -= TAU;
    }
    (0.5 * f).tan()
}
