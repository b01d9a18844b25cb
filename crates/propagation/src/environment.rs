//! Runtime force inputs built from catalog records.

use orrery_config::{BodyConfig, CanonicalOrbitConfig, find_body};
use orrery_core::Body;
use orrery_core::units::{deg_to_rad, rad_to_deg};
use orrery_core::vector::{self, Vector3};
use orrery_elements::{OrbitalElements, state_at_anomaly, true_anomaly_from_mean_anomaly};
use orrery_forces::{Atmosphere, PlanetEnvironment};
use tracing::debug;

use crate::PropagationError;

const EPHEMERIS_KEPLER_TOLERANCE: f64 = 1e-12;

/// Surface, rotation and atmosphere of a catalog body, validated.
pub fn environment_from_config(body: &BodyConfig) -> Result<PlanetEnvironment, PropagationError> {
    let environment = PlanetEnvironment {
        radius_km: body.radius_km,
        rotation_rate_rad_s: body.rotation_rate_rad_s(),
        atmosphere: body.atmosphere.as_ref().map(|a| Atmosphere {
            sea_level_density_kg_m3: a.sea_level_density_kg_m3,
            scale_height_km: a.scale_height_km,
            cutoff_altitude_km: a.cutoff_altitude_km,
        }),
    };
    environment.validate()?;
    Ok(environment)
}

/// The catalog body as a primary sitting at the frame origin.
pub fn primary_from_config(body: &BodyConfig) -> Result<Body, PropagationError> {
    body_from_config(body, vector::ZERO)
}

/// The catalog body as a perturber at `position_km` relative to the primary.
pub fn body_from_config(body: &BodyConfig, position_km: Vector3) -> Result<Body, PropagationError> {
    if !(body.gm_km3_s2 > 0.0 && body.gm_km3_s2.is_finite()) {
        return Err(PropagationError::InvalidRequest(format!(
            "body '{}' has invalid GM {}",
            body.name, body.gm_km3_s2
        )));
    }
    Ok(Body::from_mu(position_km, body.gm_km3_s2))
}

/// Position (km) of `name` relative to the root of its catalog hierarchy, `t_s` seconds
/// after the catalog epoch.
///
/// Each link of the parent chain contributes a two-body position on the body's canonical
/// orbit. A body without a parent is the root and sits at the origin.
pub fn catalog_position(
    catalog: &[BodyConfig],
    name: &str,
    t_s: f64,
) -> Result<Vector3, PropagationError> {
    let mut body = find_body(catalog, name)?;
    let mut position = vector::ZERO;
    for _ in 0..=catalog.len() {
        let Some(parent_name) = body.parent.as_deref() else {
            return Ok(position);
        };
        let orbit = body.canonical_orbit.as_ref().ok_or_else(|| {
            PropagationError::InvalidRequest(format!(
                "body '{}' orbits '{parent_name}' but has no canonical orbit",
                body.name
            ))
        })?;
        let parent = find_body(catalog, parent_name)?;
        let offset = orbit_position(orbit, parent.gm_km3_s2 + body.gm_km3_s2, t_s)?;
        position = vector::add(&position, &offset);
        body = parent;
    }
    Err(PropagationError::InvalidRequest(format!(
        "parent chain of '{name}' does not reach a root body"
    )))
}

/// Force-model bodies for propagating about `primary`: the primary at the origin, then
/// each perturber at its catalog position relative to the primary at `t_s`.
///
/// The positions are a snapshot; they do not move during a propagation call.
pub fn perturbed_bodies<S: AsRef<str>>(
    catalog: &[BodyConfig],
    primary: &str,
    perturbers: &[S],
    t_s: f64,
) -> Result<Vec<Body>, PropagationError> {
    let primary_config = find_body(catalog, primary)?;
    let mut bodies = vec![primary_from_config(primary_config)?];
    if perturbers.is_empty() {
        return Ok(bodies);
    }
    let origin = catalog_position(catalog, primary, t_s)?;
    for name in perturbers {
        let config = find_body(catalog, name.as_ref())?;
        if config.name == primary_config.name {
            return Err(PropagationError::InvalidRequest(format!(
                "'{}' cannot perturb itself",
                config.name
            )));
        }
        let relative = vector::sub(&catalog_position(catalog, &config.name, t_s)?, &origin);
        debug!(body = %config.name, distance_km = vector::norm(&relative), "placed perturber");
        bodies.push(body_from_config(config, relative)?);
    }
    Ok(bodies)
}

fn orbit_position(
    orbit: &CanonicalOrbitConfig,
    mu: f64,
    t_s: f64,
) -> Result<Vector3, PropagationError> {
    let mean_motion = (mu / orbit.semi_major_axis_km.powi(3)).sqrt();
    let mean_anomaly = deg_to_rad(orbit.mean_anomaly_deg) + mean_motion * t_s;
    let true_anomaly = true_anomaly_from_mean_anomaly(
        mean_anomaly,
        orbit.eccentricity,
        EPHEMERIS_KEPLER_TOLERANCE,
    )?;
    let elements = OrbitalElements::from_classical(
        orbit.semi_major_axis_km,
        orbit.eccentricity,
        orbit.inclination_deg,
        orbit.raan_deg,
        orbit.argument_of_periapsis_deg,
        rad_to_deg(true_anomaly),
        mu,
    )?;
    Ok(state_at_anomaly(&elements, true_anomaly, mu)?.position)
}
