//! Shared plumbing for the command-line hosts.

use std::path::Path;

use anyhow::Context;
use orrery::config::{
    BodyConfig, PropagationConfig, find_body, load_bodies, load_propagation_config,
};
use orrery::elements::{OrbitalElements, sphere_of_influence_radius};
use orrery::forces::PlanetEnvironment;
use orrery::propagation::{environment_from_config, primary_from_config};
use orrery::vector;
use orrery::{Body, StateVector};
use tracing_subscriber::EnvFilter;

pub const DEFAULT_CATALOG: &str = "configs/bodies";

/// Install a `fmt` subscriber on stderr honouring `RUST_LOG` (default `info`).
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // a second init in the same process is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Everything a host needs about the central body.
pub struct Primary {
    /// The whole catalog the primary was found in, for placing perturbers.
    pub catalog: Vec<BodyConfig>,
    pub config: BodyConfig,
    pub body: Body,
    pub environment: PlanetEnvironment,
    /// Laplace sphere of influence, when the catalog knows the parent.
    pub soi_radius_km: Option<f64>,
}

impl Primary {
    pub fn mu(&self) -> f64 {
        self.config.gm_km3_s2
    }

    /// Catalog `J2`, zero when the body has none.
    pub fn j2(&self) -> f64 {
        self.config.j2.unwrap_or(0.0)
    }
}

pub fn load_primary(catalog: &Path, name: &str) -> anyhow::Result<Primary> {
    let bodies = load_bodies(catalog)
        .with_context(|| format!("loading body catalog {}", catalog.display()))?;
    let config = find_body(&bodies, name)?.clone();
    let body = primary_from_config(&config)?;
    let environment = environment_from_config(&config)?;
    let soi_radius_km = config.parent.as_deref().and_then(|parent| {
        let parent = find_body(&bodies, parent).ok()?;
        let a = config.canonical_orbit?.semi_major_axis_km;
        Some(sphere_of_influence_radius(a, config.gm_km3_s2, parent.gm_km3_s2))
    });
    tracing::debug!(body = %config.name, ?soi_radius_km, "loaded primary");
    Ok(Primary {
        catalog: bodies,
        config,
        body,
        environment,
        soi_radius_km,
    })
}

/// Settings file if given, defaults otherwise.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<PropagationConfig> {
    match path {
        Some(path) => load_propagation_config(path)
            .with_context(|| format!("loading propagation settings {}", path.display())),
        None => Ok(PropagationConfig::default()),
    }
}

/// State at periapsis of the orbit with the given radii, inclination and node (degrees).
pub fn periapsis_state(
    mu: f64,
    periapsis_radius_km: f64,
    apoapsis_radius_km: f64,
    inclination_deg: f64,
    raan_deg: f64,
) -> anyhow::Result<StateVector> {
    anyhow::ensure!(
        periapsis_radius_km > 0.0 && apoapsis_radius_km >= periapsis_radius_km,
        "apoapsis must not be below periapsis"
    );
    let a = 0.5 * (periapsis_radius_km + apoapsis_radius_km);
    let speed = (mu * (2.0 / periapsis_radius_km - 1.0 / a)).sqrt();
    let (sin_i, cos_i) = inclination_deg.to_radians().sin_cos();
    let (sin_o, cos_o) = raan_deg.to_radians().sin_cos();
    // periapsis on the ascending node
    let position = vector::scale(&[cos_o, sin_o, 0.0], periapsis_radius_km);
    let velocity = vector::scale(&[-sin_o * cos_i, cos_o * cos_i, sin_i], speed);
    Ok(StateVector::new(position, velocity))
}

pub fn print_elements(elements: &OrbitalElements) {
    println!("  a      = {:.3} km", elements.semi_major_axis_km);
    println!("  e      = {:.6}", elements.eccentricity);
    println!("  i      = {:.3}°", elements.inclination_deg);
    println!("  Ω      = {:.3}°", elements.raan_deg);
    println!("  ω      = {:.3}°", elements.argument_of_periapsis_deg);
    println!("  ν      = {:.3}°", elements.true_anomaly_deg);
    if let Some(period) = elements.period_s {
        println!("  T      = {:.1} s", period);
    }
    if let Some(alt) = elements.periapsis_altitude_km {
        println!("  h_peri = {:.3} km", alt);
    }
    if let Some(alt) = elements.apoapsis_altitude_km {
        println!("  h_apo  = {:.3} km", alt);
    }
}
