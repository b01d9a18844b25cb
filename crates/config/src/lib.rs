//! Configuration models and loaders for the Orrery propagation workspace.
//!
//! Body catalogs load from a YAML list, a single TOML table, or a directory of TOML
//! files (read in sorted order). Propagation settings load from one TOML or YAML file
//! and every field falls back to its default when omitted.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// A gravitating body as it appears in a catalog.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BodyConfig {
    pub name: String,
    pub gm_km3_s2: f64,
    pub radius_km: f64,
    /// Sidereal rotation period. Negative for retrograde rotators.
    #[serde(default)]
    pub rotation_period_s: Option<f64>,
    #[serde(default)]
    pub atmosphere: Option<AtmosphereConfig>,
    /// Body this one orbits, if any.
    #[serde(default)]
    pub parent: Option<String>,
    /// Mean elements of the body's own orbit about its parent.
    #[serde(default)]
    pub canonical_orbit: Option<CanonicalOrbitConfig>,
    /// Second zonal harmonic, referred to `radius_km`.
    #[serde(default)]
    pub j2: Option<f64>,
}

impl BodyConfig {
    /// Rotation rate about +z (rad/s), zero when no period is given.
    pub fn rotation_rate_rad_s(&self) -> f64 {
        match self.rotation_period_s {
            Some(period) if period != 0.0 => std::f64::consts::TAU / period,
            _ => 0.0,
        }
    }
}

/// Classical elements of a body's orbit about its parent at the catalog epoch.
///
/// Angles are degrees and are taken in the frame the propagation runs in.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct CanonicalOrbitConfig {
    pub semi_major_axis_km: f64,
    pub eccentricity: f64,
    pub inclination_deg: f64,
    pub raan_deg: f64,
    pub argument_of_periapsis_deg: f64,
    /// Mean anomaly at the catalog epoch.
    pub mean_anomaly_deg: f64,
}

/// Exponential atmosphere parameters.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AtmosphereConfig {
    pub sea_level_density_kg_m3: f64,
    pub scale_height_km: f64,
    pub cutoff_altitude_km: f64,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct IntegratorConfig {
    pub abs_tol: f64,
    pub rel_tol: f64,
    pub sensitivity_scale: f64,
    pub max_step_s: f64,
    pub min_step_s: f64,
    pub max_steps: usize,
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        Self {
            abs_tol: 1e-6,
            rel_tol: 1e-6,
            sensitivity_scale: 1e3,
            max_step_s: 300.0,
            min_step_s: 1e-4,
            max_steps: 1_000_000,
        }
    }
}

/// How far ahead to predict a trajectory.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct HorizonConfig {
    /// Orbital periods to predict for bound orbits.
    pub periods: f64,
    /// Used instead of the period once `e ≥ near_parabolic_eccentricity`.
    pub fallback_days: f64,
    pub near_parabolic_eccentricity: f64,
}

impl Default for HorizonConfig {
    fn default() -> Self {
        Self {
            periods: 1.0,
            fallback_days: 30.0,
            near_parabolic_eccentricity: 0.99,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PropagationConfig {
    pub integrator: IntegratorConfig,
    pub horizon: HorizonConfig,
    pub num_points: usize,
    pub progress_batches: usize,
    pub atmosphere_step_s: f64,
    pub reentry_max_seconds: f64,
    pub perturbation_scale: f64,
    #[serde(default)]
    pub ballistic_coefficient_kg_m2: Option<f64>,
}

impl Default for PropagationConfig {
    fn default() -> Self {
        Self {
            integrator: IntegratorConfig::default(),
            horizon: HorizonConfig::default(),
            num_points: 360,
            progress_batches: 20,
            atmosphere_step_s: 1.0,
            reentry_max_seconds: 10_800.0,
            perturbation_scale: 1.0,
            ballistic_coefficient_kg_m2: None,
        }
    }
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("body '{0}' not found in catalog")]
    UnknownBody(String),
}

/// Load a body catalog from a YAML list, a TOML file, or a directory of TOML files.
pub fn load_bodies<P: AsRef<Path>>(path: P) -> Result<Vec<BodyConfig>, ConfigError> {
    load_records(path)
}

/// Look a body up by name, ignoring ASCII case.
pub fn find_body<'a>(
    bodies: &'a [BodyConfig],
    name: &str,
) -> Result<&'a BodyConfig, ConfigError> {
    bodies
        .iter()
        .find(|body| body.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| ConfigError::UnknownBody(name.to_string()))
}

/// Load propagation settings from a TOML or YAML file.
pub fn load_propagation_config<P: AsRef<Path>>(
    path: P,
) -> Result<PropagationConfig, ConfigError> {
    let path = path.as_ref();
    if is_toml(path) {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

fn load_records<T, P>(path: P) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if path.is_dir() {
        read_dir_records(path)
    } else if is_toml(path) {
        let contents = std::fs::read_to_string(path)?;
        let record: T = toml::from_str(&contents)?;
        Ok(vec![record])
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

fn read_dir_records<T>(dir: &Path) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| is_toml(path))
        .collect();
    entries.sort();
    let mut records = Vec::with_capacity(entries.len());
    for path in entries {
        let contents = std::fs::read_to_string(&path)?;
        records.push(toml::from_str(&contents)?);
    }
    Ok(records)
}

fn is_toml(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "toml")
}
