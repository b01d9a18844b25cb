//! Planet surface and exponential atmosphere description.

use crate::ForceError;

/// Mean equatorial radius of the Earth (km).
pub const EARTH_RADIUS_KM: f64 = 6_378.1366;
/// Sidereal rotation rate of the Earth (rad/s).
pub const EARTH_ROTATION_RATE_RAD_S: f64 = 7.292_115e-5;

/// Exponential density profile `ρ = ρ₀·exp(−h/H)` truncated at a cutoff altitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Atmosphere {
    pub sea_level_density_kg_m3: f64,
    pub scale_height_km: f64,
    /// No drag is applied above this altitude.
    pub cutoff_altitude_km: f64,
}

impl Atmosphere {
    pub fn earth() -> Self {
        Self {
            sea_level_density_kg_m3: 1.225,
            scale_height_km: 8.5,
            cutoff_altitude_km: 120.0,
        }
    }

    pub fn validate(&self) -> Result<(), ForceError> {
        if !(self.scale_height_km > 0.0) {
            return Err(ForceError::InvalidScaleHeight(self.scale_height_km));
        }
        if !(self.sea_level_density_kg_m3 >= 0.0) {
            return Err(ForceError::InvalidDensity(self.sea_level_density_kg_m3));
        }
        if !(self.cutoff_altitude_km > 0.0) {
            return Err(ForceError::InvalidCutoff(self.cutoff_altitude_km));
        }
        Ok(())
    }

    /// Density (kg/m³) at `altitude_km`, zero outside `(0, cutoff]`.
    pub fn density(&self, altitude_km: f64) -> f64 {
        if altitude_km <= 0.0 || altitude_km > self.cutoff_altitude_km {
            return 0.0;
        }
        self.sea_level_density_kg_m3 * (-altitude_km / self.scale_height_km).exp()
    }
}

/// The primary body's surface and co-rotating atmosphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanetEnvironment {
    pub radius_km: f64,
    /// Rotation rate about +z (rad/s); the atmosphere co-rotates.
    pub rotation_rate_rad_s: f64,
    pub atmosphere: Option<Atmosphere>,
}

impl PlanetEnvironment {
    pub fn earth() -> Self {
        Self {
            radius_km: EARTH_RADIUS_KM,
            rotation_rate_rad_s: EARTH_ROTATION_RATE_RAD_S,
            atmosphere: Some(Atmosphere::earth()),
        }
    }

    pub fn airless(radius_km: f64) -> Self {
        Self {
            radius_km,
            rotation_rate_rad_s: 0.0,
            atmosphere: None,
        }
    }

    pub fn validate(&self) -> Result<(), ForceError> {
        if !(self.radius_km > 0.0) {
            return Err(ForceError::InvalidRadius(self.radius_km));
        }
        match &self.atmosphere {
            Some(atmosphere) => atmosphere.validate(),
            None => Ok(()),
        }
    }

    /// Top of the sensible atmosphere (km above the surface), `0` when airless.
    pub fn cutoff_altitude_km(&self) -> f64 {
        self.atmosphere.map_or(0.0, |a| a.cutoff_altitude_km)
    }

    pub fn density_at(&self, altitude_km: f64) -> f64 {
        self.atmosphere.map_or(0.0, |a| a.density(altitude_km))
    }
}
