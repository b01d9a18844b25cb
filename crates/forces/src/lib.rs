//! Net acceleration on a point mass: N-body gravity, primary oblateness and drag.
//!
//! Every function here is a pure evaluation over borrowed inputs, so a [`ForceModel`]
//! can be shared freely across threads while each propagation owns its own state.

pub mod atmosphere;
pub mod drag;
pub mod gravity;

pub use atmosphere::{Atmosphere, PlanetEnvironment};
pub use drag::drag_acceleration;
pub use gravity::{gravity_acceleration, j2_acceleration};

use orrery_core::Body;
use orrery_core::vector::{self, Vector3};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ForceError {
    #[error("atmosphere scale height must be positive (got {0} km)")]
    InvalidScaleHeight(f64),
    #[error("sea-level density must be non-negative (got {0} kg/m³)")]
    InvalidDensity(f64),
    #[error("atmosphere cutoff altitude must be positive (got {0} km)")]
    InvalidCutoff(f64),
    #[error("planet radius must be positive (got {0} km)")]
    InvalidRadius(f64),
    #[error("ballistic coefficient must be positive (got {0} kg/m²)")]
    InvalidBallisticCoefficient(f64),
    #[error("perturbation scale must be finite and non-negative (got {0})")]
    InvalidPerturbationScale(f64),
    #[error("J2 coefficient must be finite (got {0})")]
    InvalidJ2(f64),
    #[error("force model needs at least one gravitating body")]
    NoBodies,
}

/// Snapshot of everything that accelerates the propagated point mass.
///
/// `bodies[0]` is the primary; the frame origin should sit at the primary's centre so
/// that the drag altitude `|r| − R` is meaningful.
#[derive(Debug, Clone, Copy)]
pub struct ForceModel<'a> {
    pub bodies: &'a [Body],
    pub perturbation_scale: f64,
    pub environment: PlanetEnvironment,
    /// `m / (Cd·A)` in kg/m². `None` disables drag.
    pub ballistic_coefficient: Option<f64>,
    /// Primary's `J2`, referred to the environment radius. Zero for a spherical primary.
    pub j2: f64,
}

impl<'a> ForceModel<'a> {
    /// Gravity only, perturbers at full strength, spherical primary, no atmosphere.
    pub fn gravity_only(bodies: &'a [Body], radius_km: f64) -> Self {
        Self {
            bodies,
            perturbation_scale: 1.0,
            environment: PlanetEnvironment::airless(radius_km),
            ballistic_coefficient: None,
            j2: 0.0,
        }
    }

    pub fn with_environment(mut self, environment: PlanetEnvironment) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_ballistic_coefficient(mut self, ballistic_coefficient: f64) -> Self {
        self.ballistic_coefficient = Some(ballistic_coefficient);
        self
    }

    pub fn with_j2(mut self, j2: f64) -> Self {
        self.j2 = j2;
        self
    }

    pub fn with_perturbation_scale(mut self, scale: f64) -> Self {
        self.perturbation_scale = scale;
        self
    }

    /// Reject configurations that would make every evaluation meaningless.
    pub fn validate(&self) -> Result<(), ForceError> {
        if self.bodies.is_empty() {
            return Err(ForceError::NoBodies);
        }
        if !(self.perturbation_scale >= 0.0 && self.perturbation_scale.is_finite()) {
            return Err(ForceError::InvalidPerturbationScale(self.perturbation_scale));
        }
        if !self.j2.is_finite() {
            return Err(ForceError::InvalidJ2(self.j2));
        }
        if let Some(bc) = self.ballistic_coefficient {
            if !(bc > 0.0) {
                return Err(ForceError::InvalidBallisticCoefficient(bc));
            }
        }
        self.environment.validate()
    }

    /// Gravitational parameter of the primary, if there is one.
    pub fn primary_mu(&self) -> Option<f64> {
        self.bodies.first().map(Body::mu)
    }

    pub fn gravity(&self, position: &Vector3) -> Vector3 {
        let point_masses = gravity_acceleration(position, self.bodies, self.perturbation_scale);
        match self.primary_mu() {
            Some(mu) if self.j2 != 0.0 => vector::add(
                &point_masses,
                &j2_acceleration(position, mu, self.j2, self.environment.radius_km),
            ),
            _ => point_masses,
        }
    }

    pub fn drag(&self, position: &Vector3, velocity: &Vector3) -> Vector3 {
        match self.ballistic_coefficient {
            Some(bc) => drag_acceleration(position, velocity, bc, &self.environment),
            None => vector::ZERO,
        }
    }

    /// Total acceleration (km/s²).
    pub fn acceleration(&self, position: &Vector3, velocity: &Vector3) -> Vector3 {
        vector::add(&self.gravity(position), &self.drag(position, velocity))
    }

    /// Altitude below which a trajectory is handed to the atmospheric sub-propagator.
    pub fn reentry_radius(&self) -> f64 {
        self.environment.radius_km + self.environment.cutoff_altitude_km()
    }
}
