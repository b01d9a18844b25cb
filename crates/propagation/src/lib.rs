//! Trajectory generation: orbit polylines, re-entry resolution, burn sequences.
//!
//! [`OrbitPropagator`] drives the adaptive integrator over a [`ForceModel`] snapshot and
//! hands trajectories that sink into the atmosphere to a fixed-step sub-propagator. Long
//! runs pause at checkpoints so a [`PropagationHost`] can report progress or cancel.

pub mod atmosphere;
pub mod environment;
pub mod horizon;
pub mod host;
pub mod orbit;
pub mod sequence;
pub mod settings;
pub mod trajectory;

pub use atmosphere::propagate_atmosphere;
pub use environment::{
    body_from_config, catalog_position, environment_from_config, perturbed_bodies,
    primary_from_config,
};
pub use horizon::{HorizonPolicy, prediction_horizon};
pub use host::{CancellationToken, PropagationHost, Unattended};
pub use orbit::{MAX_ORBIT_POINTS, OrbitRequest, propagate_orbit};
pub use sequence::{ExecutedBurn, SequenceOutcome, execute_maneuvers};
pub use settings::PropagationSettings;
pub use trajectory::{Termination, Trajectory, TrajectorySample};

use orrery_config::ConfigError;
use orrery_core::StateVector;
use orrery_elements::{ElementsError, OrbitalElements};
use orrery_forces::{ForceError, ForceModel};
use orrery_integrator::{AdaptiveIntegrator, Integration, IntegrationError};
use orrery_maneuver::{Maneuver, ManeuverError, ManeuverRequest};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PropagationError {
    #[error(transparent)]
    Elements(#[from] ElementsError),
    #[error(transparent)]
    Integration(#[from] IntegrationError),
    #[error(transparent)]
    Maneuver(#[from] ManeuverError),
    #[error(transparent)]
    Force(#[from] ForceError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid propagation request: {0}")]
    InvalidRequest(String),
}

/// Capabilities a propagation backend offers its hosts.
pub trait Propagator {
    /// Final state after `duration_s` seconds.
    fn integrate(
        &self,
        initial: &StateVector,
        duration_s: f64,
        forces: &ForceModel<'_>,
    ) -> Result<Integration, PropagationError>;

    /// Sampled trajectory over `request.period_s`.
    fn propagate_orbit<H: PropagationHost + ?Sized>(
        &self,
        initial: &StateVector,
        forces: &ForceModel<'_>,
        request: &OrbitRequest,
        host: &mut H,
    ) -> Result<Trajectory, PropagationError>;
}

/// The adaptive-integrator backed [`Propagator`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrbitPropagator {
    pub settings: PropagationSettings,
}

impl OrbitPropagator {
    pub fn new(settings: PropagationSettings) -> Self {
        Self { settings }
    }

    pub fn integrator(&self) -> AdaptiveIntegrator {
        AdaptiveIntegrator::new(self.settings.integrator)
    }

    /// Re-entry propagation with the configured step and time limit.
    pub fn propagate_atmosphere<H: PropagationHost + ?Sized>(
        &self,
        initial: &StateVector,
        forces: &ForceModel<'_>,
        host: &mut H,
    ) -> Result<Trajectory, PropagationError> {
        propagate_atmosphere(
            initial,
            forces,
            self.settings.reentry_max_seconds,
            self.settings.atmosphere_step_s,
            host,
        )
    }

    /// Trajectory over the horizon chosen for `initial`'s orbit shape.
    pub fn predict_orbit<H: PropagationHost + ?Sized>(
        &self,
        initial: &StateVector,
        forces: &ForceModel<'_>,
        allow_full_ellipse: bool,
        host: &mut H,
    ) -> Result<Trajectory, PropagationError> {
        let mu = primary_mu(forces)?;
        let elements = OrbitalElements::from_state(initial, mu, None)?;
        let horizon = prediction_horizon(&elements, self.settings.periods, &self.settings.horizon);
        let request = OrbitRequest {
            period_s: horizon,
            num_points: self.settings.num_points,
            allow_full_ellipse,
        };
        self.propagate_orbit(initial, forces, &request, host)
    }

    pub fn execute_maneuvers(
        &self,
        initial: &StateVector,
        start_time_s: f64,
        maneuvers: &[Maneuver],
        forces: &ForceModel<'_>,
    ) -> Result<SequenceOutcome, PropagationError> {
        execute_maneuvers(initial, start_time_s, maneuvers, forces, &self.integrator())
    }

    /// Plan `request` from `initial` and fly the resulting burns.
    pub fn execute_request(
        &self,
        initial: &StateVector,
        start_time_s: f64,
        request: &ManeuverRequest,
        forces: &ForceModel<'_>,
    ) -> Result<SequenceOutcome, PropagationError> {
        let mu = primary_mu(forces)?;
        let maneuvers = orrery_maneuver::plan(initial, request, mu, start_time_s)?;
        self.execute_maneuvers(initial, start_time_s, &maneuvers, forces)
    }
}

impl Propagator for OrbitPropagator {
    fn integrate(
        &self,
        initial: &StateVector,
        duration_s: f64,
        forces: &ForceModel<'_>,
    ) -> Result<Integration, PropagationError> {
        forces.validate()?;
        Ok(self.integrator().integrate(initial, duration_s, forces)?)
    }

    fn propagate_orbit<H: PropagationHost + ?Sized>(
        &self,
        initial: &StateVector,
        forces: &ForceModel<'_>,
        request: &OrbitRequest,
        host: &mut H,
    ) -> Result<Trajectory, PropagationError> {
        propagate_orbit(initial, forces, request, &self.settings, host)
    }
}

pub(crate) fn primary_mu(forces: &ForceModel<'_>) -> Result<f64, PropagationError> {
    forces.validate()?;
    forces.primary_mu().ok_or(PropagationError::Force(ForceError::NoBodies))
}
