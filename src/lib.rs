//! Orbital state propagation core.
//!
//! The workspace crates are re-exported here so hosts (the CLI, a visualizer backend,
//! tests) can depend on one library. Propagation, element extraction and maneuver
//! planning all work in kilometres, km/s and seconds.

pub use orrery_config as config;
pub use orrery_elements as elements;
pub use orrery_forces as forces;
pub use orrery_integrator as integrator;
pub use orrery_maneuver as maneuver;
pub use orrery_propagation as propagation;

pub use orrery_core::{Body, StateVector, Vector3, constants, state, time, units, vector};

/// Returns the version of the library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
