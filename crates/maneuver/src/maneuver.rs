use orrery_core::StateVector;
use orrery_core::vector::{self, Vector3};
use orrery_elements::ElementsError;
use serde::{Deserialize, Serialize};

/// Frame in which a burn's Δv components are expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ManeuverFrame {
    #[default]
    Inertial,
    /// `[prograde, normal, radial-out]` relative to the state at burn time.
    Local,
}

/// One impulsive burn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Maneuver {
    pub execution_time_s: f64,
    pub delta_v_km_s: Vector3,
    #[serde(default)]
    pub frame: ManeuverFrame,
}

impl Maneuver {
    pub fn inertial(execution_time_s: f64, delta_v_km_s: Vector3) -> Self {
        Self {
            execution_time_s,
            delta_v_km_s,
            frame: ManeuverFrame::Inertial,
        }
    }

    /// Pure prograde (or retrograde, if negative) burn.
    pub fn prograde(execution_time_s: f64, delta_v_km_s: f64) -> Self {
        Self {
            execution_time_s,
            delta_v_km_s: [delta_v_km_s, 0.0, 0.0],
            frame: ManeuverFrame::Local,
        }
    }

    pub fn magnitude_km_s(&self) -> f64 {
        vector::norm(&self.delta_v_km_s)
    }

    /// Δv in the inertial frame for a burn executed at `state`.
    pub fn inertial_delta_v(&self, state: &StateVector) -> Result<Vector3, ElementsError> {
        match self.frame {
            ManeuverFrame::Inertial => Ok(self.delta_v_km_s),
            ManeuverFrame::Local => {
                let basis = LocalFrame::from_state(state)?;
                Ok(basis.to_inertial(&self.delta_v_km_s))
            }
        }
    }

    /// `state` immediately after the burn.
    pub fn apply(&self, state: &StateVector) -> Result<StateVector, ElementsError> {
        Ok(state.with_delta_v(&self.inertial_delta_v(state)?))
    }
}

/// Velocity-aligned orthonormal basis at a state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalFrame {
    pub prograde: Vector3,
    /// Along the angular momentum.
    pub normal: Vector3,
    /// `prograde × normal`; points away from the body for a circular orbit.
    pub radial: Vector3,
}

impl LocalFrame {
    pub fn from_state(state: &StateVector) -> Result<Self, ElementsError> {
        let h = state.angular_momentum();
        let h_norm = vector::norm(&h);
        if !(h_norm > 0.0) {
            return Err(ElementsError::DegenerateOrbit {
                angular_momentum: h_norm,
            });
        }
        let prograde = vector::normalize(&state.velocity);
        let normal = vector::scale(&h, 1.0 / h_norm);
        let radial = vector::cross(&prograde, &normal);
        Ok(Self {
            prograde,
            normal,
            radial,
        })
    }

    pub fn to_inertial(&self, components: &Vector3) -> Vector3 {
        let v = vector::scale(&self.prograde, components[0]);
        let v = vector::add_scaled(&v, &self.normal, components[1]);
        vector::add_scaled(&v, &self.radial, components[2])
    }
}
