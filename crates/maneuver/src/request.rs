//! Serializable maneuver requests and their dispatch.

use std::fmt;
use std::str::FromStr;

use orrery_core::units::deg_to_rad;
use orrery_core::{StateVector, Vector3};
use serde::Deserialize;

use crate::{
    BurnTiming, Maneuver, ManeuverError, orbit_normal, plan_circularization_at,
    plan_hohmann_intercept, plan_hohmann_plane_change, plan_hohmann_transfer,
    plan_lambert_intercept, plan_plane_change,
};

/// Orbital plane given by inclination and ascending node, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PlaneTarget {
    pub inclination_deg: f64,
    pub raan_deg: f64,
}

impl PlaneTarget {
    pub fn normal(&self) -> Vector3 {
        orbit_normal(deg_to_rad(self.inclination_deg), deg_to_rad(self.raan_deg))
    }
}

/// A maneuver as requested by a host, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum ManeuverRequest {
    #[serde(rename = "hohmann")]
    Hohmann {
        target_radius_km: f64,
        /// Plane to arrive in; the arrival burn absorbs the plane change.
        #[serde(default)]
        target_plane: Option<PlaneTarget>,
    },
    #[serde(rename = "circularize")]
    Circularize {
        #[serde(default)]
        timing: BurnTiming,
    },
    #[serde(rename = "plane_change")]
    PlaneChange { inclination_deg: f64, raan_deg: f64 },
    #[serde(rename = "hohmann_intercept")]
    HohmannIntercept {
        target_position_km: Vector3,
        target_velocity_km_s: Vector3,
    },
    #[serde(rename = "lambert_intercept")]
    LambertIntercept {
        target_position_km: Vector3,
        target_velocity_km_s: Vector3,
        time_of_flight_s: f64,
    },
    #[serde(other)]
    Unsupported,
}

impl ManeuverRequest {
    pub fn kind(&self) -> Option<ManeuverKind> {
        match self {
            Self::Hohmann { .. } => Some(ManeuverKind::Hohmann),
            Self::Circularize { .. } => Some(ManeuverKind::Circularize),
            Self::PlaneChange { .. } => Some(ManeuverKind::PlaneChange),
            Self::HohmannIntercept { .. } => Some(ManeuverKind::HohmannIntercept),
            Self::LambertIntercept { .. } => Some(ManeuverKind::LambertIntercept),
            Self::Unsupported => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManeuverKind {
    Hohmann,
    Circularize,
    PlaneChange,
    HohmannIntercept,
    LambertIntercept,
}

impl ManeuverKind {
    pub const ALL: [ManeuverKind; 5] = [
        ManeuverKind::Hohmann,
        ManeuverKind::Circularize,
        ManeuverKind::PlaneChange,
        ManeuverKind::HohmannIntercept,
        ManeuverKind::LambertIntercept,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ManeuverKind::Hohmann => "hohmann",
            ManeuverKind::Circularize => "circularize",
            ManeuverKind::PlaneChange => "plane_change",
            ManeuverKind::HohmannIntercept => "hohmann_intercept",
            ManeuverKind::LambertIntercept => "lambert_intercept",
        }
    }
}

impl fmt::Display for ManeuverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ManeuverKind {
    type Err = ManeuverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        ManeuverKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| ManeuverError::InvalidRequest(format!("unknown maneuver type '{s}'")))
    }
}

/// Plan `request` from `state`. Burns come back in execution order.
pub fn plan(
    state: &StateVector,
    request: &ManeuverRequest,
    mu: f64,
    now_s: f64,
) -> Result<Vec<Maneuver>, ManeuverError> {
    match request {
        ManeuverRequest::Hohmann {
            target_radius_km,
            target_plane: None,
        } => Ok(plan_hohmann_transfer(state, *target_radius_km, mu, now_s)?.to_vec()),
        ManeuverRequest::Hohmann {
            target_radius_km,
            target_plane: Some(plane),
        } => {
            let transfer =
                plan_hohmann_plane_change(state, *target_radius_km, &plane.normal(), mu, now_s)?;
            Ok(transfer.maneuvers.to_vec())
        }
        ManeuverRequest::Circularize { timing } => {
            Ok(vec![plan_circularization_at(state, mu, now_s, *timing)?])
        }
        ManeuverRequest::PlaneChange {
            inclination_deg,
            raan_deg,
        } => {
            let plane = PlaneTarget {
                inclination_deg: *inclination_deg,
                raan_deg: *raan_deg,
            };
            Ok(vec![plan_plane_change(state, &plane.normal(), mu, now_s)?])
        }
        ManeuverRequest::HohmannIntercept {
            target_position_km,
            target_velocity_km_s,
        } => {
            let target = StateVector::new(*target_position_km, *target_velocity_km_s);
            Ok(plan_hohmann_intercept(state, &target, mu, now_s)?.maneuvers.to_vec())
        }
        ManeuverRequest::LambertIntercept {
            target_position_km,
            target_velocity_km_s,
            time_of_flight_s,
        } => {
            let target = StateVector::new(*target_position_km, *target_velocity_km_s);
            let plan = plan_lambert_intercept(state, &target, *time_of_flight_s, mu, now_s)?;
            Ok(plan.maneuvers.to_vec())
        }
        ManeuverRequest::Unsupported => Err(ManeuverError::InvalidRequest(
            "unsupported maneuver type".to_string(),
        )),
    }
}
