//! Core units, constants, and shared primitives for the Orrery propagation workspace.
//!
//! Every crate in the workspace works in kilometres, km/s, seconds, and kilograms.
//! Nothing in here rescales for rendering; that is the viewer's concern.

/// Physical constants (kilometre-based unless stated otherwise).
pub mod constants {
    /// Newtonian constant of gravitation (km³ kg⁻¹ s⁻²).
    pub const G_KM3_KG_S2: f64 = 6.674_30e-20;
    /// Seconds per Julian day.
    pub const SECONDS_PER_DAY: f64 = 86_400.0;
}

/// Basic unit conversion helpers.
pub mod units {
    /// Convert kilometres to metres.
    #[inline]
    pub fn km_to_m(v: f64) -> f64 {
        v * 1_000.0
    }

    /// Convert degrees to radians.
    #[inline]
    pub fn deg_to_rad(v: f64) -> f64 {
        v.to_radians()
    }

    /// Convert radians to degrees.
    #[inline]
    pub fn rad_to_deg(v: f64) -> f64 {
        v.to_degrees()
    }
}

/// Lightweight time utilities shared across crates.
pub mod time {
    use super::constants::SECONDS_PER_DAY;

    /// Convert days to seconds.
    #[inline]
    pub fn days_to_seconds(days: f64) -> f64 {
        days * SECONDS_PER_DAY
    }

    /// Convert seconds to days.
    #[inline]
    pub fn seconds_to_days(seconds: f64) -> f64 {
        seconds / SECONDS_PER_DAY
    }
}

/// Minimal vector helpers to avoid ad-hoc `[f64; 3]` math everywhere.
pub mod vector {
    /// Alias for a 3D vector in kilometres or km/s depending on context.
    pub type Vector3 = [f64; 3];

    /// The zero vector.
    pub const ZERO: Vector3 = [0.0, 0.0, 0.0];

    /// Unit vector along +z, the reference pole.
    pub const UNIT_Z: Vector3 = [0.0, 0.0, 1.0];

    /// Euclidean norm of a vector.
    #[inline]
    pub fn norm(v: &Vector3) -> f64 {
        dot(v, v).sqrt()
    }

    /// Squared Euclidean norm.
    #[inline]
    pub fn norm_squared(v: &Vector3) -> f64 {
        dot(v, v)
    }

    /// Overflow-safe length of `(x, y, z)`.
    #[inline]
    pub fn hypot3(x: f64, y: f64, z: f64) -> f64 {
        x.hypot(y).hypot(z)
    }

    /// Dot product of two vectors.
    #[inline]
    pub fn dot(a: &Vector3, b: &Vector3) -> f64 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    /// Cross product `a × b`.
    #[inline]
    pub fn cross(a: &Vector3, b: &Vector3) -> Vector3 {
        [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]
    }

    /// Vector addition.
    #[inline]
    pub fn add(a: &Vector3, b: &Vector3) -> Vector3 {
        [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
    }

    /// Vector subtraction.
    #[inline]
    pub fn sub(a: &Vector3, b: &Vector3) -> Vector3 {
        [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
    }

    /// Scale a vector by a scalar.
    #[inline]
    pub fn scale(v: &Vector3, s: f64) -> Vector3 {
        [v[0] * s, v[1] * s, v[2] * s]
    }

    /// `a + b * s`, the workhorse of every integration update.
    #[inline]
    pub fn add_scaled(a: &Vector3, b: &Vector3, s: f64) -> Vector3 {
        [a[0] + b[0] * s, a[1] + b[1] * s, a[2] + b[2] * s]
    }

    /// Negate a vector.
    #[inline]
    pub fn neg(v: &Vector3) -> Vector3 {
        [-v[0], -v[1], -v[2]]
    }

    /// Unit vector along `v`, or the zero vector when `v` has no usable length.
    #[inline]
    pub fn normalize(v: &Vector3) -> Vector3 {
        normalize_or(v, ZERO)
    }

    /// Unit vector along `v`, or `fallback` when `v` has no usable length.
    pub fn normalize_or(v: &Vector3, fallback: Vector3) -> Vector3 {
        let length = norm(v);
        if length > 0.0 && length.is_finite() {
            scale(v, 1.0 / length)
        } else {
            fallback
        }
    }

    /// Angle between two vectors in radians, `0` if either is zero.
    pub fn angle_between(a: &Vector3, b: &Vector3) -> f64 {
        let denom = norm(a) * norm(b);
        if denom == 0.0 {
            return 0.0;
        }
        (dot(a, b) / denom).clamp(-1.0, 1.0).acos()
    }

    /// True when every component is finite.
    #[inline]
    pub fn is_finite(v: &Vector3) -> bool {
        v.iter().all(|c| c.is_finite())
    }
}

/// Cartesian state and gravitating-body primitives shared by every propagation stage.
pub mod state {
    use super::constants::G_KM3_KG_S2;
    use super::vector::{self, Vector3};

    /// Inertial position (km) and velocity (km/s) of a point mass.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct StateVector {
        pub position: Vector3,
        pub velocity: Vector3,
    }

    impl StateVector {
        pub fn new(position: Vector3, velocity: Vector3) -> Self {
            Self { position, velocity }
        }

        /// Distance from the frame origin (km).
        pub fn radius(&self) -> f64 {
            vector::norm(&self.position)
        }

        /// Speed (km/s).
        pub fn speed(&self) -> f64 {
            vector::norm(&self.velocity)
        }

        /// Specific angular momentum vector `r × v` (km²/s).
        pub fn angular_momentum(&self) -> Vector3 {
            vector::cross(&self.position, &self.velocity)
        }

        /// Specific orbital energy about a body with parameter `mu` (km²/s²).
        pub fn specific_energy(&self, mu: f64) -> f64 {
            0.5 * vector::norm_squared(&self.velocity) - mu / self.radius()
        }

        /// Copy of this state with `delta_v` added to the velocity.
        pub fn with_delta_v(&self, delta_v: &Vector3) -> Self {
            Self {
                position: self.position,
                velocity: vector::add(&self.velocity, delta_v),
            }
        }

        /// True when position and velocity are free of NaN/infinity.
        pub fn is_finite(&self) -> bool {
            vector::is_finite(&self.position) && vector::is_finite(&self.velocity)
        }
    }

    /// A gravitating point mass. Positions are expressed relative to the primary's centre.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct Body {
        pub position: Vector3,
        pub mass_kg: f64,
    }

    impl Body {
        pub fn new(position: Vector3, mass_kg: f64) -> Self {
            Self { position, mass_kg }
        }

        /// Build a body from its gravitational parameter (km³/s²).
        pub fn from_mu(position: Vector3, mu_km3_s2: f64) -> Self {
            Self {
                position,
                mass_kg: mu_km3_s2 / G_KM3_KG_S2,
            }
        }

        /// Gravitational parameter `G·m` (km³/s²).
        #[inline]
        pub fn mu(&self) -> f64 {
            G_KM3_KG_S2 * self.mass_kg
        }
    }
}

pub use state::{Body, StateVector};
pub use vector::Vector3;
