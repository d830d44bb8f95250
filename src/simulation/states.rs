//! Core state types for the retarded-gravity N-body simulation.
//!
//! Defines:
//! - `Body` - one point mass with its per-step acceleration accumulators
//! - `System` - the dense body list plus current simulation time `t`
//! - `BodySnapshot` - read-only view handed to display layers
//!
//! Body identity is its index in `System::bodies`; indices are stable
//! between `respawn` calls and invalidated by the next `respawn`.

use nalgebra::Vector3;

pub type NVec3 = Vector3<f64>;

#[derive(Debug, Clone)]
pub struct Body {
    pub x: NVec3, // position
    pub v: NVec3, // velocity
    pub m: f64, // mass
    pub accel: NVec3, // acceleration accumulated this step
    pub accel_prev: NVec3, // last step's acceleration, kept for the midpoint average
}

impl Body {
    /// Build a body from initial position, velocity and mass with zeroed
    /// acceleration accumulators.
    pub fn new(x: NVec3, v: NVec3, m: f64) -> Self {
        Self {
            x,
            v,
            m,
            accel: NVec3::zeros(),
            accel_prev: NVec3::zeros(),
        }
    }

    /// Display radius of a unit-density sphere with this body's mass:
    /// `r = cbrt(3 m / 4 pi)`.
    pub fn visual_radius(&self) -> f64 {
        (3.0 * self.m / (4.0 * std::f64::consts::PI)).cbrt()
    }
}

#[derive(Debug, Clone, Default)]
pub struct System {
    pub bodies: Vec<Body>, // collection of bodies, identity = index
    pub t: f64, // simulation time
}

impl System {
    /// Empty system at t = 0.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Read-only per-body view for display layers: position, velocity, mass and
/// the derived visual radius. Holds copies; holders never alias sim state.
#[derive(Debug, Clone, Copy)]
pub struct BodySnapshot {
    pub x: NVec3,
    pub v: NVec3,
    pub m: f64,
    pub visual_radius: f64,
}

impl From<&Body> for BodySnapshot {
    fn from(b: &Body) -> Self {
        Self {
            x: b.x,
            v: b.v,
            m: b.m,
            visual_radius: b.visual_radius(),
        }
    }
}
