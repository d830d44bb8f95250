//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! simulation scenario. A scenario consists of:
//!
//! - [`ParametersConfig`] – physical constants and numerical knobs
//! - [`DtPolicyConfig`]   – fixed-step vs clamped-variable-step handling
//! - [`BodyConfig`]       – initial state for each explicitly listed body
//! - [`RingConfig`]       – optional procedurally seeded ring of light bodies
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario file
//!
//! # YAML format
//! An example scenario YAML matching these types:
//!
//! ```yaml
//! parameters:
//!   light_speed: 2.0          # signal propagation speed c
//!   grav_const: 0.5           # gravitational constant G
//!   speed_cap_fraction: 0.99  # body speed cap as a fraction of c
//!   softening: 1.0e-3         # inverse-square softening epsilon
//!   max_record_count: 128     # history ring depth
//!   record_step_interval: 16  # integration steps per history record
//!   interp_refine_steps: 2    # light-cone secant refinements
//!   dt_policy:
//!     fixed: 0.01             # or  clamped: { min: 1.0e-4, max: 0.05 }
//!
//! bodies:
//!   - x: [ -3.0, 0.0, 0.0 ]
//!     v: [  0.0, 0.0, 0.4 ]
//!     m: 6.0
//!   - x: [  3.0, 0.0, 0.0 ]
//!     v: [  0.0, 0.0, -0.4 ]
//!     m: 6.0
//!
//! ring:
//!   count: 32
//!   seed: 0
//!   radius_range: [ 0.1, 10.0 ]
//!   mass_range: [ 0.01, 0.5 ]
//!   angular_speed: 0.05
//! ```
//!
//! The engine maps this configuration into its runtime representation
//! (`SimParams` plus a `Vec<Body>`) when building a `Scenario`.

use serde::Deserialize;

/// How `step(dt)` treats the caller-supplied time increment.
/// `dt_policy: { fixed: 0.01 }` or `dt_policy: { clamped: { min, max } }`
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "lowercase")]
pub enum DtPolicyConfig {
    Fixed(f64), // always integrate with this step, ignore the caller's value
    Clamped { min: f64, max: f64 }, // clamp the caller's value into [min, max]
}

/// Physical constants and numerical knobs for a scenario
#[derive(Deserialize, Debug, Clone)]
pub struct ParametersConfig {
    pub light_speed: f64,          // signal propagation speed c
    pub grav_const: f64,           // gravitational constant G
    pub speed_cap_fraction: f64,   // speed cap as a fraction of c, < 1
    pub softening: f64,            // epsilon in the attraction denominator
    pub max_record_count: usize,   // history ring depth per body
    pub record_step_interval: u64, // steps between history records
    pub interp_refine_steps: u32,  // light-cone crossing refinements
    #[serde(with = "serde_yaml::with::singleton_map")]
    pub dt_policy: DtPolicyConfig, // step-size handling
}

/// Configuration for a single body's initial state
#[derive(Deserialize, Debug)]
pub struct BodyConfig {
    pub x: Vec<f64>, // initial position [x, y, z]
    pub v: Vec<f64>, // initial velocity [x, y, z]
    pub m: f64,      // mass of the body
}

/// Procedurally generated ring of light bodies around the origin.
/// Radii and masses are drawn from the ranges with the given seed, so a
/// scenario file pins down the full body set reproducibly.
#[derive(Deserialize, Debug, Clone)]
pub struct RingConfig {
    pub count: usize,            // number of ring bodies
    pub seed: u64,               // deterministic generator seed
    pub radius_range: [f64; 2],  // orbital radius drawn uniformly from here
    pub mass_range: [f64; 2],    // mass factor drawn uniformly, then cubed
    pub angular_speed: f64,      // tangential speed per unit radius
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug)]
pub struct ScenarioConfig {
    pub parameters: ParametersConfig, // constants and numerical knobs
    #[serde(default)]
    pub bodies: Vec<BodyConfig>, // explicitly listed bodies
    pub ring: Option<RingConfig>, // optional generated ring, appended after `bodies`
}
