//! Numerical and physical parameters for the simulation
//!
//! `SimParams` holds runtime settings:
//! - signal propagation speed and gravitational constant,
//! - speed cap fraction (cap = fraction * light_speed),
//! - softening epsilon for the inverse-square law,
//! - history window depth and record decimation interval,
//! - light-cone interpolation refinement count,
//! - the `dt` handling policy for `step`
//!
//! Defaults reproduce the reference scenario constants. Values arriving
//! from scenario files go through [`SimParams::validate`] before they reach
//! the driver, so the core never divides or clamps by a nonsense knob.

use std::fmt;

/// How `step(dt)` maps the caller's wall-clock `dt` onto the internal
/// integration step. Both variants guarantee `step` never integrates with
/// an unbounded or vanishing increment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DtPolicy {
    /// Ignore the caller's value and always integrate with `dt`.
    Fixed { dt: f64 },
    /// Clamp the caller's value into `[min, max]`.
    Clamped { min: f64, max: f64 },
}

impl DtPolicy {
    /// Resolve the caller-supplied `dt` to the increment actually used.
    /// A non-finite requested value resolves to the lower bound.
    pub fn apply(&self, requested: f64) -> f64 {
        match *self {
            DtPolicy::Fixed { dt } => dt,
            DtPolicy::Clamped { min, max } => requested.max(min).min(max),
        }
    }
}

/// A parameter combination rejected by [`SimParams::validate`]. Scenario
/// files are untrusted input, so these surface as typed errors instead of
/// panicking somewhere inside the driver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamsError {
    NonPositiveLightSpeed(f64),
    CapFractionOutOfRange(f64),
    NegativeSoftening(f64),
    ZeroRecordCount,
    ZeroRecordInterval,
    NonPositiveFixedDt(f64),
    InvalidDtRange { min: f64, max: f64 },
}

impl fmt::Display for ParamsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamsError::NonPositiveLightSpeed(v) => {
                write!(f, "light_speed must be positive and finite, got {v}")
            }
            ParamsError::CapFractionOutOfRange(v) => {
                write!(f, "speed_cap_fraction must be in (0, 1), got {v}")
            }
            ParamsError::NegativeSoftening(v) => {
                write!(f, "softening must be non-negative, got {v}")
            }
            ParamsError::ZeroRecordCount => write!(f, "max_record_count must be at least 1"),
            ParamsError::ZeroRecordInterval => {
                write!(f, "record_step_interval must be at least 1")
            }
            ParamsError::NonPositiveFixedDt(v) => {
                write!(f, "fixed dt must be positive and finite, got {v}")
            }
            ParamsError::InvalidDtRange { min, max } => {
                write!(f, "clamped dt range needs 0 < min <= max, got [{min}, {max}]")
            }
        }
    }
}

impl std::error::Error for ParamsError {}

#[derive(Debug, Clone)]
pub struct SimParams {
    pub light_speed: f64, // signal propagation speed c
    pub grav_const: f64, // gravitational constant G
    pub speed_cap_fraction: f64, // body speed cap as a fraction of c, < 1
    pub softening: f64, // epsilon added to d^3 in the attraction denominator
    pub max_record_count: usize, // history ring depth (retained records per body)
    pub record_step_interval: u64, // integration steps per recorded history sample
    pub interp_refine_steps: u32, // secant refinements of the light-cone crossing
    pub dt_policy: DtPolicy, // fixed or clamped step handling
}

impl SimParams {
    /// Maximum allowed body speed, strictly below `light_speed`.
    pub fn max_speed_cap(&self) -> f64 {
        self.speed_cap_fraction * self.light_speed
    }

    /// Check every knob a scenario file can set. The driver assumes a
    /// validated parameter set: a zero record interval would divide by zero
    /// in `step`, a zero record count would trip the history capacity
    /// contract, an inverted clamp range would invert every step.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if !(self.light_speed > 0.0) || !self.light_speed.is_finite() {
            return Err(ParamsError::NonPositiveLightSpeed(self.light_speed));
        }
        if !(self.speed_cap_fraction > 0.0 && self.speed_cap_fraction < 1.0) {
            return Err(ParamsError::CapFractionOutOfRange(self.speed_cap_fraction));
        }
        if !(self.softening >= 0.0) {
            return Err(ParamsError::NegativeSoftening(self.softening));
        }
        if self.max_record_count == 0 {
            return Err(ParamsError::ZeroRecordCount);
        }
        if self.record_step_interval == 0 {
            return Err(ParamsError::ZeroRecordInterval);
        }
        match self.dt_policy {
            DtPolicy::Fixed { dt } => {
                if !(dt > 0.0) || !dt.is_finite() {
                    return Err(ParamsError::NonPositiveFixedDt(dt));
                }
            }
            DtPolicy::Clamped { min, max } => {
                if !(min > 0.0 && min <= max) || !max.is_finite() {
                    return Err(ParamsError::InvalidDtRange { min, max });
                }
            }
        }
        Ok(())
    }
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            light_speed: 2.0,
            grav_const: 0.5,
            speed_cap_fraction: 0.99,
            softening: 1.0e-3,
            max_record_count: 128,
            record_step_interval: 16,
            interp_refine_steps: 2,
            dt_policy: DtPolicy::Fixed { dt: 0.01 },
        }
    }
}
