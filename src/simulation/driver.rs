//! Simulation driver: owns the bodies, history and pair cache
//!
//! `Simulation` is the single owner of all mutable simulation state. It is
//! constructed once and passed by reference to whatever composes it (a scene,
//! tests, the headless runner); there is no global accessor.
//!
//! Lifecycle: `respawn` replaces the body set and resizes/clears the history
//! window and pair-cursor table, starting a fresh epoch at t = 0. `step`
//! advances one internally clamped time increment in two strict phases:
//! all directed-pair accelerations are accumulated against frozen positions
//! first, only then are velocities and positions advanced, and only after
//! that is the (decimated) history record for the step written.

use super::gravity::RetardedGravity;
use super::history::HistoryStore;
use super::lightcone::PairCache;
use super::params::SimParams;
use super::states::{Body, BodySnapshot, NVec3, System};

pub struct Simulation {
    params: SimParams,
    system: System,
    history: HistoryStore,
    cache: PairCache,
    gravity: RetardedGravity,
    accel_buf: Vec<NVec3>, // per-target accumulator, reused across steps
    step_count: u64,
}

impl Simulation {
    /// Driver with no bodies; `step` is a no-op until the first `respawn`.
    pub fn new(params: SimParams) -> Self {
        let gravity = RetardedGravity::from_params(&params);
        let history = HistoryStore::new(0, params.max_record_count);
        Self {
            params,
            system: System::new(),
            history,
            cache: PairCache::new(0),
            gravity,
            accel_buf: Vec::new(),
            step_count: 0,
        }
    }

    /// Replace the body set and reset the epoch: time and step counter back
    /// to zero, history cleared and resized, all pair cursors dropped. The
    /// initial body positions become history record 0.
    pub fn respawn(&mut self, bodies: Vec<Body>) {
        let n = bodies.len();
        self.system = System { bodies, t: 0.0 };
        self.history = HistoryStore::new(n, self.params.max_record_count);
        self.cache = PairCache::new(n);
        self.accel_buf = vec![NVec3::zeros(); n];
        self.step_count = 0;

        if n > 0 {
            self.history.record(0.0, self.system.bodies.iter().map(|b| b.x));
        }
    }

    /// Advance the simulation by one increment. The caller's `dt` is mapped
    /// through the configured `DtPolicy` (fixed-step ignores it entirely).
    pub fn step(&mut self, dt: f64) {
        if self.system.bodies.is_empty() {
            return;
        }

        let dt = self.params.dt_policy.apply(dt);
        self.step_count += 1;
        self.system.t += dt;

        // Phase 1: resolve every directed pair against positions frozen at
        // step start and the history as recorded up to the previous step.
        self.gravity.accumulate(
            &self.system,
            &self.history,
            &mut self.cache,
            &self.params,
            self.system.t,
            &mut self.accel_buf,
        );
        for (body, a) in self.system.bodies.iter_mut().zip(self.accel_buf.iter()) {
            body.accel = *a;
        }

        // Phase 2: kick and drift every body.
        super::integrator::advance_bodies(&mut self.system, dt, &self.params);

        // Phase 3: decimated history record of the post-step positions.
        // Writing after both phases keeps the step-level barrier: no record
        // of this step is visible to any resolution within it.
        if self.step_count % self.params.record_step_interval == 0 {
            let t = self.system.t;
            self.history.record(t, self.system.bodies.iter().map(|b| b.x));
        }
    }

    /// Cumulative simulation time in seconds; monotone within an epoch.
    pub fn sim_time(&self) -> f64 {
        self.system.t
    }

    /// Integration steps taken since the last `respawn`.
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    /// Read-only view of the current bodies.
    pub fn bodies(&self) -> &[Body] {
        &self.system.bodies
    }

    /// Copied per-body state for display layers.
    pub fn snapshot(&self) -> Vec<BodySnapshot> {
        self.system.bodies.iter().map(BodySnapshot::from).collect()
    }

    /// Light-travel-distance display radius: how far a signal emitted at the
    /// start of the current wrap period has traveled by now,
    /// `(sim_time mod wrap_period) * c`. Drives the expanding "sonar shell"
    /// in the display layer. `wrap_period` must be positive; a non-positive
    /// or non-finite period disables wrapping and the unwrapped distance
    /// `sim_time * c` is returned instead of NaN.
    pub fn light_travel_radius(&self, wrap_period: f64) -> f64 {
        if wrap_period > 0.0 && wrap_period.is_finite() {
            (self.system.t % wrap_period) * self.params.light_speed
        } else {
            self.system.t * self.params.light_speed
        }
    }
}
