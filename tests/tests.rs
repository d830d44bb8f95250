use lcsim::simulation::driver::Simulation;
use lcsim::simulation::history::HistoryStore;
use lcsim::simulation::lightcone::resolve_retarded;
use lcsim::simulation::params::{DtPolicy, ParamsError, SimParams};
use lcsim::simulation::scenario::{binary_with_ring, Scenario};
use lcsim::simulation::states::{Body, NVec3};
use lcsim::ScenarioConfig;

use proptest::prelude::*;

/// Build a simple 2-body system separated along the x-axis, at rest
pub fn two_body_sim(dist: f64, m: f64, params: SimParams) -> Simulation {
    let bodies = vec![
        Body::new(NVec3::new(-dist / 2.0, 0.0, 0.0), NVec3::zeros(), m),
        Body::new(NVec3::new(dist / 2.0, 0.0, 0.0), NVec3::zeros(), m),
    ];
    let mut sim = Simulation::new(params);
    sim.respawn(bodies);
    sim
}

/// Default parameters with an effectively instantaneous signal speed, for
/// weak-field tests that should approximate Newtonian gravity
pub fn newtonian_params() -> SimParams {
    SimParams {
        light_speed: 1.0e6,
        ..SimParams::default()
    }
}

fn separation(sim: &Simulation) -> f64 {
    (sim.bodies()[0].x - sim.bodies()[1].x).norm()
}

// ==================================================================================
// Driver lifecycle tests
// ==================================================================================

#[test]
fn empty_respawn_makes_step_a_noop() {
    let mut sim = Simulation::new(SimParams::default());
    sim.respawn(Vec::new());
    sim.step(0.5);
    sim.step(0.5);
    assert_eq!(sim.sim_time(), 0.0);
    assert_eq!(sim.step_count(), 0);
    assert!(sim.bodies().is_empty());
}

#[test]
fn lone_body_stays_put() {
    let mut sim = Simulation::new(SimParams::default());
    let start = NVec3::new(1.0, 2.0, 3.0);
    sim.respawn(vec![Body::new(start, NVec3::zeros(), 5.0)]);
    for _ in 0..500 {
        sim.step(0.01);
    }
    assert_eq!(sim.bodies()[0].x, start);
    assert_eq!(sim.bodies()[0].v, NVec3::zeros());
    assert!(sim.sim_time() > 0.0);
}

#[test]
fn respawn_resets_the_epoch() {
    let mut sim = two_body_sim(2.0, 6.0, SimParams::default());
    for _ in 0..100 {
        sim.step(0.01);
    }
    assert!(sim.sim_time() > 0.0);

    sim.respawn(vec![Body::new(NVec3::zeros(), NVec3::zeros(), 1.0)]);
    assert_eq!(sim.sim_time(), 0.0);
    assert_eq!(sim.step_count(), 0);
    assert_eq!(sim.bodies().len(), 1);
}

#[test]
fn fixed_dt_policy_ignores_caller_value() {
    let mut sim = two_body_sim(2.0, 1.0, SimParams::default());
    sim.step(123.0);
    assert_eq!(sim.sim_time(), 0.01);
    sim.step(0.0);
    assert_eq!(sim.sim_time(), 0.02);
}

#[test]
fn clamped_dt_policy_bounds_caller_value() {
    let params = SimParams {
        dt_policy: DtPolicy::Clamped {
            min: 1.0e-3,
            max: 0.05,
        },
        ..SimParams::default()
    };
    let mut sim = two_body_sim(2.0, 1.0, params);
    sim.step(100.0);
    assert_eq!(sim.sim_time(), 0.05);
    sim.step(0.0);
    assert_eq!(sim.sim_time(), 0.05 + 1.0e-3);
    sim.step(0.02);
    assert!((sim.sim_time() - (0.05 + 1.0e-3 + 0.02)).abs() < 1.0e-15);
}

#[test]
fn light_travel_radius_wraps() {
    let mut sim = two_body_sim(2.0, 1.0, SimParams::default());
    for _ in 0..150 {
        sim.step(0.01);
    }
    // t = 1.5, c = 2: radius 3.0 before the wrap period elapses
    assert!((sim.light_travel_radius(10.0) - 3.0).abs() < 1.0e-9);
    assert!((sim.light_travel_radius(1.0) - 1.0).abs() < 1.0e-9);
}

#[test]
fn light_travel_radius_survives_degenerate_wrap_periods() {
    let mut sim = two_body_sim(2.0, 1.0, SimParams::default());
    for _ in 0..150 {
        sim.step(0.01);
    }
    // A zero, negative or non-finite period disables wrapping instead of
    // producing NaN from the modulo.
    assert!((sim.light_travel_radius(0.0) - 3.0).abs() < 1.0e-9);
    assert!((sim.light_travel_radius(-5.0) - 3.0).abs() < 1.0e-9);
    assert!(sim.light_travel_radius(f64::NAN).is_finite());
}

// ==================================================================================
// Scenario parameter validation
// ==================================================================================

/// Deserialize a one-body scenario with the reference parameters, three of
/// which are overridable, exactly as an untrusted YAML file would supply it
fn config_with(max_record_count: usize, record_step_interval: u64, dt_policy: &str) -> ScenarioConfig {
    let yaml = format!(
        "parameters:\n\
         \x20 light_speed: 2.0\n\
         \x20 grav_const: 0.5\n\
         \x20 speed_cap_fraction: 0.99\n\
         \x20 softening: 1.0e-3\n\
         \x20 max_record_count: {max_record_count}\n\
         \x20 record_step_interval: {record_step_interval}\n\
         \x20 interp_refine_steps: 2\n\
         \x20 dt_policy:\n\
         \x20   {dt_policy}\n\
         bodies:\n\
         \x20 - x: [ 0.0, 0.0, 0.0 ]\n\
         \x20   v: [ 0.0, 0.0, 0.0 ]\n\
         \x20   m: 1.0\n"
    );
    serde_yaml::from_str(&yaml).expect("scenario yaml must deserialize")
}

#[test]
fn rejects_zero_record_interval_before_it_can_divide() {
    // Unvalidated, this value reaches the decimation remainder in `step`.
    let cfg = config_with(128, 0, "fixed: 0.01");
    assert_eq!(
        Scenario::build_scenario(cfg).err(),
        Some(ParamsError::ZeroRecordInterval)
    );
}

#[test]
fn rejects_zero_record_count_before_history_is_sized() {
    // Unvalidated, this value reaches the history capacity contract in `respawn`.
    let cfg = config_with(0, 16, "fixed: 0.01");
    assert_eq!(
        Scenario::build_scenario(cfg).err(),
        Some(ParamsError::ZeroRecordCount)
    );
}

#[test]
fn rejects_inverted_dt_clamp_range() {
    let cfg = config_with(128, 16, "clamped: { min: 0.05, max: 1.0e-3 }");
    assert_eq!(
        Scenario::build_scenario(cfg).err(),
        Some(ParamsError::InvalidDtRange {
            min: 0.05,
            max: 1.0e-3,
        })
    );
}

#[test]
fn accepts_reference_parameters_and_steps() {
    let cfg = config_with(128, 16, "fixed: 0.01");
    let scenario = Scenario::build_scenario(cfg).expect("reference parameters are valid");

    let mut sim = Simulation::new(scenario.params.clone());
    sim.respawn(scenario.bodies);
    for _ in 0..32 {
        sim.step(0.01);
    }
    assert!((sim.sim_time() - 0.32).abs() < 1.0e-12);
}

// ==================================================================================
// Pair coverage: every directed pair contributes exactly once per step
// ==================================================================================

#[test]
fn first_step_accelerations_sum_all_directed_pairs() {
    // Three bodies in the weak-field regime: every signal has arrived after
    // the first increment, so each body's first-step kick must equal the
    // softened Newtonian sum over both other bodies, computed from the
    // respawn-time positions. A missed or doubled pair shows up directly.
    let params = newtonian_params();
    let g = params.grav_const;
    let eps = params.softening;
    let dt = 0.01;

    let xs = [
        NVec3::new(0.0, 0.0, 0.0),
        NVec3::new(10.0, 0.0, 0.0),
        NVec3::new(0.0, 10.0, 0.0),
    ];
    let ms = [1.0, 2.0, 3.0];

    let bodies: Vec<Body> = xs
        .iter()
        .zip(ms)
        .map(|(x, m)| Body::new(*x, NVec3::zeros(), m))
        .collect();
    let mut sim = Simulation::new(params);
    sim.respawn(bodies);
    sim.step(dt);

    for i in 0..3 {
        let mut accel = NVec3::zeros();
        for j in 0..3 {
            if i == j {
                continue;
            }
            let r = xs[j] - xs[i];
            let d = r.norm();
            accel += g * ms[j] / (d * d * d + eps) * r;
        }
        // First step: accel_prev is zero, prior velocity is zero, so the
        // post-step velocity is exactly the midpoint kick 0.5 * a * dt.
        let expected_v = 0.5 * accel * dt;
        let got_v = sim.bodies()[i].v;
        assert!(
            (got_v - expected_v).norm() < 1.0e-12,
            "body {i}: got {got_v:?}, expected {expected_v:?}"
        );
    }
}

// ==================================================================================
// Speed cap and causality invariants
// ==================================================================================

#[test]
fn speed_stays_capped_over_long_runs() {
    let scenario = binary_with_ring(0);
    let cap = scenario.params.max_speed_cap();
    let c = scenario.params.light_speed;

    let mut sim = Simulation::new(scenario.params.clone());
    sim.respawn(scenario.bodies);

    for _ in 0..3000 {
        sim.step(0.01);
        for (i, b) in sim.bodies().iter().enumerate() {
            let speed = b.v.norm();
            assert!(speed < c, "body {i} reached c: {speed}");
            assert!(speed <= cap + 1.0e-9, "body {i} above cap: {speed}");
        }
    }
}

proptest! {
    /// Any resolved retarded sample must be causally reachable: the signal
    /// from the bracket's lower record has already arrived. Histories are
    /// generated subluminal (per-record displacement below c * dt), the
    /// invariant the integrator maintains and the bisection relies on.
    #[test]
    fn resolved_samples_are_always_causal(
        records in prop::collection::vec(
            (0.05f64..0.5, -0.9f64..0.9, -0.9f64..0.9, -0.9f64..0.9),
            2..120,
        ),
        start in (-10.0f64..10.0, -10.0f64..10.0, -10.0f64..10.0),
        target in (-15.0f64..15.0, -15.0f64..15.0, -15.0f64..15.0),
        now_offset in 0.01f64..4.0,
    ) {
        let c = 2.0;
        let mut history = HistoryStore::new(1, 64);
        let mut pos = NVec3::new(start.0, start.1, start.2);
        let mut t = 0.0;

        history.record(t, [pos]);
        for (dt, vx, vy, vz) in records {
            // velocity fractions of c, scaled to keep the hop subluminal
            let v = NVec3::new(vx, vy, vz) * c;
            t += dt;
            pos += v * dt * 0.6;
            history.record(t, [pos]);
        }

        let target = NVec3::new(target.0, target.1, target.2);
        let now = t + now_offset;

        if let Some(ret) = resolve_retarded(&history, 0, target, now, c, 2, None) {
            prop_assert!(ret.alpha.is_finite());
            prop_assert!((0.0..=1.0).contains(&ret.alpha));

            let past = now - history.time_at(ret.record_idx);
            let dist = (target - history.position_at(0, ret.record_idx)).norm();
            prop_assert!(
                c * past >= dist - 1.0e-9,
                "resolved a record whose signal has not arrived: c*past = {}, dist = {}",
                c * past,
                dist,
            );
        }
    }
}

// ==================================================================================
// Physical scenarios
// ==================================================================================

#[test]
fn weak_field_pair_falls_inward() {
    // Symmetric pair at rest, propagation speed huge compared to the field:
    // the first step must already pull them together (Newtonian infall).
    let d = 1.0;
    let mut sim = two_body_sim(2.0 * d, 1.0, newtonian_params());
    sim.step(0.01);
    assert!(separation(&sim) < 2.0 * d, "pair did not start falling inward");

    // And it keeps contracting over further steps.
    let after_one = separation(&sim);
    for _ in 0..200 {
        sim.step(0.01);
    }
    assert!(separation(&sim) < after_one);
}

#[test]
fn symmetric_pair_stays_symmetric() {
    // Equal masses, mirrored start: trajectories must mirror bit-for-bit
    // since both directions of the pair resolve the same way.
    let mut sim = two_body_sim(6.0, 6.0, SimParams::default());
    for _ in 0..1000 {
        sim.step(0.01);
        let sum = sim.bodies()[0].x + sim.bodies()[1].x;
        assert!(sum.norm() < 1.0e-9, "center drifted: {sum:?}");
    }
}

#[test]
fn orbiter_stays_bounded() {
    // Heavy center at rest plus one light body on a near-circular orbit.
    // The propagation delay is small at this c, so the orbit should stay
    // within loose bounds for several revolutions.
    let params = SimParams {
        light_speed: 100.0,
        ..SimParams::default()
    };
    let g = params.grav_const;
    let m_center = 100.0;
    let r0 = 5.0;
    let v_circ = (g * m_center / r0).sqrt();

    let bodies = vec![
        Body::new(NVec3::zeros(), NVec3::zeros(), m_center),
        Body::new(
            NVec3::new(r0, 0.0, 0.0),
            NVec3::new(0.0, 0.0, v_circ),
            1.0e-3,
        ),
    ];
    let mut sim = Simulation::new(params);
    sim.respawn(bodies);

    for _ in 0..5000 {
        sim.step(0.01);
        let r = (sim.bodies()[1].x - sim.bodies()[0].x).norm();
        assert!(r > 1.0 && r < 15.0, "orbit diverged or collapsed: r = {r}");
    }
}

// ==================================================================================
// Determinism
// ==================================================================================

#[test]
fn identical_runs_are_bit_identical() {
    let run = || {
        let scenario = binary_with_ring(42);
        let mut sim = Simulation::new(scenario.params.clone());
        sim.respawn(scenario.bodies);
        for _ in 0..500 {
            sim.step(0.01);
        }
        sim.snapshot()
    };

    let a = run();
    let b = run();
    assert_eq!(a.len(), b.len());
    for (sa, sb) in a.iter().zip(b.iter()) {
        assert_eq!(sa.x, sb.x);
        assert_eq!(sa.v, sb.v);
    }
}

// ==================================================================================
// Decimated recording accuracy
// ==================================================================================

/// Resolve the retarded position of a source moving on a known curve against
/// a history recorded at interval `h`, and return the error against the
/// analytic retarded position.
fn decimation_error(h: f64) -> f64 {
    let c = 2.0;
    let total = 30.0;
    let curve = |t: f64| NVec3::new(5.0 + (0.5 * t).sin(), 0.0, 0.0);
    let target = NVec3::zeros();

    let mut history = HistoryStore::new(1, 128);
    let mut t = 0.0;
    while t < total {
        history.record(t, [curve(t)]);
        t += h;
    }

    let ret = resolve_retarded(&history, 0, target, total, c, 2, None)
        .expect("crossing must be inside the window");

    // Analytic crossing: root of c * (total - t) - |curve(t) - target|,
    // strictly decreasing in t because the source is subluminal.
    let mut lo = 0.0;
    let mut hi = total;
    for _ in 0..200 {
        let mid = 0.5 * (lo + hi);
        if c * (total - mid) - (curve(mid) - target).norm() > 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    let exact = curve(0.5 * (lo + hi));

    (ret.position - exact).norm()
}

#[test]
fn resolver_accuracy_degrades_gracefully_with_decimation() {
    let err_fine = decimation_error(0.08);
    let err_coarse = decimation_error(0.64);

    assert!(err_fine < 2.0e-3, "fine sampling error too large: {err_fine}");
    assert!(err_coarse < 0.05, "coarse sampling error catastrophic: {err_coarse}");
    assert!(
        err_fine < err_coarse,
        "error should grow with the record interval ({err_fine} vs {err_coarse})"
    );
}
