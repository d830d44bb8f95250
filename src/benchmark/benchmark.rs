use std::time::Instant;

use crate::simulation::driver::Simulation;
use crate::simulation::history::HistoryStore;
use crate::simulation::lightcone::resolve_retarded;
use crate::simulation::params::SimParams;
use crate::simulation::states::{Body, NVec3};

/// Deterministic body cloud for benchmarking, no rand needed.
fn bench_bodies(n: usize) -> Vec<Body> {
    let mut bodies = Vec::with_capacity(n);
    for i in 0..n {
        let i_f = i as f64;
        let x = NVec3::new(
            (i_f * 0.37).sin() * 5.0,
            (i_f * 0.13).cos() * 5.0,
            (i_f * 0.07).sin() * 5.0,
        );
        bodies.push(Body::new(x, NVec3::zeros(), 0.1));
    }
    bodies
}

/// Time full steps (N*(N-1) pair resolutions plus integration) across a
/// range of body counts. The warmup steps fill the history window so the
/// timed region exercises the warm cache path.
pub fn bench_step() {
    let ns = [32, 64, 128, 256, 512];
    let steps = 200;

    for n in ns {
        let mut sim = Simulation::new(SimParams::default());
        sim.respawn(bench_bodies(n));

        for _ in 0..64 {
            sim.step(0.01);
        }

        let start = Instant::now();
        for _ in 0..steps {
            sim.step(0.01);
        }
        let elapsed = start.elapsed();

        println!(
            "step  n = {:>4}: {:>8.2} us/step",
            n,
            elapsed.as_secs_f64() * 1.0e6 / steps as f64
        );
    }
}

/// Time the light-cone resolver alone: cold bisection vs warm cursor slide
/// over a long recorded trajectory.
pub fn bench_resolver() {
    let params = SimParams::default();
    let capacity = params.max_record_count;
    let mut history = HistoryStore::new(1, capacity);

    for r in 0..capacity {
        let t = r as f64 * 0.16;
        history.record(t, [NVec3::new(5.0 + (t * 0.2).sin(), 0.0, 0.0)]);
    }

    let target = NVec3::zeros();
    let now = capacity as f64 * 0.16;
    let iters = 100_000;

    let start = Instant::now();
    let mut cursor = None;
    for _ in 0..iters {
        cursor = resolve_retarded(&history, 0, target, now, params.light_speed, 2, cursor)
            .map(|r| crate::simulation::lightcone::PairCursor {
                last_record_idx: r.record_idx,
                alpha: r.alpha,
            });
    }
    let warm = start.elapsed();

    let start = Instant::now();
    for _ in 0..iters {
        let _ = resolve_retarded(&history, 0, target, now, params.light_speed, 2, None);
    }
    let cold = start.elapsed();

    println!(
        "resolver: warm {:>6.1} ns/resolve, cold {:>6.1} ns/resolve",
        warm.as_secs_f64() * 1.0e9 / iters as f64,
        cold.as_secs_f64() * 1.0e9 / iters as f64
    );
}
