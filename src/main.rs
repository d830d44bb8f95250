use lcsim::{bench_resolver, bench_step, binary_with_ring, Scenario, ScenarioConfig, Simulation};

use anyhow::Result;
use clap::Parser;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    /// Scenario YAML under scenarios/; omit to run the built-in demo
    #[arg(short, long)]
    file_name: Option<String>,

    /// Number of integration steps to run
    #[arg(short, long, default_value_t = 2000)]
    steps: u64,

    /// External frame dt handed to `step`; only matters for clamped policies
    #[arg(short, long, default_value_t = 0.01)]
    dt: f64,

    /// Log a diagnostics line every this many steps
    #[arg(short, long, default_value_t = 100)]
    log_every: u64,

    /// Run the step/resolver benchmarks instead of a scenario
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("scenarios")
        .join(file_name);
    let file = File::open(&config_path)?;
    let reader = BufReader::new(file);
    let scenario_cfg: ScenarioConfig = serde_yaml::from_reader(reader)?;

    Ok(scenario_cfg)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.bench {
        bench_step();
        bench_resolver();
        return Ok(());
    }

    let scenario = match &args.file_name {
        Some(name) => Scenario::build_scenario(load_scenario_from_yaml(name)?)?,
        None => binary_with_ring(0),
    };

    let mut sim = Simulation::new(scenario.params.clone());
    sim.respawn(scenario.bodies);
    log::info!(
        "running {} bodies for {} steps",
        sim.bodies().len(),
        args.steps
    );

    const SONAR_WRAP_PERIOD: f64 = 10.0;

    for _ in 0..args.steps {
        sim.step(args.dt);

        if args.log_every > 0 && sim.step_count() % args.log_every == 0 {
            let max_speed = sim
                .bodies()
                .iter()
                .map(|b| b.v.norm())
                .fold(0.0_f64, f64::max);
            log::info!(
                "step {:>6}  t = {:8.3}  max |v| = {:.4}  light radius = {:.3}",
                sim.step_count(),
                sim.sim_time(),
                max_speed,
                sim.light_travel_radius(SONAR_WRAP_PERIOD),
            );
        }
    }

    // Final positions on stdout so runs can be diffed or piped.
    for (i, snap) in sim.snapshot().iter().enumerate() {
        println!(
            "{:>3}  x = [{:+.4}, {:+.4}, {:+.4}]  m = {:.4}  r = {:.4}",
            i, snap.x.x, snap.x.y, snap.x.z, snap.m, snap.visual_radius
        );
    }

    Ok(())
}
