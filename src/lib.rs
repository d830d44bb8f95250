pub mod simulation;
pub mod configuration;
pub mod benchmark;

pub use simulation::states::{Body, BodySnapshot, NVec3, System};
pub use simulation::params::{DtPolicy, ParamsError, SimParams};
pub use simulation::history::HistoryStore;
pub use simulation::lightcone::{resolve_retarded, PairCache, PairCursor, Retarded};
pub use simulation::gravity::RetardedGravity;
pub use simulation::integrator::{advance_bodies, relativistic_add};
pub use simulation::driver::Simulation;
pub use simulation::scenario::{binary_with_ring, Scenario};

pub use configuration::config::{
    BodyConfig, DtPolicyConfig, ParametersConfig, RingConfig, ScenarioConfig,
};

pub use benchmark::benchmark::{bench_resolver, bench_step};
