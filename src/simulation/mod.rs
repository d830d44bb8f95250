pub mod states;
pub mod params;
pub mod history;
pub mod lightcone;
pub mod gravity;
pub mod integrator;
pub mod driver;
pub mod scenario;
