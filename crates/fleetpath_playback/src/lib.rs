pub mod checkpoints;
pub mod error;
pub mod kmh;
pub mod plan;
pub mod route;
pub mod simulator;
pub mod solver;
pub mod vehicle;
