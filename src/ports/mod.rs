//! Ports (trait boundaries) between the agents and their drivers.

pub mod observer;
pub mod solver;

pub use observer::{NoopObserver, TrainingObserver};
pub use solver::Solver;
