//! World simulation engine.
//!
//! This crate implements the 2D grid world where animals move, eat grass,
//! reproduce and die, together with the daily tick orchestrator that drives
//! it.

pub mod animal;
pub mod genome;
pub mod grid;
pub mod observer;
pub mod sampler;
pub mod simulation;
pub mod topology;

pub use animal::{Animal, Herd};
pub use genome::Genome;
pub use grid::{Grass, WorldMap};
pub use observer::{MapChangeListener, TickReport, WorldEvent};
pub use sampler::PositionSampler;
pub use simulation::{Simulation, Statistics};
pub use topology::Topology;
