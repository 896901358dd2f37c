//! Observer channel for per-tick change notifications.
//!
//! Listeners are passive: they receive a read-only view of the world and a
//! report of what happened during the day, once per tick, and cannot feed
//! anything back into the simulation.

use crate::grid::WorldMap;
use savanna_core::{AnimalId, Position};
use serde::Serialize;

/// A domain event that occurred during one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum WorldEvent {
    AnimalDied {
        id: AnimalId,
        position: Position,
        life_span: u32,
    },
    AnimalBorn {
        id: AnimalId,
        position: Position,
        parents: (AnimalId, AnimalId),
    },
}

/// Everything a listener learns about one completed day
#[derive(Debug, Clone, Serialize)]
pub struct TickReport {
    /// The day that was just simulated
    pub day: u32,
    pub events: Vec<WorldEvent>,
}

pub trait MapChangeListener {
    /// Called synchronously once per tick, after statistics refresh
    fn map_changed(&mut self, world: &WorldMap, report: &TickReport);
}
