//! Animal state and the arena that owns every animal ever created.

use crate::genome::Genome;
use savanna_core::{AnimalId, EnergyConfig, MapDirection, Position};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An animal in the simulation.
///
/// Position, orientation and energy mutate daily; the genome never does.
/// The instance stays in the [`Herd`] after death so lineage statistics
/// can still reach it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Animal {
    id: AnimalId,
    genome: Genome,
    gene_cursor: usize,
    position: Position,
    orientation: MapDirection,
    energy: i32,
    birth_day: u32,
    death_day: Option<u32>,
    age: u32,
    children: Vec<AnimalId>,
}

impl Animal {
    pub fn new(id: AnimalId, genome: Genome, position: Position, energy: i32, birth_day: u32) -> Self {
        // Deriving the initial facing from the first gene keeps seeded
        // populations varied without a second RNG draw.
        let orientation = MapDirection::from_index(genome.genes()[0]);
        Self {
            id,
            genome,
            gene_cursor: 0,
            position,
            orientation,
            energy,
            birth_day,
            death_day: None,
            age: 0,
            children: Vec::new(),
        }
    }

    /// Child of the two winners at a cell. `first` is the top-ranked
    /// parent and therefore the stronger one; both parents have already
    /// been charged the reproduction cost, which the child receives.
    pub fn bred(
        id: AnimalId,
        first: &Animal,
        second: &Animal,
        energy: &EnergyConfig,
        birth_day: u32,
    ) -> Self {
        let genome = Genome::combine(
            first.genome(),
            first.energy(),
            second.genome(),
            second.energy(),
        );
        Self::new(
            id,
            genome,
            first.position(),
            2 * energy.energy_to_reproduce,
            birth_day,
        )
    }

    pub fn id(&self) -> AnimalId {
        self.id
    }

    pub fn genome(&self) -> &Genome {
        &self.genome
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub fn orientation(&self) -> MapDirection {
        self.orientation
    }

    pub fn set_orientation(&mut self, orientation: MapDirection) {
        self.orientation = orientation;
    }

    pub fn energy(&self) -> i32 {
        self.energy
    }

    pub fn change_energy(&mut self, delta: i32) {
        self.energy += delta;
    }

    pub fn is_alive(&self) -> bool {
        self.energy > 0
    }

    /// Consume the next gene and rotate. Returns the new heading; whether
    /// the forward step is taken is the world map's decision.
    pub fn turn(&mut self) -> MapDirection {
        let gene = self.genome.gene(self.gene_cursor);
        self.gene_cursor += 1;
        self.orientation = self.orientation.rotated(gene);
        self.orientation
    }

    pub fn get_older(&mut self) {
        self.age += 1;
    }

    pub fn birth_day(&self) -> u32 {
        self.birth_day
    }

    pub fn death_day(&self) -> Option<u32> {
        self.death_day
    }

    pub fn set_death_day(&mut self, day: u32) {
        self.death_day = Some(day);
    }

    /// Days lived: death day minus birth day for the dead, days aged so
    /// far for the living.
    pub fn life_span(&self) -> u32 {
        match self.death_day {
            Some(day) => day.saturating_sub(self.birth_day),
            None => self.age,
        }
    }

    pub fn record_child(&mut self, child: AnimalId) {
        self.children.push(child);
    }

    pub fn children(&self) -> &[AnimalId] {
        &self.children
    }
}

/// Arena of every animal ever created, alive or dead.
///
/// The world map and the simulation both address animals through ids
/// issued here; neither holds a direct reference. Looking up an unknown id
/// is an occupancy-contract violation and panics.
#[derive(Debug, Default)]
pub struct Herd {
    animals: HashMap<AnimalId, Animal>,
    next_id: u64,
}

impl Herd {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate_id(&mut self) -> AnimalId {
        self.next_id += 1;
        AnimalId(self.next_id)
    }

    pub fn insert(&mut self, animal: Animal) {
        let id = animal.id();
        let previous = self.animals.insert(id, animal);
        assert!(previous.is_none(), "animal {id} inserted twice");
    }

    pub fn get(&self, id: AnimalId) -> &Animal {
        self.animals
            .get(&id)
            .unwrap_or_else(|| panic!("unknown animal {id}"))
    }

    pub fn get_mut(&mut self, id: AnimalId) -> &mut Animal {
        self.animals
            .get_mut(&id)
            .unwrap_or_else(|| panic!("unknown animal {id}"))
    }

    pub fn contains(&self, id: AnimalId) -> bool {
        self.animals.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.animals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animals.is_empty()
    }
}
