//! The grid world: single source of truth for spatial occupancy.
//!
//! Per-position occupant lists, at most one grass item per cell, and two
//! disjoint pools of grass-free positions (equator band and the rest) that
//! bias daily growth towards the equator. Every mutation of spatial state
//! goes through the operations here.
//!
//! Membership preconditions are contracts: an animal or grass that is not
//! where the caller claims means the index is already corrupt, and these
//! operations panic rather than guess.

use crate::animal::Herd;
use crate::sampler::PositionSampler;
use crate::topology::Topology;
use savanna_core::{AnimalId, Boundary, EnergyConfig, Position};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::HashMap;

/// A grass item: immutable once grown, destroyed when eaten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grass {
    position: Position,
    energy: i32,
}

impl Grass {
    /// A plain food marker; the energy transferred on eating comes from
    /// the world's energy configuration.
    pub fn new(position: Position) -> Self {
        Self {
            position,
            energy: 0,
        }
    }

    pub fn with_energy(position: Position, energy: i32) -> Self {
        Self { position, energy }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn energy(&self) -> i32 {
        self.energy
    }
}

/// The grid world.
#[derive(Debug)]
pub struct WorldMap {
    bounds: Boundary,
    equator: Boundary,
    energy: EnergyConfig,
    topology: Box<dyn Topology>,
    /// Occupant list per position; an entry exists for every map position
    animals: HashMap<Position, Vec<AnimalId>>,
    grasses: HashMap<Position, Grass>,
    empty_on_equator: Vec<Position>,
    empty_off_equator: Vec<Position>,
}

impl WorldMap {
    pub fn new(bounds: Boundary, energy: EnergyConfig, topology: Box<dyn Topology>) -> Self {
        // Central horizontal band of height/5 + 1 rows; a 10-row map gets
        // rows 3..=5.
        let height = bounds.height();
        let band = height / 5;
        let low = bounds.lower_left().y + (height - band - 1) / 2;
        let equator = Boundary::new(
            Position::new(bounds.lower_left().x, low),
            Position::new(bounds.upper_right().x, low + band),
        );

        let mut animals = HashMap::new();
        let mut empty_on_equator = Vec::new();
        let mut empty_off_equator = Vec::new();
        for position in bounds.all_positions() {
            animals.insert(position, Vec::new());
            if equator.contains(position) {
                empty_on_equator.push(position);
            } else {
                empty_off_equator.push(position);
            }
        }

        Self {
            bounds,
            equator,
            energy,
            topology,
            animals,
            grasses: HashMap::new(),
            empty_on_equator,
            empty_off_equator,
        }
    }

    pub fn bounds(&self) -> Boundary {
        self.bounds
    }

    pub fn equator(&self) -> Boundary {
        self.equator
    }

    pub fn energy(&self) -> &EnergyConfig {
        &self.energy
    }

    /// Insert a grass item, claiming its position from the matching empty
    /// pool. Panics if the position already holds grass or lies off-map.
    pub fn place_grass(&mut self, grass: Grass) {
        let position = grass.position();
        assert!(
            self.bounds.contains(position),
            "grass position {position} outside the map"
        );
        let pool = if self.equator.contains(position) {
            &mut self.empty_on_equator
        } else {
            &mut self.empty_off_equator
        };
        let slot = pool
            .iter()
            .position(|&p| p == position)
            .unwrap_or_else(|| panic!("position {position} already holds grass"));
        pool.swap_remove(slot);
        self.grasses.insert(position, grass);
    }

    /// Remove the grass at a position, returning its cell to the matching
    /// empty pool. Panics when no grass is there.
    pub fn remove_grass(&mut self, position: Position) -> Grass {
        let grass = self
            .grasses
            .remove(&position)
            .unwrap_or_else(|| panic!("no grass at {position}"));
        if self.equator.contains(position) {
            self.empty_on_equator.push(position);
        } else {
            self.empty_off_equator.push(position);
        }
        grass
    }

    pub fn grass_at(&self, position: Position) -> Option<&Grass> {
        self.grasses.get(&position)
    }

    pub fn count_grass(&self) -> usize {
        self.grasses.len()
    }

    /// Snapshot of every grass position in row-major order. The eating
    /// pass iterates this while removing items, and the fixed order keeps
    /// runs reproducible.
    pub fn grass_positions(&self) -> Vec<Position> {
        let mut positions: Vec<Position> = self.grasses.keys().copied().collect();
        positions.sort_by_key(|p| (p.y, p.x));
        positions
    }

    /// Union of both grass-free pools
    pub fn empty_positions(&self) -> Vec<Position> {
        let mut positions = self.empty_on_equator.clone();
        positions.extend_from_slice(&self.empty_off_equator);
        positions
    }

    pub fn empty_on_equator(&self) -> &[Position] {
        &self.empty_on_equator
    }

    pub fn empty_off_equator(&self) -> &[Position] {
        &self.empty_off_equator
    }

    /// Append the animal to the occupant list at its recorded position
    pub fn place_animal(&mut self, herd: &Herd, id: AnimalId) {
        let position = herd.get(id).position();
        self.occupants_mut(position).push(id);
    }

    /// Erase the animal from the occupant list at its recorded position.
    /// Panics when it is not listed there.
    pub fn remove_animal(&mut self, herd: &Herd, id: AnimalId) {
        let position = herd.get(id).position();
        self.detach(id, position);
    }

    /// Move validity predicate: a step is valid iff it stays on the map
    pub fn can_move(&self, position: Position) -> bool {
        self.bounds.contains(position)
    }

    /// One genome-driven step: detach, turn, resolve against the topology,
    /// charge the movement cost and reattach. The occupancy bookkeeping is
    /// atomic; no caller can observe the animal at zero or two positions.
    pub fn move_animal(&mut self, herd: &mut Herd, id: AnimalId) {
        let from = herd.get(id).position();
        self.detach(id, from);

        let heading = herd.get_mut(id).turn();
        let (position, heading) = self.topology.resolve(&self.bounds, from, heading);

        let animal = herd.get_mut(id);
        animal.set_orientation(heading);
        animal.set_position(position);
        animal.change_energy(-self.energy.energy_to_move);

        self.occupants_mut(position).push(id);
    }

    /// Live occupants at a position, in insertion order
    pub fn animals_at(&self, position: Position) -> &[AnimalId] {
        self.animals
            .get(&position)
            .unwrap_or_else(|| panic!("position {position} outside the map"))
    }

    /// Up to `k` occupants ranked by the contest order: energy descending,
    /// then earlier birth day, then id. This ranking is the sole
    /// arbitration rule for eating and reproduction.
    pub fn k_winners(&self, herd: &Herd, position: Position, k: usize) -> Vec<AnimalId> {
        let mut ids = self.animals_at(position).to_vec();
        ids.sort_by_key(|&id| {
            let animal = herd.get(id);
            (Reverse(animal.energy()), animal.birth_day(), id)
        });
        ids.truncate(k);
        ids
    }

    /// Feed the grass at `position` to the top-ranked occupant. With no
    /// occupants the grass stays; calling this where no grass exists is a
    /// contract violation.
    pub fn eat_grass(&mut self, herd: &mut Herd, position: Position) -> Option<AnimalId> {
        assert!(
            self.grasses.contains_key(&position),
            "no grass at {position}"
        );
        let winner = self.k_winners(herd, position, 1).first().copied()?;
        herd.get_mut(winner).change_energy(self.energy.energy_from_eating);
        self.remove_grass(position);
        Some(winner)
    }

    /// The single reproduction gate: with at least two occupants whose
    /// second-ranked winner has energy >= `energy_to_full`, charge both
    /// parents `energy_to_reproduce` and return them (top-ranked first)
    /// for the orchestrator to build the child from.
    pub fn reproduce(&self, herd: &mut Herd, position: Position) -> Option<(AnimalId, AnimalId)> {
        if self.animals_at(position).len() < 2 {
            return None;
        }
        let winners = self.k_winners(herd, position, 2);
        let (first, second) = (winners[0], winners[1]);
        if herd.get(second).energy() < self.energy.energy_to_full {
            return None;
        }
        herd.get_mut(first).change_energy(-self.energy.energy_to_reproduce);
        herd.get_mut(second).change_energy(-self.energy.energy_to_reproduce);
        Some((first, second))
    }

    /// Grow up to `n` grass items, drawing unique positions from the
    /// equator pool first and covering any shortfall from the rest of the
    /// map. Exhausted pools grow fewer items without error. Returns the
    /// number grown.
    pub fn grow_grass(&mut self, n: usize, sampler: &mut PositionSampler) -> usize {
        let on_equator = sampler.sample_unique(&self.empty_on_equator, n);
        let shortfall = n - on_equator.len();
        let off_equator = sampler.sample_unique(&self.empty_off_equator, shortfall);

        let mut grown = 0;
        for position in on_equator.into_iter().chain(off_equator) {
            self.place_grass(Grass::new(position));
            grown += 1;
        }
        grown
    }

    fn occupants_mut(&mut self, position: Position) -> &mut Vec<AnimalId> {
        self.animals
            .get_mut(&position)
            .unwrap_or_else(|| panic!("position {position} outside the map"))
    }

    fn detach(&mut self, id: AnimalId, position: Position) {
        let occupants = self.occupants_mut(position);
        let slot = occupants
            .iter()
            .position(|&a| a == id)
            .unwrap_or_else(|| panic!("animal {id} not present at {position}"));
        occupants.remove(slot);
    }
}
