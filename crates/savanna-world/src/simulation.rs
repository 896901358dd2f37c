//! The daily tick orchestrator.
//!
//! Owns the day counter, the alive/dead rosters and the genome index, and
//! drives the world map through the fixed daily pipeline: death sweep,
//! movement, eating, reproduction, growth, aging, statistics. The order is
//! part of the simulation's semantics; changing it changes outcomes.

use crate::animal::{Animal, Herd};
use crate::genome::Genome;
use crate::grid::{Grass, WorldMap};
use crate::observer::{MapChangeListener, TickReport, WorldEvent};
use crate::sampler::PositionSampler;
use crate::topology;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use savanna_core::{AnimalId, Boundary, Position, Result, SimulationConfig};
use serde::Serialize;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::{debug, info, trace};

/// Population statistics, fully recomputed every tick to avoid drift
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Statistics {
    /// Mean energy over alive animals; 0 with none alive
    pub average_energy: f32,
    /// Mean lifespan over dead animals; 0 with none dead
    pub average_life_span: f32,
    /// Mean children count over alive animals; 0 with none alive
    pub average_children: f32,
    pub dead_count: usize,
    /// Genome carried by the most animals ever, ties broken by first-seen
    /// order
    pub most_popular_genome: Option<Genome>,
}

pub struct Simulation {
    map: WorldMap,
    herd: Herd,
    alive: Vec<AnimalId>,
    dead: Vec<AnimalId>,
    genome_index: HashMap<Genome, Vec<AnimalId>>,
    genome_order: Vec<Genome>,
    observers: Vec<Box<dyn MapChangeListener>>,
    sampler: PositionSampler,
    rng: ChaCha8Rng,
    config: SimulationConfig,
    running: bool,
    day: u32,
    stats: Statistics,
}

impl Simulation {
    /// Build a world from the configuration and seed the initial
    /// population and grass. Animals may share a starting cell; grass
    /// positions are unique.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;

        let bounds = Boundary::new(
            Position::new(0, 0),
            Position::new(config.map.width - 1, config.map.height - 1),
        );
        let map = WorldMap::new(
            bounds,
            config.energy.clone(),
            topology::from_kind(config.map.topology),
        );

        let mut sim = Self {
            map,
            herd: Herd::new(),
            alive: Vec::new(),
            dead: Vec::new(),
            genome_index: HashMap::new(),
            genome_order: Vec::new(),
            observers: Vec::new(),
            sampler: PositionSampler::from_seed(config.seed),
            rng: ChaCha8Rng::seed_from_u64(config.seed.wrapping_add(1)),
            running: false,
            day: 1,
            stats: Statistics::default(),
            config,
        };

        let all_positions = sim.map.bounds().all_positions();
        let animal_positions = sim
            .sampler
            .sample_with_repetition(&all_positions, sim.config.starting_animals);
        for position in animal_positions {
            let genome = Genome::random(sim.config.genome_length, &mut sim.rng);
            let id = sim.herd.allocate_id();
            sim.herd.insert(Animal::new(
                id,
                genome,
                position,
                sim.config.energy.starting_energy,
                sim.day,
            ));
            sim.map.place_animal(&sim.herd, id);
            sim.alive.push(id);
            sim.index_genome(id);
        }

        let grass_positions = sim
            .sampler
            .sample_unique(&all_positions, sim.config.starting_grass);
        for position in grass_positions {
            sim.map.place_grass(Grass::new(position));
        }

        sim.update_stats();
        info!(
            animals = sim.alive.len(),
            grass = sim.map.count_grass(),
            seed = sim.config.seed,
            "simulation seeded"
        );
        Ok(sim)
    }

    pub fn add_observer(&mut self, observer: Box<dyn MapChangeListener>) {
        self.observers.push(observer);
    }

    pub fn start_running(&mut self) {
        self.running = true;
    }

    pub fn stop_running(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advance one day. This is the only mutation entry point into the
    /// world once the simulation is constructed; external schedulers call
    /// it at whatever pace they want.
    pub fn tick(&mut self) -> TickReport {
        let day = self.day;
        let mut events = Vec::new();

        // 1. Death sweep over a roster snapshot
        self.sweep_dead(&mut events);

        // 2. Movement
        for &id in &self.alive {
            self.map.move_animal(&mut self.herd, id);
        }

        // 3. Eating, over a snapshot of the grass present at step start
        for position in self.map.grass_positions() {
            if let Some(eater) = self.map.eat_grass(&mut self.herd, position) {
                trace!(animal = %eater, %position, "grass eaten");
            }
        }

        // 4. Reproduction, scanning positions in the fixed row-major order
        for position in self.map.bounds().all_positions() {
            self.breed_at(position, &mut events);
        }

        // 5. Growth
        let grown = self
            .map
            .grow_grass(self.config.daily_grass_growth, &mut self.sampler);

        // 6. Aging and day rollover
        for &id in &self.alive {
            self.herd.get_mut(id).get_older();
        }
        self.day += 1;

        // 7. Statistics refresh
        self.update_stats();

        let report = TickReport { day, events };
        for observer in &mut self.observers {
            observer.map_changed(&self.map, &report);
        }
        debug!(
            day,
            alive = self.alive.len(),
            grass = self.map.count_grass(),
            grown,
            "day complete"
        );
        report
    }

    /// Run up to `days` ticks, checking the run flag before each one
    pub fn run(&mut self, days: u64) {
        for _ in 0..days {
            if !self.running {
                break;
            }
            self.tick();
        }
    }

    fn sweep_dead(&mut self, events: &mut Vec<WorldEvent>) {
        let roster = self.alive.clone();
        for id in roster {
            if self.herd.get(id).is_alive() {
                continue;
            }
            self.map.remove_animal(&self.herd, id);
            self.alive.retain(|&a| a != id);
            self.dead.push(id);

            let animal = self.herd.get_mut(id);
            animal.set_death_day(self.day);
            let position = animal.position();
            let life_span = animal.life_span();
            info!(animal = %id, %position, life_span, "animal died");
            events.push(WorldEvent::AnimalDied {
                id,
                position,
                life_span,
            });
        }
    }

    fn breed_at(&mut self, position: Position, events: &mut Vec<WorldEvent>) {
        let Some((first, second)) = self.map.reproduce(&mut self.herd, position) else {
            return;
        };
        let id = self.herd.allocate_id();
        let child = Animal::bred(
            id,
            self.herd.get(first),
            self.herd.get(second),
            self.map.energy(),
            self.day,
        );
        self.herd.insert(child);
        self.herd.get_mut(first).record_child(id);
        self.herd.get_mut(second).record_child(id);
        self.map.place_animal(&self.herd, id);
        self.alive.push(id);
        self.index_genome(id);

        info!(
            child = %id,
            %position,
            first_parent = %first,
            second_parent = %second,
            "animal born"
        );
        events.push(WorldEvent::AnimalBorn {
            id,
            position,
            parents: (first, second),
        });
    }

    fn index_genome(&mut self, id: AnimalId) {
        let genome = self.herd.get(id).genome().clone();
        match self.genome_index.entry(genome) {
            Entry::Occupied(mut entry) => entry.get_mut().push(id),
            Entry::Vacant(entry) => {
                self.genome_order.push(entry.key().clone());
                entry.insert(vec![id]);
            }
        }
    }

    /// Recompute every statistic from scratch. Calling this twice without
    /// intervening mutation yields identical results.
    pub fn update_stats(&mut self) {
        let average_energy = if self.alive.is_empty() {
            0.0
        } else {
            self.alive
                .iter()
                .map(|&id| self.herd.get(id).energy() as f32)
                .sum::<f32>()
                / self.alive.len() as f32
        };
        let average_life_span = if self.dead.is_empty() {
            0.0
        } else {
            self.dead
                .iter()
                .map(|&id| self.herd.get(id).life_span() as f32)
                .sum::<f32>()
                / self.dead.len() as f32
        };
        let average_children = if self.alive.is_empty() {
            0.0
        } else {
            self.alive
                .iter()
                .map(|&id| self.herd.get(id).children().len() as f32)
                .sum::<f32>()
                / self.alive.len() as f32
        };

        let mut most_popular: Option<(&Genome, usize)> = None;
        for genome in &self.genome_order {
            let count = self.genome_index[genome].len();
            if most_popular.map_or(true, |(_, best)| count > best) {
                most_popular = Some((genome, count));
            }
        }

        self.stats = Statistics {
            average_energy,
            average_life_span,
            average_children,
            dead_count: self.dead.len(),
            most_popular_genome: most_popular.map(|(genome, _)| genome.clone()),
        };
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn map(&self) -> &WorldMap {
        &self.map
    }

    pub fn herd(&self) -> &Herd {
        &self.herd
    }

    pub fn alive(&self) -> &[AnimalId] {
        &self.alive
    }

    pub fn alive_count(&self) -> usize {
        self.alive.len()
    }

    pub fn stats(&self) -> &Statistics {
        &self.stats
    }

    /// Live carriers of the currently most popular genome
    pub fn animals_with_most_popular_genome(&self) -> Vec<AnimalId> {
        let Some(genome) = &self.stats.most_popular_genome else {
            return Vec::new();
        };
        self.genome_index[genome]
            .iter()
            .copied()
            .filter(|&id| self.herd.get(id).death_day().is_none())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use savanna_core::{EnergyConfig, MapConfig, TopologyKind};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn small_config() -> SimulationConfig {
        SimulationConfig {
            seed: 42,
            map: MapConfig {
                width: 10,
                height: 10,
                topology: TopologyKind::Bounded,
            },
            ..SimulationConfig::default()
        }
    }

    fn state_snapshot(sim: &Simulation) -> (u32, Vec<(u64, i32, i32, i32)>, Vec<Position>, Statistics) {
        let animals = sim
            .alive()
            .iter()
            .map(|&id| {
                let animal = sim.herd().get(id);
                (id.0, animal.position().x, animal.position().y, animal.energy())
            })
            .collect();
        (
            sim.day(),
            animals,
            sim.map().grass_positions(),
            sim.stats().clone(),
        )
    }

    #[test]
    fn test_construction_seeds_population() {
        let sim = Simulation::new(small_config()).unwrap();
        assert_eq!(sim.day(), 1);
        assert_eq!(sim.alive_count(), 15);
        assert_eq!(sim.map().count_grass(), 30);
        assert!(sim.stats().most_popular_genome.is_some());
        assert_eq!(sim.stats().dead_count, 0);
        assert_eq!(
            sim.stats().average_energy,
            EnergyConfig::default().starting_energy as f32
        );
    }

    #[test]
    fn test_empty_world_has_zeroed_stats() {
        let config = SimulationConfig {
            starting_animals: 0,
            starting_grass: 0,
            ..small_config()
        };
        let sim = Simulation::new(config).unwrap();
        assert_eq!(sim.alive_count(), 0);
        assert_eq!(sim.stats().average_energy, 0.0);
        assert_eq!(sim.stats().average_children, 0.0);
        assert!(sim.stats().most_popular_genome.is_none());
        assert!(sim.animals_with_most_popular_genome().is_empty());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = small_config();
        config.map.height = 0;
        assert!(Simulation::new(config).is_err());
    }

    #[test]
    fn test_day_counter_and_report_day() {
        let mut sim = Simulation::new(small_config()).unwrap();
        let report = sim.tick();
        assert_eq!(report.day, 1);
        assert_eq!(sim.day(), 2);
    }

    #[test]
    fn test_starved_animals_die_with_stamped_day() {
        let config = SimulationConfig {
            starting_animals: 4,
            starting_grass: 0,
            daily_grass_growth: 0,
            energy: EnergyConfig {
                starting_energy: 2,
                energy_to_move: 1,
                ..EnergyConfig::default()
            },
            genome_length: 3,
            ..small_config()
        };
        let mut sim = Simulation::new(config).unwrap();

        sim.tick(); // energy 2 -> 1
        sim.tick(); // energy 1 -> 0
        assert_eq!(sim.alive_count(), 4);

        let report = sim.tick(); // sweep removes everyone
        let deaths = report
            .events
            .iter()
            .filter(|e| matches!(e, WorldEvent::AnimalDied { .. }))
            .count();
        assert_eq!(deaths, 4);
        assert_eq!(sim.alive_count(), 0);
        assert_eq!(sim.stats().dead_count, 4);
        // Born on day 1, swept on day 3
        assert_eq!(sim.stats().average_life_span, 2.0);
    }

    #[test]
    fn test_reproduction_creates_and_rosters_child() {
        let config = SimulationConfig {
            seed: 7,
            map: MapConfig {
                width: 1,
                height: 1,
                topology: TopologyKind::Bounded,
            },
            starting_animals: 2,
            starting_grass: 0,
            daily_grass_growth: 0,
            energy: EnergyConfig {
                starting_energy: 100,
                energy_to_move: 1,
                energy_from_eating: 10,
                energy_to_reproduce: 10,
                energy_to_full: 30,
            },
            genome_length: 4,
        };
        let mut sim = Simulation::new(config).unwrap();
        let parents: Vec<AnimalId> = sim.alive().to_vec();

        let report = sim.tick();
        let births: Vec<_> = report
            .events
            .iter()
            .filter(|e| matches!(e, WorldEvent::AnimalBorn { .. }))
            .collect();
        assert_eq!(births.len(), 1);
        assert_eq!(sim.alive_count(), 3);

        let child = *sim.alive().last().unwrap();
        assert!(!parents.contains(&child));
        let herd = sim.herd();
        assert_eq!(herd.get(child).energy(), 20);
        assert_eq!(herd.get(child).genome().len(), 4);
        assert_eq!(herd.get(child).birth_day(), 1);
        for &parent in &parents {
            assert_eq!(herd.get(parent).children(), &[child]);
            // 100 - move - reproduction share
            assert_eq!(herd.get(parent).energy(), 89);
        }
        assert!((sim.stats().average_children - 2.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_stats_refresh_is_idempotent() {
        let mut sim = Simulation::new(small_config()).unwrap();
        for _ in 0..5 {
            sim.tick();
        }
        sim.update_stats();
        let first = sim.stats().clone();
        sim.update_stats();
        assert_eq!(&first, sim.stats());
    }

    #[test]
    fn test_most_popular_genome_ties_break_first_seen() {
        let sim = Simulation::new(small_config()).unwrap();
        // All seeded genomes are counted once, so the first indexed one wins
        let first = sim.herd().get(AnimalId(1)).genome().clone();
        assert_eq!(sim.stats().most_popular_genome, Some(first));
        assert!(!sim.animals_with_most_popular_genome().is_empty());
    }

    #[test]
    fn test_run_respects_run_flag() {
        let mut sim = Simulation::new(small_config()).unwrap();
        sim.run(5);
        assert_eq!(sim.day(), 1); // never started

        sim.start_running();
        assert!(sim.is_running());
        sim.run(5);
        assert_eq!(sim.day(), 6);

        sim.stop_running();
        sim.run(5);
        assert_eq!(sim.day(), 6);
    }

    #[test]
    fn test_observer_hears_every_tick() {
        struct Recorder(Rc<RefCell<Vec<u32>>>);
        impl MapChangeListener for Recorder {
            fn map_changed(&mut self, _world: &WorldMap, report: &TickReport) {
                self.0.borrow_mut().push(report.day);
            }
        }

        let days = Rc::new(RefCell::new(Vec::new()));
        let mut sim = Simulation::new(small_config()).unwrap();
        sim.add_observer(Box::new(Recorder(days.clone())));
        for _ in 0..3 {
            sim.tick();
        }
        assert_eq!(*days.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn test_fixed_seed_runs_are_identical() {
        let mut first = Simulation::new(small_config()).unwrap();
        let mut second = Simulation::new(small_config()).unwrap();
        assert_eq!(state_snapshot(&first), state_snapshot(&second));

        first.start_running();
        second.start_running();
        first.run(25);
        second.run(25);
        assert_eq!(state_snapshot(&first), state_snapshot(&second));
    }

    #[test]
    fn test_wrapping_topology_runs_deterministically() {
        let config = SimulationConfig {
            map: MapConfig {
                width: 8,
                height: 8,
                topology: TopologyKind::Wrapping,
            },
            ..small_config()
        };
        let mut first = Simulation::new(config.clone()).unwrap();
        let mut second = Simulation::new(config).unwrap();
        first.start_running();
        second.start_running();
        first.run(15);
        second.run(15);
        assert_eq!(state_snapshot(&first), state_snapshot(&second));

        // Every survivor is still on the map
        for &id in first.alive() {
            assert!(first.map().bounds().contains(first.herd().get(id).position()));
        }
    }
}
