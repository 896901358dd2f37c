//! Configuration types for the simulation.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Map topology variant, selecting how an off-map step is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TopologyKind {
    /// Steps past an edge leave the animal in place
    Bounded,
    /// Toroidal world: both axes wrap around
    Wrapping,
}

impl Default for TopologyKind {
    fn default() -> Self {
        TopologyKind::Bounded
    }
}

/// Map configuration parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    /// Width of the world grid
    pub width: i32,
    /// Height of the world grid
    pub height: i32,
    /// Topology variant
    pub topology: TopologyKind,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: 20,
            height: 20,
            topology: TopologyKind::Bounded,
        }
    }
}

/// Energy and cost configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnergyConfig {
    /// Starting energy for seeded animals
    pub starting_energy: i32,
    /// Energy spent on each daily move
    pub energy_to_move: i32,
    /// Energy gained by eating one grass item
    pub energy_from_eating: i32,
    /// Energy each parent transfers to a child on reproduction
    pub energy_to_reproduce: i32,
    /// Minimum energy of the weaker parent for reproduction to happen
    pub energy_to_full: i32,
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            starting_energy: 50,
            energy_to_move: 1,
            energy_from_eating: 10,
            energy_to_reproduce: 15,
            energy_to_full: 30,
        }
    }
}

/// Full simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Random seed for reproducibility
    pub seed: u64,
    /// Map configuration
    pub map: MapConfig,
    /// Energy configuration
    pub energy: EnergyConfig,
    /// Number of animals seeded at start
    pub starting_animals: usize,
    /// Number of grass items seeded at start
    pub starting_grass: usize,
    /// Number of grass items grown per day
    pub daily_grass_growth: usize,
    /// Number of genes in every genome
    pub genome_length: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            map: MapConfig::default(),
            energy: EnergyConfig::default(),
            starting_animals: 15,
            starting_grass: 30,
            daily_grass_growth: 5,
            genome_length: 8,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.map.width < 1 || self.map.height < 1 {
            return Err(Error::Config(format!(
                "map dimensions must be positive, got {}x{}",
                self.map.width, self.map.height
            )));
        }
        if self.genome_length == 0 {
            return Err(Error::Config("genome length must be positive".to_string()));
        }
        Ok(())
    }
}
