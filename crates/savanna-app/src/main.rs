//! Console runner for the savanna simulation.
//!
//! Pacing lives here, not in the core: the binary calls `tick` and sleeps
//! between days, checking the run flag before sleeping and before starting
//! the next day.

mod display;

use anyhow::{Context, Result};
use savanna_core::SimulationConfig;
use savanna_world::Simulation;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{env, fs, thread};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
struct RunConfig {
    /// Number of days to simulate
    days: u64,
    /// Real-time pause between days, in milliseconds
    pause_ms: u64,
    simulation: SimulationConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            days: 100,
            pause_ms: 700,
            simulation: SimulationConfig::default(),
        }
    }
}

fn load_config() -> Result<RunConfig> {
    match env::args().nth(1) {
        Some(path) => {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("reading config file {path}"))?;
            serde_json::from_str(&raw).with_context(|| format!("parsing config file {path}"))
        }
        None => Ok(RunConfig::default()),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = load_config()?;
    info!(days = config.days, pause_ms = config.pause_ms, "starting savanna");

    let mut simulation = Simulation::new(config.simulation)?;
    simulation.add_observer(Box::new(display::ConsoleDisplay::new()));

    simulation.start_running();
    for _ in 0..config.days {
        if !simulation.is_running() {
            break;
        }
        simulation.tick();
        if simulation.is_running() && config.pause_ms > 0 {
            thread::sleep(Duration::from_millis(config.pause_ms));
        }
    }
    simulation.stop_running();

    let stats = simulation.stats();
    info!(
        day = simulation.day(),
        alive = simulation.alive_count(),
        dead = stats.dead_count,
        average_energy = stats.average_energy,
        average_life_span = stats.average_life_span,
        "simulation finished"
    );
    Ok(())
}
