//! Console rendering of the world, attached as a tick observer.

use savanna_world::{MapChangeListener, TickReport, WorldEvent, WorldMap};

/// Prints the day marker, lifecycle events and an ASCII view of the map
/// after every tick, plus a running count of updates received.
#[derive(Debug, Default)]
pub struct ConsoleDisplay {
    update_counter: u64,
}

impl ConsoleDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    fn render(world: &WorldMap) -> String {
        let bounds = world.bounds();
        let mut out = String::new();
        // Top row first so north points up
        for y in (bounds.lower_left().y..=bounds.upper_right().y).rev() {
            for x in bounds.lower_left().x..=bounds.upper_right().x {
                let position = savanna_core::Position::new(x, y);
                let occupants = world.animals_at(position).len();
                let cell = match occupants {
                    0 if world.grass_at(position).is_some() => '*',
                    0 => '.',
                    1..=9 => char::from_digit(occupants as u32, 10).unwrap_or('9'),
                    _ => '#',
                };
                out.push(cell);
            }
            out.push('\n');
        }
        out
    }
}

impl MapChangeListener for ConsoleDisplay {
    fn map_changed(&mut self, world: &WorldMap, report: &TickReport) {
        self.update_counter += 1;
        println!("Day {}", report.day);
        for event in &report.events {
            match event {
                WorldEvent::AnimalDied {
                    id,
                    position,
                    life_span,
                } => {
                    println!("  {id} died at {position} after {life_span} days");
                }
                WorldEvent::AnimalBorn { id, position, .. } => {
                    println!("  {id} born at {position}");
                }
            }
        }
        print!("{}", Self::render(world));
        println!("updates: {}\n", self.update_counter);
    }
}
