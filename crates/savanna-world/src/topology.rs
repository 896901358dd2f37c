//! Map topology: how a forward step is resolved against the map edges.
//!
//! The world map is handed a topology at construction instead of being
//! subclassed per variant; both implementations are pure functions over
//! the map bounds.

use savanna_core::{Boundary, MapDirection, Position, TopologyKind};
use std::fmt;

pub trait Topology: fmt::Debug + Send + Sync {
    /// Resolve one forward step from `from` along `heading`. Returns the
    /// position and heading the animal ends up with.
    fn resolve(
        &self,
        bounds: &Boundary,
        from: Position,
        heading: MapDirection,
    ) -> (Position, MapDirection);
}

/// Hard-edged map: a step past an edge is dropped and the animal stays in
/// place, keeping its already-updated heading.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bounded;

impl Topology for Bounded {
    fn resolve(
        &self,
        bounds: &Boundary,
        from: Position,
        heading: MapDirection,
    ) -> (Position, MapDirection) {
        let (dx, dy) = heading.offset();
        let target = from.add(dx, dy);
        if bounds.contains(target) {
            (target, heading)
        } else {
            (from, heading)
        }
    }
}

/// Toroidal map: both axes wrap around.
#[derive(Debug, Clone, Copy, Default)]
pub struct Wrapping;

impl Topology for Wrapping {
    fn resolve(
        &self,
        bounds: &Boundary,
        from: Position,
        heading: MapDirection,
    ) -> (Position, MapDirection) {
        let (dx, dy) = heading.offset();
        let target = from.add(dx, dy);
        let lower_left = bounds.lower_left();
        let wrapped = Position::new(
            lower_left.x + (target.x - lower_left.x).rem_euclid(bounds.width()),
            lower_left.y + (target.y - lower_left.y).rem_euclid(bounds.height()),
        );
        (wrapped, heading)
    }
}

pub fn from_kind(kind: TopologyKind) -> Box<dyn Topology> {
    match kind {
        TopologyKind::Bounded => Box::new(Bounded),
        TopologyKind::Wrapping => Box::new(Wrapping),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> Boundary {
        Boundary::new(Position::new(0, 0), Position::new(4, 4))
    }

    #[test]
    fn test_bounded_keeps_valid_steps() {
        let (position, heading) =
            Bounded.resolve(&bounds(), Position::new(2, 2), MapDirection::NorthEast);
        assert_eq!(position, Position::new(3, 3));
        assert_eq!(heading, MapDirection::NorthEast);
    }

    #[test]
    fn test_bounded_blocks_edge_steps() {
        let (position, heading) =
            Bounded.resolve(&bounds(), Position::new(4, 4), MapDirection::North);
        assert_eq!(position, Position::new(4, 4));
        assert_eq!(heading, MapDirection::North);
    }

    #[test]
    fn test_wrapping_wraps_both_axes() {
        let (position, _) =
            Wrapping.resolve(&bounds(), Position::new(4, 0), MapDirection::SouthEast);
        assert_eq!(position, Position::new(0, 4));
    }

    #[test]
    fn test_wrapping_respects_offset_origin() {
        let shifted = Boundary::new(Position::new(2, 2), Position::new(6, 6));
        let (position, _) = Wrapping.resolve(&shifted, Position::new(2, 2), MapDirection::SouthWest);
        assert_eq!(position, Position::new(6, 6));
    }
}
