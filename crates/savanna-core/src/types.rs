//! Core type definitions for the simulation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an animal instance.
///
/// Ids are allocated sequentially so that winner ranking and event logs
/// come out identical across runs with the same seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AnimalId(pub u64);

impl fmt::Display for AnimalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 2D position in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset by a movement vector. No bounds checking; bounds are a
    /// world-map concern.
    pub fn add(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Componentwise `<=` against another position
    pub fn precedes(&self, other: Position) -> bool {
        self.x <= other.x && self.y <= other.y
    }

    /// Componentwise `>=` against another position
    pub fn follows(&self, other: Position) -> bool {
        self.x >= other.x && self.y >= other.y
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Facing of an animal on the map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MapDirection {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl MapDirection {
    pub fn all() -> [MapDirection; 8] {
        [
            MapDirection::North,
            MapDirection::NorthEast,
            MapDirection::East,
            MapDirection::SouthEast,
            MapDirection::South,
            MapDirection::SouthWest,
            MapDirection::West,
            MapDirection::NorthWest,
        ]
    }

    pub fn index(&self) -> u8 {
        match self {
            MapDirection::North => 0,
            MapDirection::NorthEast => 1,
            MapDirection::East => 2,
            MapDirection::SouthEast => 3,
            MapDirection::South => 4,
            MapDirection::SouthWest => 5,
            MapDirection::West => 6,
            MapDirection::NorthWest => 7,
        }
    }

    pub fn from_index(index: u8) -> Self {
        Self::all()[(index % 8) as usize]
    }

    /// Rotate clockwise by the given number of eighth turns
    pub fn rotated(&self, steps: u8) -> Self {
        Self::from_index(self.index().wrapping_add(steps % 8))
    }

    /// Unit movement vector, with north pointing towards growing `y`
    pub fn offset(&self) -> (i32, i32) {
        match self {
            MapDirection::North => (0, 1),
            MapDirection::NorthEast => (1, 1),
            MapDirection::East => (1, 0),
            MapDirection::SouthEast => (1, -1),
            MapDirection::South => (0, -1),
            MapDirection::SouthWest => (-1, -1),
            MapDirection::West => (-1, 0),
            MapDirection::NorthWest => (-1, 1),
        }
    }
}

impl fmt::Display for MapDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MapDirection::North => "N",
            MapDirection::NorthEast => "NE",
            MapDirection::East => "E",
            MapDirection::SouthEast => "SE",
            MapDirection::South => "S",
            MapDirection::SouthWest => "SW",
            MapDirection::West => "W",
            MapDirection::NorthWest => "NW",
        };
        write!(f, "{label}")
    }
}

/// Inclusive axis-aligned rectangular region of the map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Boundary {
    lower_left: Position,
    upper_right: Position,
}

impl Boundary {
    /// Panics when the corners are not ordered; a malformed region is a
    /// programming error, not a runtime condition.
    pub fn new(lower_left: Position, upper_right: Position) -> Self {
        assert!(
            lower_left.precedes(upper_right),
            "malformed boundary: {lower_left} does not precede {upper_right}"
        );
        Self {
            lower_left,
            upper_right,
        }
    }

    pub fn lower_left(&self) -> Position {
        self.lower_left
    }

    pub fn upper_right(&self) -> Position {
        self.upper_right
    }

    pub fn width(&self) -> i32 {
        self.upper_right.x - self.lower_left.x + 1
    }

    pub fn height(&self) -> i32 {
        self.upper_right.y - self.lower_left.y + 1
    }

    pub fn contains(&self, position: Position) -> bool {
        position.follows(self.lower_left) && position.precedes(self.upper_right)
    }

    /// Every contained position in row-major order: `y` ascending, `x`
    /// ascending within a row. Downstream passes (notably the daily
    /// reproduction scan) rely on this order for reproducibility.
    pub fn all_positions(&self) -> Vec<Position> {
        let mut positions =
            Vec::with_capacity((self.width() as usize).saturating_mul(self.height() as usize));
        for y in self.lower_left.y..=self.upper_right.y {
            for x in self.lower_left.x..=self.upper_right.x {
                positions.push(Position::new(x, y));
            }
        }
        positions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_add() {
        let pos = Position::new(2, 3);
        assert_eq!(pos.add(1, -1), Position::new(3, 2));
        assert_eq!(pos.add(0, 0), pos);
    }

    #[test]
    fn test_precedes_follows() {
        let a = Position::new(1, 1);
        let b = Position::new(3, 4);
        assert!(a.precedes(b));
        assert!(b.follows(a));
        assert!(!b.precedes(a));

        // Mixed components order neither way
        let c = Position::new(0, 5);
        assert!(!a.precedes(c) || !c.precedes(a));
        assert!(!c.follows(b));
    }

    #[test]
    fn test_direction_rotation() {
        assert_eq!(MapDirection::North.rotated(0), MapDirection::North);
        assert_eq!(MapDirection::North.rotated(1), MapDirection::NorthEast);
        assert_eq!(MapDirection::North.rotated(4), MapDirection::South);
        assert_eq!(MapDirection::West.rotated(3), MapDirection::NorthEast);
        assert_eq!(MapDirection::NorthWest.rotated(9), MapDirection::North);
    }

    #[test]
    fn test_direction_offsets_are_units() {
        for direction in MapDirection::all() {
            let (dx, dy) = direction.offset();
            assert!(dx.abs() <= 1 && dy.abs() <= 1);
            assert!((dx, dy) != (0, 0));
        }
        assert_eq!(MapDirection::North.offset(), (0, 1));
        assert_eq!(MapDirection::South.offset(), (0, -1));
    }

    #[test]
    fn test_boundary_contains() {
        let bounds = Boundary::new(Position::new(0, 0), Position::new(9, 9));
        assert!(bounds.contains(Position::new(0, 0)));
        assert!(bounds.contains(Position::new(9, 9)));
        assert!(bounds.contains(Position::new(4, 7)));
        assert!(!bounds.contains(Position::new(10, 5)));
        assert!(!bounds.contains(Position::new(5, -1)));
    }

    #[test]
    fn test_all_positions_row_major() {
        let bounds = Boundary::new(Position::new(1, 2), Position::new(3, 3));
        let positions = bounds.all_positions();
        assert_eq!(
            positions,
            vec![
                Position::new(1, 2),
                Position::new(2, 2),
                Position::new(3, 2),
                Position::new(1, 3),
                Position::new(2, 3),
                Position::new(3, 3),
            ]
        );
        assert_eq!(positions.len(), (bounds.width() * bounds.height()) as usize);
    }

    #[test]
    #[should_panic(expected = "malformed boundary")]
    fn test_malformed_boundary_panics() {
        Boundary::new(Position::new(5, 5), Position::new(0, 0));
    }
}
