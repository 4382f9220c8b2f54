//! Instruction pointer position and direction of travel.
//!
//! The cursor walks the playfield one cell per instruction cycle. Moving
//! past an edge re-enters from the opposite edge, so the position is
//! always in bounds.

use rand::distributions::{Distribution, Standard};
use rand::Rng;

use crate::playfield::{HEIGHT, WIDTH};

/// Direction of travel, one of the four cardinals.
///
/// The grid's y axis grows downward, so `South` is "down the page".
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    East,
    West,
    North,
    South,
}

impl Direction {
    /// Unit vector as (dx, dy).
    pub fn delta(self) -> (i64, i64) {
        match self {
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
            Direction::North => (0, -1),
            Direction::South => (0, 1),
        }
    }
}

impl Distribution<Direction> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Direction {
        match rng.gen_range(0..4u8) {
            0 => Direction::East,
            1 => Direction::West,
            2 => Direction::North,
            _ => Direction::South,
        }
    }
}

/// Execution position on the playfield plus current velocity.
#[derive(Copy, Clone, Debug)]
pub struct Cursor {
    x: usize,
    y: usize,
    dir: Direction,
}

impl Cursor {
    /// Cursor at the origin, heading east.
    pub fn new() -> Self {
        Self {
            x: 0,
            y: 0,
            dir: Direction::East,
        }
    }

    pub fn x(&self) -> usize {
        self.x
    }

    pub fn y(&self) -> usize {
        self.y
    }

    pub fn dir(&self) -> Direction {
        self.dir
    }

    /// Set the direction of travel.
    pub fn face(&mut self, dir: Direction) {
        self.dir = dir;
    }

    /// Move one cell along the current direction, wrapping toroidally.
    pub fn advance(&mut self) {
        let (dx, dy) = self.dir.delta();
        self.x = (self.x as i64 + dx).rem_euclid(WIDTH as i64) as usize;
        self.y = (self.y as i64 + dy).rem_euclid(HEIGHT as i64) as usize;
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}
