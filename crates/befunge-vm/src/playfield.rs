//! The Befunge-93 playfield.
//!
//! A fixed 80x25 grid of characters holding the program text and any data
//! the program writes back into it at runtime with `p`. The grid never
//! resizes; cursor movement wraps at the edges, and the `g`/`p`
//! instructions bounds-check before touching a cell.

/// Playfield width in cells.
pub const WIDTH: usize = 80;

/// Playfield height in cells.
pub const HEIGHT: usize = 25;

/// The program grid.
#[derive(Clone)]
pub struct Playfield {
    cells: Vec<char>,
}

impl Playfield {
    /// Build a playfield from program source text.
    ///
    /// Each source line is truncated to [`WIDTH`] and right-padded with
    /// spaces; only the first [`HEIGHT`] lines are used, and missing rows
    /// are all-space.
    pub fn parse(source: &str) -> Self {
        let mut cells = vec![' '; WIDTH * HEIGHT];
        for (y, line) in source.lines().take(HEIGHT).enumerate() {
            for (x, ch) in line.chars().take(WIDTH).enumerate() {
                cells[y * WIDTH + x] = ch;
            }
        }
        Self { cells }
    }

    /// Whether a coordinate pair addresses a cell.
    pub fn in_bounds(x: i64, y: i64) -> bool {
        (0..WIDTH as i64).contains(&x) && (0..HEIGHT as i64).contains(&y)
    }

    /// Read the cell at (x, y). Callers must bounds-check first.
    pub fn get(&self, x: usize, y: usize) -> char {
        self.cells[y * WIDTH + x]
    }

    /// Overwrite the cell at (x, y). Callers must bounds-check first.
    pub fn put(&mut self, x: usize, y: usize, ch: char) {
        self.cells[y * WIDTH + x] = ch;
    }
}
