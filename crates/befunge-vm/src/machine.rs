//! Interpreter state.
//!
//! [`Interp`] owns everything a single run mutates: the playfield, the
//! operand stack, the cursor, the string-mode flag, and the step counter.
//! Input, output, and randomness stay outside, supplied per run.

use crate::cursor::Cursor;
use crate::playfield::Playfield;
use crate::stack::Stack;

/// Default maximum number of instruction cycles per run.
pub const DEFAULT_STEP_CAP: u64 = 10_000_000;

/// A Befunge-93 interpreter: one program plus its mutable run state.
pub struct Interp {
    pub(crate) playfield: Playfield,
    pub(crate) stack: Stack,
    pub(crate) cursor: Cursor,
    pub(crate) string_mode: bool,
    pub(crate) steps: u64,
    pub(crate) step_cap: u64,
}

impl Interp {
    /// Create an interpreter for a playfield with the default step cap.
    pub fn new(playfield: Playfield) -> Self {
        Self::with_step_cap(playfield, DEFAULT_STEP_CAP)
    }

    /// Create an interpreter with a custom step cap.
    pub fn with_step_cap(playfield: Playfield, step_cap: u64) -> Self {
        Self {
            playfield,
            stack: Stack::new(),
            cursor: Cursor::new(),
            string_mode: false,
            steps: 0,
            step_cap,
        }
    }

    /// The playfield, including any runtime self-modifications.
    pub fn playfield(&self) -> &Playfield {
        &self.playfield
    }

    /// The operand stack.
    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    /// The cursor position and direction.
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Whether the machine is currently inside a string literal.
    pub fn string_mode(&self) -> bool {
        self.string_mode
    }

    /// Instruction cycles executed so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// The configured step cap.
    pub fn step_cap(&self) -> u64 {
        self.step_cap
    }
}
