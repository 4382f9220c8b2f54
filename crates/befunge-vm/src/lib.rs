//! Befunge-93 Virtual Machine
//!
//! This crate provides the core virtual machine for executing Befunge-93
//! programs. A program is an 80x25 grid of characters; the instruction
//! pointer walks the grid in one of four cardinal directions, wrapping
//! toroidally at the edges, and each character it lands on transforms the
//! machine state.
//!
//! # Architecture
//!
//! The VM handles:
//! - Playfield management (the fixed-size, runtime-mutable program grid)
//! - Operand stack with Befunge's empty-pop-yields-zero rule
//! - Cursor movement with toroidal wraparound
//! - String mode (characters pushed as code points instead of executed)
//! - The instruction dispatch loop with a step-count safety cap
//!
//! Input, output, and randomness are injected by the caller, so runs are
//! fully deterministic under test: input comes from an [`InputStream`],
//! output goes to any `std::io::Write` (flushed after every write), and
//! the `?` instruction samples its direction from a caller-supplied
//! `rand::Rng`.
//!
//! # Example
//!
//! ```
//! use befunge_vm::{execute, ExecuteOutcome, InputStream, Interp, Playfield};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let mut interp = Interp::new(Playfield::parse("23+.@"));
//! let mut input = InputStream::empty();
//! let mut output = Vec::new();
//! let mut rng = StdRng::seed_from_u64(0);
//!
//! let outcome = execute(&mut interp, &mut input, &mut output, &mut rng).unwrap();
//! assert_eq!(outcome, ExecuteOutcome::Halted);
//! assert_eq!(output, b"5 ");
//! ```

mod cursor;
mod error;
mod execute;
mod input;
mod machine;
mod playfield;
mod stack;

pub use cursor::{Cursor, Direction};
pub use error::RuntimeError;
pub use execute::{execute, ExecuteOutcome};
pub use input::InputStream;
pub use machine::{Interp, DEFAULT_STEP_CAP};
pub use playfield::{Playfield, HEIGHT, WIDTH};
pub use stack::Stack;
