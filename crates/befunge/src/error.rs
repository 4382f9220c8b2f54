//! Error types for the command-line harness.
//!
//! Startup failures (unreadable files) never pass through the engine;
//! they are reported here as configuration errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when setting up or running a program.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read program at {path}: {source}")]
    ReadProgram {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read input file at {path}: {source}")]
    ReadInput {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read standard input: {0}")]
    ReadStdin(std::io::Error),

    #[error(transparent)]
    Runtime(#[from] befunge_vm::RuntimeError),
}
