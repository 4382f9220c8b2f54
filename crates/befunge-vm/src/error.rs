//! Runtime errors.
//!
//! The language itself has no fault conditions: empty pops yield 0,
//! division by zero yields 0, out-of-bounds grid access yields 0 or is
//! dropped, and unknown instructions are no-ops. The only way a run can
//! fail is when the output sink refuses a write.

/// Runtime error during execution.
#[derive(Debug)]
pub enum RuntimeError {
    /// Writing to the output sink failed.
    Output(std::io::Error),
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuntimeError::Output(e) => write!(f, "failed to write output: {}", e),
        }
    }
}

impl std::error::Error for RuntimeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RuntimeError::Output(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for RuntimeError {
    fn from(e: std::io::Error) -> Self {
        RuntimeError::Output(e)
    }
}
