//! Befunge-93 command-line interpreter.
//!
//! Loads a program file into the 80x25 playfield, wires up input (an
//! optional file, falling back to standard input) and standard output,
//! and runs the virtual machine to completion.

mod error;

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use befunge_vm::{execute, ExecuteOutcome, InputStream, Interp, Playfield, DEFAULT_STEP_CAP};

pub use error::CliError;

#[derive(Parser, Debug)]
#[command(name = "befunge")]
#[command(about = "Run a Befunge-93 program")]
pub struct Args {
    /// Path to the Befunge-93 program file.
    pub program: PathBuf,

    /// File providing the program's input; standard input when omitted.
    #[arg(long = "input", short = 'i')]
    pub input: Option<PathBuf>,

    /// Maximum number of instruction cycles before the run is stopped.
    #[arg(long = "step-cap", default_value_t = DEFAULT_STEP_CAP)]
    pub step_cap: u64,

    /// Seed for the `?` direction generator; OS entropy when omitted.
    #[arg(long = "seed")]
    pub seed: Option<u64>,
}

/// Install the tracing subscriber. Events go to stderr so they never mix
/// with program output on stdout.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Parse arguments from the process environment and run.
pub fn run() -> Result<(), CliError> {
    run_with(Args::parse())
}

/// Run a program as described by `args`.
pub fn run_with(args: Args) -> Result<(), CliError> {
    let source = fs::read_to_string(&args.program).map_err(|source| CliError::ReadProgram {
        path: args.program.clone(),
        source,
    })?;

    let data = match &args.input {
        Some(path) => fs::read(path).map_err(|source| CliError::ReadInput {
            path: path.clone(),
            source,
        })?,
        None => read_stdin()?,
    };

    info!(program = %args.program.display(), "running");

    let mut interp = Interp::with_step_cap(Playfield::parse(&source), args.step_cap);
    let mut input = InputStream::new(data);
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let outcome = execute(&mut interp, &mut input, &mut out, &mut rng)?;

    match outcome {
        ExecuteOutcome::Halted => debug!(steps = interp.steps(), "halted normally"),
        ExecuteOutcome::StepLimit => {
            warn!(steps = interp.steps(), "stopped at step cap without halting")
        }
    }

    Ok(())
}

/// Drain standard input when it is a pipe or file; an interactive
/// terminal yields an empty buffer instead of blocking on EOF.
fn read_stdin() -> Result<Vec<u8>, CliError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(Vec::new());
    }
    let mut data = Vec::new();
    stdin.lock().read_to_end(&mut data).map_err(CliError::ReadStdin)?;
    Ok(data)
}
