//! Befunge-93 interpreter entry point.
//!
//! Usage: `befunge <program> [--input FILE] [--step-cap N] [--seed N]`

fn main() {
    befunge::init_logging();

    if let Err(e) = befunge::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
