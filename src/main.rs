//! # Tabjobs Entry Point
//!
//! ```text
//! main()
//!   │
//!   ├─> Install the logger (env_logger, RUST_LOG)
//!   ├─> Parse CLI arguments (clap)
//!   └─> Run one job: categories | membership | names | products | split
//! ```
//!
//! Every subcommand runs with its built-in defaults when given no flags:
//! ```bash
//! tabjobs names
//! tabjobs split --rows-per-file 500
//! tabjobs products --config products.json
//! ```
//!
//! Exit code is 0 on success and 1 on any handled failure (missing, empty
//! or malformed input, bad configuration, write errors).

#![warn(clippy::all, rust_2018_idioms)]
#![expect(clippy::print_stdout, clippy::print_stderr)] // The binary reports to the console

mod cli;

use clap::Parser as _;
use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(err) = tabjobs::logging::init() {
        eprintln!("{err:#}");
    }

    let cli = cli::Cli::parse();

    match cli::run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::debug!("Job failed: {err:?}");
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
