//! @dose
//! purpose: This is the CLI entry point for rigby. It parses command-line arguments using clap,
//!     loads rigby.toml, and dispatches to the command handler.
//!
//! when-editing:
//!     - !All command handlers are imported from the rigby crate
//!     - Error messages are printed to stderr and exit with code 1
//!
//! invariants:
//!     - The process exits with 0 when the scan ran, even if individual files failed to parse
//!
//! do-not:
//!     - Never add business logic here - delegate to command modules

use anyhow::Context;
use clap::Parser;
use rigby::cli::{Cli, Commands};
use rigby::commands::run_parse;
use rigby::config::Config;
use std::env;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::discover(&env::current_dir().context("Failed to get current directory")?),
    };

    match cli.command {
        Commands::Parse(args) => run_parse(&args, &config, cli.verbose),
    }
}
