//! @dose
//! purpose: This module defines the command-line interface for rigby using the clap derive
//!     macros: the global flags and the parse subcommand.
//!
//! when-editing:
//!     - !Global flags (verbose, config) are defined on Cli and propagate to all subcommands
//!     - New subcommands need an Args struct and a Commands variant
//!
//! invariants:
//!     - PathBuf is used for all file/directory path arguments
//!
//! gotchas:
//!     - --exclude may be repeated; the values are appended to rigby.toml's patterns

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rigby")]
#[command(author, version, about = "Rigby: The code raccoon.")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (defaults to ./rigby.toml when present)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse python files to TOON format
    Parse(ParseArgs),
}

#[derive(Args, Default)]
pub struct ParseArgs {
    /// Path to file or directory
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Exclude files/directories matching glob pattern (can be repeated)
    #[arg(long, value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Write the TOON digest to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}
