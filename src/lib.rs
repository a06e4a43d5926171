//! @dose
//! purpose: This is the library crate root for rigby, exposing the public API for use as both
//!     a CLI tool and a library. It re-exports the frontend, formatter and scan entry points.
//!
//! when-editing:
//!     - !All public modules must be declared here with pub mod
//!     - Keep the re-export list organized by module
//!
//! invariants:
//!     - format_module is a pure function of its Module; all I/O lives in commands
//!
//! gotchas:
//!     - The lib.rs is separate from main.rs - library consumers get lib, CLI gets main

pub mod cli;
pub mod commands;
pub mod config;
pub mod exclusion;
pub mod formatter;
pub mod parser;
pub mod report;
pub mod types;

// Re-export main types for convenience
pub use cli::{Cli, Commands, ParseArgs};
pub use commands::{process_file, process_path};
pub use formatter::{format_module, RenderContext};
pub use parser::{LanguageParser, ParseError, PythonParser};
pub use report::Reporter;
pub use types::{
    AnnotatedAssignment, ClassDecl, Digest, Expr, FileOutcome, FunctionDecl, Module, Parameter,
    ParameterList, RenderError, RunResult, Statement,
};
