//! @dose
//! purpose: The language frontend seam. LanguageParser turns one file's source text into an
//!     owned declaration Module; the scan command only ever talks to this trait, so a
//!     different frontend (or a fake one in tests) can be dropped in.
//!
//! when-editing:
//!     - !parse_module must not keep any borrow of the source past its return
//!     - Syntax errors are ParseError::Syntax; expression render problems are NOT errors here,
//!       they travel inside Expr and are resolved by the formatter
//!
//! invariants:
//!     - A returned Module is complete; a partial tree is never handed out on failure
//!
//! gotchas:
//!     - Extensions are stored without the leading dot ("py", not ".py")

mod literal;
mod python;
mod render;

use crate::types::Module;
use std::path::Path;
use thiserror::Error;

pub use python::PythonParser;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("invalid syntax (line {line}, column {column})")]
    Syntax { line: usize, column: usize },
    #[error("{message} (line {line})")]
    Rejected { message: String, line: usize },
    #[error("Failed to set up parser: {0}")]
    Setup(String),
}

/// Trait for language frontends
pub trait LanguageParser: Send + Sync {
    /// Returns the language name (e.g., "python")
    fn language_name(&self) -> &'static str;

    /// Returns file extensions this parser handles in directory mode
    fn file_extensions(&self) -> &[&'static str];

    /// Parse source text into a declaration tree
    fn parse_module(&self, source: &str, file_path: &Path) -> Result<Module, ParseError>;

    /// Check whether a path carries one of this parser's extensions
    fn handles(&self, file_path: &Path) -> bool {
        file_path
            .extension()
            .and_then(|e| e.to_str())
            .map(|ext| self.file_extensions().contains(&ext))
            .unwrap_or(false)
    }
}
