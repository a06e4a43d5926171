//! @dose
//! purpose: Output-side types. A Digest is one file's TOON lines, FileOutcome is what
//!     happened to one candidate file, and RunResult folds outcomes into the merged text.
//!
//! invariants:
//!     - Only FileOutcome::Content changes a RunResult
//!     - File blocks are joined by exactly one blank line
//!
//! gotchas:
//!     - A Digest with zero lines is "empty" even if the caller built it by hand with a count

use std::path::PathBuf;

/// TOON lines for a single module plus the number of declarations recorded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Digest {
    pub lines: Vec<String>,
    pub items_found: usize,
}

impl Digest {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Result of processing one candidate file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Parsed and produced at least one line
    Content(Digest),
    /// Parsed fine but declared nothing the digest records
    Empty,
    /// Could not be read or parsed
    Failed { path: PathBuf, message: String },
}

impl FileOutcome {
    /// Classify a freshly formatted digest
    pub fn from_digest(digest: Digest) -> Self {
        if digest.is_empty() {
            FileOutcome::Empty
        } else {
            FileOutcome::Content(digest)
        }
    }
}

/// Aggregated digest for a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunResult {
    blocks: Vec<String>,
    pub items_found: usize,
}

impl RunResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one file's outcome into the run
    pub fn absorb(&mut self, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Content(digest) => {
                self.blocks.push(digest.text());
                self.items_found += digest.items_found;
            }
            FileOutcome::Empty | FileOutcome::Failed { .. } => {}
        }
    }

    /// Number of files that contributed text
    pub fn files_contributed(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn text(&self) -> String {
        self.blocks.join("\n\n")
    }
}
