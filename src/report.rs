//! @dose
//! purpose: The status channel. Rigby narrates a run (start, per-file complaints, the final
//!     tally) to a writer that is kept apart from the digest output, so the digest can be
//!     piped or redirected on its own.
//!
//! invariants:
//!     - Nothing written here ever goes to the data channel
//!     - finished() is called exactly once per run, even when zero items were found
//!
//! gotchas:
//!     - Verbose notes share the status writer and are dropped unless verbose is set

use std::fmt::Display;
use std::io::{self, Write};
use std::path::Path;

/// Writes Rigby's status and error messages
pub struct Reporter<W: Write> {
    out: W,
    verbose: bool,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, verbose: bool) -> Self {
        Self { out, verbose }
    }

    pub fn started(&mut self, path: &Path) -> io::Result<()> {
        writeln!(
            self.out,
            "Ugh, fine. Scanning {}... Don't make me work too hard.",
            path.display()
        )
    }

    pub fn file_failed(&mut self, path: &Path, error: impl Display) -> io::Result<()> {
        writeln!(
            self.out,
            "Dude, stop! This file is trash. I can't parse it. {}: {}",
            path.display(),
            error
        )
    }

    pub fn finished(&mut self, items_found: usize) -> io::Result<()> {
        writeln!(
            self.out,
            "Ooooooh! Done! Found {} items. Here is your TOON context. In your face!",
            items_found
        )?;
        self.out.flush()
    }

    /// Extra detail, only shown with --verbose
    pub fn note(&mut self, message: impl Display) -> io::Result<()> {
        if self.verbose {
            writeln!(self.out, "  {}", message)?;
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
