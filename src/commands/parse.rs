//! @dose
//! purpose: This module implements the parse command: discover Python files under a path,
//!     digest each one independently, and emit the merged TOON text on the data channel
//!     while Rigby narrates progress and failures on the status channel.
//!
//! when-editing:
//!     - !One file's failure must never stop the run; it becomes FileOutcome::Failed
//!     - !The data channel is written once, after every candidate has been processed
//!     - File collection prunes ignored directories inside filter_entry, never afterwards
//!
//! invariants:
//!     - A single-file path is processed regardless of its extension
//!     - Files that parse but declare nothing contribute neither text nor a blank block
//!     - The end-of-run tally is reported even when nothing was found
//!
//! do-not:
//!     - Never write status text to the data channel
//!
//! gotchas:
//!     - Candidates are visited in sorted depth-first order so output is stable across runs
//!       and platforms
//!
//! flows:
//!     - Collect: single file, or WalkDir with pruning -> *.py candidates
//!     - Process: read -> parse_module -> format_module -> FileOutcome
//!     - Fold: RunResult::absorb per outcome -> write text -> report tally

use crate::cli::ParseArgs;
use crate::config::Config;
use crate::exclusion::Exclusions;
use crate::formatter::format_module;
use crate::parser::{LanguageParser, ParseError, PythonParser};
use crate::report::Reporter;
use crate::types::{FileOutcome, Module, RunResult};
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub fn run_parse(args: &ParseArgs, config: &Config, verbose: bool) -> Result<()> {
    let parser = PythonParser::new();
    let exclusions = Exclusions::new(&config.exclusion_config(&args.exclude));
    let mut reporter = Reporter::new(io::stderr().lock(), verbose);

    match &args.output {
        Some(output) => {
            let file = File::create(output)
                .with_context(|| format!("Failed to create output file {}", output.display()))?;
            let mut data = BufWriter::new(file);
            process_path(&args.path, &parser, &exclusions, &mut data, &mut reporter)
                .context("Failed to write TOON output")?;
        }
        None => {
            let mut data = io::stdout().lock();
            process_path(&args.path, &parser, &exclusions, &mut data, &mut reporter)
                .context("Failed to write TOON output")?;
        }
    }

    Ok(())
}

/// Digest everything under `path`. Only failures to write either channel are errors.
pub fn process_path<D: Write, S: Write>(
    path: &Path,
    parser: &dyn LanguageParser,
    exclusions: &Exclusions,
    data: &mut D,
    reporter: &mut Reporter<S>,
) -> io::Result<RunResult> {
    reporter.started(path)?;

    let files = collect_files(path, parser, exclusions, reporter)?;
    reporter.note(format!("{} candidate files", files.len()))?;

    let mut run = RunResult::new();
    for file in &files {
        let outcome = process_file(file, parser);
        match &outcome {
            FileOutcome::Content(digest) => {
                reporter.note(format!("{}: {} items", file.display(), digest.items_found))?;
            }
            FileOutcome::Empty => {
                reporter.note(format!("{}: nothing worth mentioning", file.display()))?;
            }
            FileOutcome::Failed { path: failed, message } => reporter.file_failed(failed, message)?,
        }
        run.absorb(&outcome);
    }

    if !run.is_empty() {
        writeln!(data, "{}", run.text())?;
        data.flush()?;
    }

    reporter.note(format!("{} files contributed", run.files_contributed()))?;
    reporter.finished(run.items_found)?;
    Ok(run)
}

/// List candidate files. Walk errors are reported and skipped.
pub fn collect_files<S: Write>(
    path: &Path,
    parser: &dyn LanguageParser,
    exclusions: &Exclusions,
    reporter: &mut Reporter<S>,
) -> io::Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !exclusions.skips(e.path(), e.file_type().is_dir(), path));

    for entry in walker {
        match entry {
            Ok(entry) => {
                let candidate = entry.path();
                if candidate.is_file() && parser.handles(candidate) {
                    files.push(candidate.to_path_buf());
                }
            }
            Err(e) => {
                let failed = e.path().unwrap_or(path).to_path_buf();
                reporter.file_failed(&failed, &e)?;
            }
        }
    }

    Ok(files)
}

/// Read, parse and format one file
pub fn process_file(path: &Path, parser: &dyn LanguageParser) -> FileOutcome {
    match parse_file(path, parser) {
        Ok(module) => FileOutcome::from_digest(format_module(&module)),
        Err(e) => FileOutcome::Failed {
            path: path.to_path_buf(),
            message: e.to_string(),
        },
    }
}

fn parse_file(path: &Path, parser: &dyn LanguageParser) -> Result<Module, ParseError> {
    let source = fs::read_to_string(path)?;
    parser.parse_module(&source, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exclusion::ExclusionConfig;
    use crate::types::{FunctionDecl, ParameterList, Statement};
    use tempfile::TempDir;

    struct Run {
        data: String,
        status: String,
        result: RunResult,
    }

    fn run_with(path: &Path, parser: &dyn LanguageParser, exclusions: &Exclusions) -> Run {
        let mut data = Vec::new();
        let mut reporter = Reporter::new(Vec::new(), false);
        let result = process_path(path, parser, exclusions, &mut data, &mut reporter).unwrap();
        Run {
            data: String::from_utf8(data).unwrap(),
            status: String::from_utf8(reporter.into_inner()).unwrap(),
            result,
        }
    }

    fn run(path: &Path) -> Run {
        run_with(path, &PythonParser::new(), &Exclusions::default())
    }

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_single_file() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "hello.py", "def hello(): pass\n");

        let out = run(&temp_dir.path().join("hello.py"));
        assert_eq!(out.data, "FUNC hello():\n");
        assert_eq!(out.result.items_found, 1);
        assert!(out.status.starts_with("Ugh, fine. Scanning "));
        assert!(out.status.contains("Found 1 items"));
    }

    #[test]
    fn test_single_file_ignores_extension() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "script", "class Tool: pass\n");

        let out = run(&temp_dir.path().join("script"));
        assert_eq!(out.data, "CLS Tool:\n");
    }

    #[test]
    fn test_directory_joins_files_with_blank_line() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "a.py", "class A: pass\n");
        write(temp_dir.path(), "b.py", "def b(): pass\n");
        write(temp_dir.path(), "notes.txt", "def not_python(): pass\n");

        let out = run(temp_dir.path());
        assert_eq!(out.data, "CLS A:\n\nFUNC b():\n");
        assert_eq!(out.result.items_found, 2);
        assert_eq!(out.result.files_contributed(), 2);
    }

    #[test]
    fn test_nested_structure() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "app.py", "class App: pass\n");
        write(temp_dir.path(), "src/lib.py", "def lib_func(): pass\n");
        write(temp_dir.path(), "src/utils/helpers.py", "CONST: int = 1\n");

        let out = run(temp_dir.path());
        assert!(out.data.contains("CLS App:"));
        assert!(out.data.contains("FUNC lib_func():"));
        assert!(out.data.contains("VAR CONST: int"));
        assert!(out.status.contains("Found 3 items"));
    }

    #[test]
    fn test_ignored_dirs_are_pruned_at_any_depth() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "main.py", "def main(): pass\n");
        write(temp_dir.path(), "node_modules/ignored.py", "def should_not_see_this(): pass\n");
        write(temp_dir.path(), ".git/config.py", "def git_config(): pass\n");
        write(temp_dir.path(), "pkg/sub/__pycache__/cached.py", "def cached(): pass\n");
        write(temp_dir.path(), "pkg/sub/venv/lib.py", "def vendored(): pass\n");

        let out = run(temp_dir.path());
        assert_eq!(out.data, "FUNC main():\n");
        assert!(out.status.contains("Found 1 items"));
    }

    #[test]
    fn test_broken_ignored_file_is_never_read() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "ok.py", "def ok(): pass\n");
        write(temp_dir.path(), "build/broken.py", "def broken(:\n");

        let out = run(temp_dir.path());
        assert!(!out.status.contains("broken.py"));
        assert_eq!(out.result.items_found, 1);
    }

    #[test]
    fn test_syntax_error_fault_tolerance() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "good.py", "def good(): pass\n");
        write(temp_dir.path(), "bad.py", "def bad( THIS IS SYNTAX ERROR");

        let out = run(temp_dir.path());
        assert_eq!(out.data, "FUNC good():\n");
        assert!(out.status.contains("Dude, stop! This file is trash."));
        assert!(out.status.contains("bad.py"));
        assert!(out.status.contains("invalid syntax"));
        assert!(out.status.contains("Found 1 items"));
    }

    #[test]
    fn test_deeply_nested_file_does_not_abort_run() {
        let temp_dir = TempDir::new().unwrap();
        let depth = 50_000;
        let deep = format!(
            "def ok(): pass\nx = {}1{}\n",
            "(".repeat(depth),
            ")".repeat(depth)
        );
        write(temp_dir.path(), "deep.py", &deep);
        write(temp_dir.path(), "zz.py", "def fine(): pass\n");

        let out = run(temp_dir.path());
        assert_eq!(out.data, "FUNC fine():\n");
        assert!(out.status.contains("deep.py: too many nested parentheses (line 2)"));
        assert!(out.status.contains("Found 1 items"));
    }

    #[test]
    fn test_print_shift_is_not_python2() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "b.py", "def g(): pass\nprint >> sys.stderr\n");

        let out = run(temp_dir.path());
        assert_eq!(out.data, "FUNC g():\n");
        assert!(!out.status.contains("Missing parentheses"));
    }

    #[test]
    fn test_unreadable_file_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("latin1.py"), [0x23u8, 0xe9, 0x0a]).unwrap();
        write(temp_dir.path(), "ok.py", "def ok(): pass\n");

        let out = run(temp_dir.path());
        assert!(out.status.contains("latin1.py: Failed to read file"));
        assert_eq!(out.data, "FUNC ok():\n");
    }

    #[test]
    fn test_empty_files_contribute_nothing() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "a.py", "def a(): pass\n");
        write(temp_dir.path(), "b.py", "import os\nx = 1\n");
        write(temp_dir.path(), "c.py", "def c(): pass\n");

        let out = run(temp_dir.path());
        assert_eq!(out.data, "FUNC a():\n\nFUNC c():\n");
    }

    #[test]
    fn test_no_output_still_reports_zero() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "empty.py", "");

        let out = run(temp_dir.path());
        assert!(out.data.is_empty());
        assert!(out.result.is_empty());
        assert!(out.status.contains("Found 0 items"));
    }

    #[test]
    fn test_missing_path_reports_and_finishes() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");

        let out = run(&missing);
        assert!(out.data.is_empty());
        assert!(out.status.contains("nope"));
        assert!(out.status.contains("Found 0 items"));
    }

    #[test]
    fn test_user_exclusions() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "app.py", "def app(): pass\n");
        write(temp_dir.path(), "tests/test_app.py", "def test_app(): pass\n");
        write(temp_dir.path(), "gen/models.py", "class Model: pass\n");

        let exclusions = Exclusions::new(&ExclusionConfig {
            patterns: vec!["tests/**".to_string()],
            extra_dirs: vec!["gen".to_string()],
        });
        let out = run_with(temp_dir.path(), &PythonParser::new(), &exclusions);
        assert_eq!(out.data, "FUNC app():\n");
    }

    #[test]
    fn test_discovery_order_is_sorted() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "b.py", "");
        write(temp_dir.path(), "a/z.py", "");
        write(temp_dir.path(), "a.py", "");

        let mut reporter = Reporter::new(Vec::new(), false);
        let files = collect_files(
            temp_dir.path(),
            &PythonParser::new(),
            &Exclusions::default(),
            &mut reporter,
        )
        .unwrap();
        let relative: Vec<_> = files
            .iter()
            .map(|f| f.strip_prefix(temp_dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            relative,
            vec![PathBuf::from("a/z.py"), PathBuf::from("a.py"), PathBuf::from("b.py")]
        );
    }

    /// Frontend that declares one function per file, named after the file stem
    struct StemParser;

    impl LanguageParser for StemParser {
        fn language_name(&self) -> &'static str {
            "stem"
        }

        fn file_extensions(&self) -> &[&'static str] {
            &["stem"]
        }

        fn parse_module(&self, source: &str, file_path: &Path) -> Result<Module, ParseError> {
            if source.contains("boom") {
                return Err(ParseError::Syntax { line: 1, column: 1 });
            }
            let name = file_path.file_stem().unwrap().to_string_lossy().to_string();
            Ok(Module {
                body: vec![Statement::Function(FunctionDecl {
                    name,
                    is_async: false,
                    params: ParameterList::default(),
                    return_type: None,
                    docstring: None,
                    body: Vec::new(),
                })],
            })
        }
    }

    #[test]
    fn test_custom_frontend() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "one.stem", "");
        write(temp_dir.path(), "two.stem", "boom");
        write(temp_dir.path(), "three.py", "");

        let out = run_with(temp_dir.path(), &StemParser, &Exclusions::default());
        assert_eq!(out.data, "FUNC one():\n");
        assert!(out.status.contains("two.stem: invalid syntax (line 1, column 1)"));
    }
}
