//! @dose
//! purpose: Decides which directories the scan never descends into and which files it
//!     skips. A fixed set of build/VCS/dependency/cache directory names is always pruned;
//!     rigby.toml and --exclude can add more names and glob patterns.
//!
//! when-editing:
//!     - !Pruning happens in WalkDir::filter_entry, so a pruned directory is never listed
//!     - Glob patterns are matched against paths relative to the scan root
//!
//! invariants:
//!     - The default ignore set is always applied, at any depth of the tree
//!     - The scan root itself is never pruned, whatever its name
//!
//! gotchas:
//!     - Only base names are compared against the ignore set; "src/build" is pruned,
//!       a file called "build.py" is not

use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::HashSet;
use std::path::Path;

/// Directory names that are never descended into
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    "__pycache__",
    "venv",
    ".idea",
    ".vscode",
    "build",
    "dist",
    "env",
    ".venv",
    "site-packages",
    ".mypy_cache",
    ".ruff_cache",
];

/// User-supplied exclusion settings (from rigby.toml and --exclude flags)
#[derive(Debug, Clone, Default)]
pub struct ExclusionConfig {
    /// Glob patterns to exclude, relative to the scan root
    pub patterns: Vec<String>,
    /// Additional directory base names to prune
    pub extra_dirs: Vec<String>,
}

/// Compiled exclusion rules
pub struct Exclusions {
    extra_dirs: HashSet<String>,
    globs: Option<GlobSet>,
}

impl Exclusions {
    pub fn new(config: &ExclusionConfig) -> Self {
        Self {
            extra_dirs: config.extra_dirs.iter().cloned().collect(),
            globs: build_exclude_globset(&config.patterns),
        }
    }

    /// Check if a directory base name is pruned
    pub fn is_excluded_dir_name(&self, name: &str) -> bool {
        is_default_excluded_dir(name) || self.extra_dirs.contains(name)
    }

    /// Check if a path (relative to the scan root) matches an exclude pattern
    pub fn matches_pattern(&self, relative: &Path) -> bool {
        self.globs
            .as_ref()
            .map(|set| set.is_match(relative))
            .unwrap_or(false)
    }

    /// Decide whether a walk entry should be skipped. Directories are pruned by name or
    /// pattern; files only by pattern.
    pub fn skips(&self, path: &Path, is_dir: bool, root: &Path) -> bool {
        let Ok(relative) = path.strip_prefix(root) else {
            return false;
        };
        if relative.as_os_str().is_empty() {
            return false;
        }

        if is_dir {
            let pruned_by_name = path
                .file_name()
                .map(|name| self.is_excluded_dir_name(&name.to_string_lossy()))
                .unwrap_or(false);
            if pruned_by_name {
                return true;
            }
        }

        self.matches_pattern(relative)
    }
}

impl Default for Exclusions {
    fn default() -> Self {
        Self::new(&ExclusionConfig::default())
    }
}

/// Build a GlobSet from patterns for additional filtering
pub fn build_exclude_globset(patterns: &[String]) -> Option<GlobSet> {
    if patterns.is_empty() {
        return None;
    }

    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        match Glob::new(pattern) {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(e) => {
                eprintln!("Warning: invalid exclude pattern '{}': {}", pattern, e);
            }
        }
    }

    builder.build().ok()
}

/// Check if a directory name is in the fixed ignore set
pub fn is_default_excluded_dir(name: &str) -> bool {
    DEFAULT_EXCLUDED_DIRS.contains(&name)
}
