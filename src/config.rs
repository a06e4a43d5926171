//! @dose
//! purpose: Configuration file parsing for rigby.toml. Lets a project prune extra
//!     directories and skip files by glob on top of the built-in ignore set.
//!
//! when-editing:
//!     - !Config is loaded once at startup and passed through the call chain
//!     - An explicit --config path must load; the implicit ./rigby.toml only warns
//!
//! invariants:
//!     - Config::discover returns the default config if rigby.toml doesn't exist
//!     - CLI --exclude patterns are appended after the config's own patterns
//!
//! gotchas:
//!     - Patterns are matched against paths relative to the scanned directory, not the cwd

use crate::exclusion::ExclusionConfig;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the implicit config file
pub const CONFIG_FILE_NAME: &str = "rigby.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Main configuration structure matching rigby.toml
#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Glob patterns (relative to the scan root) to skip
    pub exclude: Vec<String>,

    /// Extra directory names to prune, on top of the built-in set
    pub ignore_dirs: Vec<String>,
}

impl Config {
    /// Load configuration from an explicit file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load rigby.toml from `dir` if present, falling back to defaults with a warning
    pub fn discover(dir: &Path) -> Self {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            return Self::default();
        }

        match Self::load(&config_path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Warning: {}", e);
                Self::default()
            }
        }
    }

    /// Merge config settings with patterns given on the command line
    pub fn exclusion_config(&self, cli_patterns: &[String]) -> ExclusionConfig {
        let mut patterns = self.exclude.clone();
        patterns.extend(cli_patterns.iter().cloned());
        ExclusionConfig {
            patterns,
            extra_dirs: self.ignore_dirs.clone(),
        }
    }
}
