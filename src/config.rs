//! Configuration management for fortindent.
//!
//! [`Config`] holds the line length policy, autofix and file selection settings.
//! Command-line flags are applied over whatever the files set.
//!
//! Without `--config`, every `fortindent.toml` from the user's home directory
//! and from the ancestors of the working directory is merged, closest last.

use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::process::LineLimits;

/// Name of the config file looked up in each directory
const CONFIG_FILE_NAME: &str = "fortindent.toml";

/// User's home directory from `HOME`, or `USERPROFILE` on Windows
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}

// Serde default functions
fn default_line_length() -> usize {
    80
}
fn default_tolerance() -> f64 {
    0.1
}
fn default_extensions() -> Vec<String> {
    vec!["f90".to_string(), "F90".to_string()]
}

/// Main configuration struct for fortindent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Maximum line length (default: 80)
    #[serde(default = "default_line_length")]
    pub line_length: usize,

    /// Fraction of `line_length` past the limit that is only advisory (default: 0.1)
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Rewrite failing files in place (default: false)
    #[serde(default)]
    pub autofix: bool,

    /// File extensions that are scanned, without leading dot (default: f90, F90)
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Glob patterns of files to skip
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Directory names skipped during traversal
    #[serde(default)]
    pub exclude_dirs: Vec<String>,
}

/// One config file as written
///
/// Unset scalars stay `None` so a closer file only overrides what it names.
#[derive(Debug, Clone, Default, Deserialize)]
struct PartialConfig {
    pub line_length: Option<usize>,
    pub tolerance: Option<f64>,
    pub autofix: Option<bool>,
    pub extensions: Option<Vec<String>>,
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub exclude_dirs: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            line_length: default_line_length(),
            tolerance: default_tolerance(),
            autofix: false,
            extensions: default_extensions(),
            exclude: Vec::new(),
            exclude_dirs: Vec::new(),
        }
    }
}

impl Config {
    /// Accepted `line_length` values
    const LINE_LENGTH_RANGE: RangeInclusive<usize> = 20..=1000;

    /// Check that the settings describe a usable policy
    ///
    /// Returns the first problem found.
    #[must_use]
    pub fn validate(&self) -> Option<String> {
        if !Self::LINE_LENGTH_RANGE.contains(&self.line_length) {
            return Some(format!(
                "line_length {} must be between {} and {}",
                self.line_length,
                Self::LINE_LENGTH_RANGE.start(),
                Self::LINE_LENGTH_RANGE.end()
            ));
        }
        if !(0.0..=1.0).contains(&self.tolerance) {
            return Some(format!(
                "tolerance {} must be between 0.0 and 1.0",
                self.tolerance
            ));
        }
        if self.extensions.is_empty() {
            return Some("extensions must list at least one extension".to_string());
        }
        None
    }

    /// Line length policy handed to the scanner
    #[must_use]
    pub fn limits(&self) -> LineLimits {
        LineLimits::new(self.line_length, self.tolerance)
    }

    /// Read one TOML file over the defaults
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let partial: PartialConfig = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        let mut config = Self::default();
        config.apply_partial(&partial);
        Ok(config)
    }

    /// Overlay the values a file sets; exclusion lists accumulate
    fn apply_partial(&mut self, partial: &PartialConfig) {
        if let Some(v) = partial.line_length {
            self.line_length = v;
        }
        if let Some(v) = partial.tolerance {
            self.tolerance = v;
        }
        if let Some(v) = partial.autofix {
            self.autofix = v;
        }
        if let Some(v) = &partial.extensions {
            self.extensions.clone_from(v);
        }
        // Merge lists (closer files add to what outer files excluded)
        for pattern in &partial.exclude {
            if !self.exclude.contains(pattern) {
                self.exclude.push(pattern.clone());
            }
        }
        for dir in &partial.exclude_dirs {
            if !self.exclude_dirs.contains(dir) {
                self.exclude_dirs.push(dir.clone());
            }
        }
    }

    /// Config files that apply to `dir`, least specific first
    ///
    /// The home directory file comes first, then one file per ancestor of
    /// `dir` from the filesystem root down to `dir` itself.
    #[must_use]
    pub fn discover_config_files(dir: &Path) -> Vec<PathBuf> {
        let mut found: Vec<PathBuf> = home_dir()
            .map(|home| home.join(CONFIG_FILE_NAME))
            .filter(|path| path.is_file())
            .into_iter()
            .collect();

        let mut ancestors: Vec<&Path> = dir.ancestors().collect();
        ancestors.reverse();
        for candidate in ancestors.into_iter().map(|a| a.join(CONFIG_FILE_NAME)) {
            if candidate.is_file() && !found.contains(&candidate) {
                found.push(candidate);
            }
        }
        found
    }

    /// Merge every config file that applies to `dir` over the defaults
    ///
    /// Closer files win for the values they set. Unreadable or malformed
    /// files are skipped with a warning.
    #[must_use]
    pub fn from_discovered_files(dir: &Path) -> Self {
        let mut config = Self::default();
        for path in &Self::discover_config_files(dir) {
            match std::fs::read_to_string(path) {
                Ok(contents) => match toml::from_str::<PartialConfig>(&contents) {
                    Ok(partial) => config.apply_partial(&partial),
                    Err(e) => warn!(path = %path.display(), error = %e, "failed to parse config file"),
                },
                Err(e) => warn!(path = %path.display(), error = %e, "failed to read config file"),
            }
        }
        config
    }
}
