//! File discovery, per-file checking and autofix

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use glob::Pattern;
use tempfile::NamedTempFile;
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::pipeline::{scan_str, ScanReport};
use super::report::LineLimits;
use crate::config::Config;
use crate::Result;

/// Default maximum file size in bytes (100 MB)
/// Files larger than this are rejected to prevent memory exhaustion
const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Decides which paths are scanned
#[derive(Debug, Clone)]
pub struct FileFilter {
    extensions: Vec<String>,
    exclude: Vec<Pattern>,
    exclude_dirs: Vec<String>,
    recursive: bool,
}

impl FileFilter {
    /// Build a filter; invalid glob patterns are skipped with a warning
    #[must_use]
    pub fn new(
        extensions: &[String],
        exclude: &[String],
        exclude_dirs: &[String],
        recursive: bool,
    ) -> Self {
        let exclude = exclude
            .iter()
            .filter_map(|p| match Pattern::new(p) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    warn!(pattern = %p, error = %e, "ignoring invalid exclude pattern");
                    None
                }
            })
            .collect();
        Self {
            extensions: extensions
                .iter()
                .map(|ext| ext.strip_prefix('.').unwrap_or(ext).to_string())
                .collect(),
            exclude,
            exclude_dirs: exclude_dirs.to_vec(),
            recursive,
        }
    }

    #[must_use]
    pub fn from_config(config: &Config, recursive: bool) -> Self {
        Self::new(
            &config.extensions,
            &config.exclude,
            &config.exclude_dirs,
            recursive,
        )
    }

    /// Check if a file has one of the scanned extensions (case-sensitive)
    #[must_use]
    pub fn is_source_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|known| known == ext))
    }

    /// Check if a path matches any exclusion pattern
    #[must_use]
    pub fn is_excluded(&self, path: &Path) -> bool {
        if self.exclude.is_empty() {
            return false;
        }

        let path_str = path.to_string_lossy();
        self.exclude.iter().any(|pattern| {
            // Match against full path, then file name only
            pattern.matches(&path_str)
                || path
                    .file_name()
                    .is_some_and(|name| pattern.matches(&name.to_string_lossy()))
        })
    }

    fn is_excluded_dir(&self, name: &str) -> bool {
        self.exclude_dirs.iter().any(|dir| dir == name)
    }

    fn accepts(&self, path: &Path) -> bool {
        self.is_source_file(path) && !self.is_excluded(path)
    }

    /// Collect all files to check, handling directories and the recursive flag
    ///
    /// Explicit files with an unrecognised extension are skipped. Output
    /// keeps argument order; directory entries are sorted by name.
    #[must_use]
    pub fn collect(&self, inputs: &[PathBuf]) -> Vec<PathBuf> {
        let mut files = Vec::new();

        for input in inputs {
            if input.is_file() {
                if self.accepts(input) {
                    files.push(input.clone());
                } else {
                    debug!(path = %input.display(), "skipping non-Fortran or excluded file");
                }
            } else if input.is_dir() {
                if self.recursive {
                    // max_depth prevents runaway traversal in pathological directory structures.
                    let walker = WalkDir::new(input)
                        .follow_links(true)
                        .max_depth(256)
                        .sort_by_file_name()
                        .into_iter()
                        .filter_entry(|entry| {
                            entry.depth() == 0
                                || !entry.file_type().is_dir()
                                || !self.is_excluded_dir(&entry.file_name().to_string_lossy())
                        });
                    for entry in walker.filter_map(std::result::Result::ok) {
                        let path = entry.path();
                        if entry.file_type().is_file() && self.accepts(path) {
                            files.push(path.to_path_buf());
                        }
                    }
                } else {
                    // Non-recursive: only direct children
                    match std::fs::read_dir(input) {
                        Ok(entries) => {
                            let mut children: Vec<PathBuf> = entries
                                .filter_map(std::result::Result::ok)
                                .map(|entry| entry.path())
                                .filter(|path| path.is_file() && self.accepts(path))
                                .collect();
                            children.sort();
                            files.extend(children);
                        }
                        Err(e) => {
                            warn!(path = %input.display(), error = %e, "failed to read directory");
                        }
                    }
                }
            } else {
                warn!(path = %input.display(), "no such file or directory");
            }
        }

        debug!(count = files.len(), "collected files");
        files
    }
}

/// Read and scan one file
pub fn check_file(path: &Path, limits: &LineLimits) -> Result<ScanReport> {
    // Check file size BEFORE reading to prevent memory exhaustion
    let metadata =
        std::fs::metadata(path).with_context(|| format!("failed to stat {}", path.display()))?;
    if metadata.len() > DEFAULT_MAX_FILE_SIZE {
        anyhow::bail!(
            "{} ({} MB) exceeds limit of {} MB",
            path.display(),
            metadata.len() / (1024 * 1024),
            DEFAULT_MAX_FILE_SIZE / (1024 * 1024)
        );
    }

    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let report = scan_str(&source, limits);
    debug!(
        path = %path.display(),
        passed = report.passed,
        diagnostics = report.diagnostics.len(),
        "checked file"
    );
    Ok(report)
}

/// Replace `path` with `contents` atomically, keeping its permissions
///
/// The text goes to a temporary file in the same directory, which is then
/// renamed over the original.
pub fn autofix(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create temporary file in {}", dir.display()))?;
    tmp.write_all(contents.as_bytes())
        .with_context(|| format!("failed to write rewrite of {}", path.display()))?;
    tmp.as_file().sync_all()?;

    if let Ok(metadata) = std::fs::metadata(path) {
        tmp.as_file()
            .set_permissions(metadata.permissions())
            .with_context(|| format!("failed to copy permissions of {}", path.display()))?;
    }

    tmp.persist(path)
        .with_context(|| format!("failed to replace {}", path.display()))?;
    debug!(path = %path.display(), "rewrote file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(exclude: &[&str]) -> FileFilter {
        let exclude: Vec<String> = exclude.iter().map(ToString::to_string).collect();
        FileFilter::new(&Config::default().extensions, &exclude, &[], false)
    }

    #[test]
    fn test_is_source_file() {
        let filter = filter(&[]);
        assert!(filter.is_source_file(Path::new("src/solver.f90")));
        assert!(filter.is_source_file(Path::new("src/solver.F90")));
        assert!(!filter.is_source_file(Path::new("src/legacy.f")));
        assert!(!filter.is_source_file(Path::new("README.md")));
        assert!(!filter.is_source_file(Path::new("Makefile")));
    }

    #[test]
    fn test_custom_extension_with_dot() {
        let filter = FileFilter::new(&[".f03".to_string()], &[], &[], false);
        assert!(filter.is_source_file(Path::new("a.f03")));
        assert!(!filter.is_source_file(Path::new("a.f90")));
    }

    #[test]
    fn test_is_excluded() {
        let filter = filter(&["*_gen.f90", "vendor/*"]);
        assert!(filter.is_excluded(Path::new("src/table_gen.f90")));
        assert!(filter.is_excluded(Path::new("vendor/blas.f90")));
        assert!(!filter.is_excluded(Path::new("src/table.f90")));
    }

    #[test]
    fn test_invalid_pattern_is_skipped() {
        let filter = filter(&["[unclosed"]);
        assert!(!filter.is_excluded(Path::new("a.f90")));
    }
}
