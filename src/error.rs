//! Error types and result aliases for fortindent.
//!
//! This module defines the error handling infrastructure:
//! - [`Result<T>`]: Type alias for `anyhow::Result<T>` used throughout the crate
//! - [`ScanError`]: Conditions that abort the scan of a single file

use anyhow::Result as AnyhowResult;
use thiserror::Error;

pub type Result<T> = AnyhowResult<T>;

/// Fatal per-file scan conditions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    /// A quoted literal was left open without a continuation to carry it
    #[error("unbalanced quotes at line {line}")]
    UnbalancedQuotes { line: usize },
}

impl ScanError {
    /// Line on which the scan was aborted
    #[must_use]
    pub fn line(&self) -> usize {
        match self {
            ScanError::UnbalancedQuotes { line } => *line,
        }
    }
}
