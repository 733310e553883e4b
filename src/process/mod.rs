//! File processing and the indentation scan.
//!
//! This module ties the line machinery together:
//!
//! - [`pipeline`]: the single forward pass over one file ([`Scanner`], [`scan`])
//! - [`report`]: diagnostics, severities, line length policy and rewrite rendering
//! - [`files`]: file discovery, per-file checking and atomic autofix
//!
//! The main entry point is [`scan`], which consumes raw lines and returns a
//! [`ScanReport`] holding the verdict, the diagnostics and the canonical rewrite.

pub mod files;
pub mod pipeline;
pub mod report;

pub use files::{autofix, check_file, FileFilter};
pub use pipeline::{scan, scan_reader, scan_str, ScanReport, Scanner};
pub use report::{
    render_rewrite, Diagnostic, DiagnosticKind, LineEnding, LineLimits, Severity,
};
