//! fortindent - Indentation conformance checker for free-form Fortran
//!
//! Infers the expected indentation of every line in one forward pass over
//! block keywords, continuation lines, brackets and quoted strings, and can
//! rewrite files to that canonical indentation.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod parser;
pub mod process;
pub mod scope;

// Re-export commonly used types
pub use cli::{build_cli, parse_args, parse_args_from, CliArgs};
pub use config::Config;
pub use error::{Result, ScanError};
pub use process::{scan, scan_str, LineLimits, ScanReport, Scanner};
