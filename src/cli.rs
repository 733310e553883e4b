//! Command-line interface for fortindent.
//!
//! Flags mirror the `fortindent.toml` keys; anything given here wins over the files.

use std::path::PathBuf;

use clap::{Arg, ArgAction, Command};

/// Parsed command line; `None`/empty means "use the config value"
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Files or directories to check
    pub inputs: Vec<PathBuf>,

    /// Maximum line length
    pub line_length: Option<usize>,

    /// Advisory band past the line length, as a fraction of it
    pub tolerance: Option<f64>,

    /// Rewrite failing files with canonical indentation
    pub autofix: bool,

    /// Config file path
    pub config: Option<PathBuf>,

    /// Descend into subdirectories
    pub recursive: bool,

    /// Silent mode (only failures are reported)
    pub silent: bool,

    /// Worker threads for scanning files (0 = one per core)
    pub jobs: Option<usize>,

    /// Exclude patterns for files (glob patterns)
    pub exclude: Vec<String>,

    /// Directory names skipped during traversal
    pub exclude_dirs: Vec<String>,

    /// Extra file extensions scanned besides the configured ones
    pub fortran_extensions: Vec<String>,

    /// Enable debug output
    pub debug: bool,
}

/// Argument definitions for the `fortindent` binary
#[must_use]
pub fn build_cli() -> Command {
    Command::new("fortindent")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Indentation conformance checker for free-form Fortran")
        .arg(
            Arg::new("inputs")
                .help("Files or directories to check")
                .value_name("PATH")
                .num_args(1..)
                .required(false)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("line-length")
                .short('l')
                .long("line-length")
                .help("Maximum line length [default: 80]")
                .value_name("NUM")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("tolerance")
                .short('t')
                .long("tolerance")
                .help("Fraction of the line length tolerated past it as advisory only [default: 0.1]")
                .value_name("FRACTION")
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            Arg::new("autofix")
                .long("autofix")
                .help("Automatically fixes encountered indentation errors")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Read settings from this file instead of discovering fortindent.toml")
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("recursive")
                .short('r')
                .long("recursive")
                .help("Recursively check directories")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("exclude")
                .short('e')
                .long("exclude")
                .help("Exclude files matching pattern (glob syntax, can be repeated)")
                .value_name("PATTERN")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("exclude-dir")
                .short('x')
                .long("exclude-dir")
                .help("Skip directories with this name when recursing (can be repeated)")
                .value_name("NAME")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("fortran")
                .short('f')
                .long("fortran")
                .help("Also check files with this extension (can be repeated)")
                .value_name("EXT")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("debug")
                .short('D')
                .long("debug")
                .help("Enable debug output (shows config, block changes, discovered files)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("silent")
                .short('S')
                .long("silent")
                .help("Silent mode (only failing files are reported)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("jobs")
                .short('j')
                .long("jobs")
                .help("Number of files checked in parallel (0 = one per core)")
                .value_name("NUM")
                .value_parser(clap::value_parser!(usize)),
        )
}

/// Parse the process arguments, exiting on usage errors
#[must_use]
pub fn parse_args() -> CliArgs {
    args_from_matches(&build_cli().get_matches())
}

/// Parse an explicit argument list
#[must_use]
pub fn parse_args_from<I, T>(args: I) -> CliArgs
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    args_from_matches(&build_cli().get_matches_from(args))
}

fn strings(matches: &clap::ArgMatches, id: &str) -> Vec<String> {
    matches
        .get_many::<String>(id)
        .map(|vals| vals.cloned().collect())
        .unwrap_or_default()
}

/// Copy matched values into [`CliArgs`]
fn args_from_matches(matches: &clap::ArgMatches) -> CliArgs {
    CliArgs {
        inputs: matches
            .get_many::<PathBuf>("inputs")
            .map(|vals| vals.cloned().collect())
            .unwrap_or_default(),
        line_length: matches.get_one::<usize>("line-length").copied(),
        tolerance: matches.get_one::<f64>("tolerance").copied(),
        autofix: matches.get_flag("autofix"),
        config: matches.get_one::<PathBuf>("config").cloned(),
        recursive: matches.get_flag("recursive"),
        exclude: strings(matches, "exclude"),
        exclude_dirs: strings(matches, "exclude-dir"),
        fortran_extensions: strings(matches, "fortran"),
        debug: matches.get_flag("debug"),
        silent: matches.get_flag("silent"),
        jobs: matches.get_one::<usize>("jobs").copied(),
    }
}
