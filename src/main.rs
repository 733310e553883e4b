//! fortindent - Indentation conformance checker for free-form Fortran

#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use fortindent::logging::init_tracing;
use fortindent::process::{autofix, check_file, FileFilter, ScanReport, Severity};
use fortindent::{parse_args, CliArgs, Config, Result};
use rayon::prelude::*;
use tracing::{debug, warn};

fn main() -> ExitCode {
    let args = parse_args();
    init_tracing(args.debug);

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Check every input file; returns whether all of them passed
fn run(args: &CliArgs) -> Result<bool> {
    let config = build_config(args)?;

    // Configure thread pool if --jobs specified
    if let Some(jobs) = args.jobs.filter(|&jobs| jobs > 0) {
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
        {
            warn!(error = %e, "failed to configure thread pool");
        }
    }

    let filter = FileFilter::from_config(&config, args.recursive);
    let files = filter.collect(&args.inputs);
    if files.is_empty() {
        if !args.silent {
            eprintln!("No Fortran files found to check.");
        }
        return Ok(true);
    }

    // Scan in parallel, then report in input order
    let limits = config.limits();
    let results: Vec<(&PathBuf, Result<ScanReport>)> = files
        .par_iter()
        .map(|path| (path, check_file(path, &limits)))
        .collect();

    let mut all_passed = true;
    for (path, result) in results {
        match result {
            Ok(report) => {
                if !report_file(path, &report, &config, args.silent) {
                    all_passed = false;
                }
            }
            Err(e) => {
                all_passed = false;
                warn!(path = %path.display(), error = %e, "failed to check file");
                eprintln!("Error checking {}: {e:#}", path.display());
            }
        }
    }

    Ok(all_passed)
}

/// Build configuration from CLI args and config files
///
/// An explicit `--config` file replaces auto-discovery, which searches the
/// home directory and every ancestor of the working directory.
fn build_config(args: &CliArgs) -> Result<Config> {
    let mut config = if let Some(config_path) = &args.config {
        debug!(path = %config_path.display(), "using explicit config file");
        Config::from_toml_file(config_path)?
    } else {
        let cwd = std::env::current_dir().unwrap_or_default();
        let discovered = Config::discover_config_files(&cwd);
        if discovered.is_empty() {
            debug!("no config files discovered");
        }
        for file in &discovered {
            debug!(path = %file.display(), "discovered config file");
        }
        Config::from_discovered_files(&cwd)
    };

    // Override with CLI arguments
    if let Some(line_length) = args.line_length {
        config.line_length = line_length;
    }
    if let Some(tolerance) = args.tolerance {
        config.tolerance = tolerance;
    }
    if args.autofix {
        config.autofix = true;
    }
    config.exclude.extend(args.exclude.iter().cloned());
    config.exclude_dirs.extend(args.exclude_dirs.iter().cloned());
    for ext in &args.fortran_extensions {
        let ext = ext.strip_prefix('.').unwrap_or(ext);
        if !config.extensions.iter().any(|known| known == ext) {
            config.extensions.push(ext.to_string());
        }
    }

    debug!(?config, "resolved configuration");

    // Validate configuration
    if let Some(error) = config.validate() {
        anyhow::bail!("Invalid configuration: {error}");
    }

    Ok(config)
}

/// Print the diagnostics and verdict of one file and apply autofix
///
/// Returns whether the file passed.
fn report_file(path: &Path, report: &ScanReport, config: &Config, silent: bool) -> bool {
    let source = path.display().to_string();
    let threshold = if silent {
        Severity::Recoverable
    } else {
        Severity::Advisory
    };
    for diag in report.diagnostics_at(threshold) {
        println!("{}", diag.render(&source));
    }

    if report.passed {
        if !silent {
            println!("{source} passed indentation check.");
        }
        return true;
    }

    println!("{source} failed indentation check.");
    if config.autofix {
        match (report.rewrite_text(), &report.fatal) {
            (Some(text), _) => {
                println!("Fixing file {source}");
                if let Err(e) = autofix(path, &text) {
                    warn!(path = %source, error = %e, "autofix failed");
                    eprintln!("Error fixing {source}: {e:#}");
                }
            }
            (None, Some(err)) => {
                warn!(path = %source, line = err.line(), "not fixing file after fatal scan error");
            }
            (None, None) => {}
        }
    }
    false
}
