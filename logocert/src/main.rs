//! # Logo Certification Configuration Check
//!
//! Loads a certification configuration, reports likely misconfiguration
//! and prints the effective test run order.
//!
//! # Usage
//!
//! ```bash
//! # Check the file next to the suite
//! logocert --config logocert.toml
//!
//! # Check ./logocert.toml, or the built-in defaults without it
//! logocert
//!
//! # Fail when any warning is reported
//! logocert --config logocert.toml --strict
//!
//! # Print the normalized configuration
//! logocert --config logocert.toml --dump toml
//! ```

#![deny(warnings)]

use clap::{Parser, ValueEnum};
use logocert_common::consts::DEFAULT_CONFIG_PATH;
use logocert_common::prelude::*;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn, Level};
use tracing_subscriber::EnvFilter;

/// Load, validate and inspect a logo certification configuration
#[derive(Parser, Debug)]
#[command(name = "logocert")]
#[command(version)]
#[command(about = "Load, validate and inspect a logo certification configuration")]
#[command(long_about = None)]
struct Args {
    /// Configuration file. Defaults to ./logocert.toml, then to the
    /// built-in defaults.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the normalized configuration in the given format
    #[arg(long, value_enum, value_name = "FORMAT")]
    dump: Option<DumpFormat>,

    /// Exit with an error when validation reports warnings
    #[arg(long)]
    strict: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DumpFormat {
    Toml,
    Json,
}

fn main() -> ExitCode {
    let args = Args::parse();
    setup_tracing(&args);

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("configuration check failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns `false` when strict mode rejects the configuration.
fn run(args: &Args) -> Result<bool, Box<dyn std::error::Error>> {
    info!("logocert v{} starting...", env!("CARGO_PKG_VERSION"));

    let registry = match &args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            ConfigRegistry::from_path(path)?
        }
        None if Path::new(DEFAULT_CONFIG_PATH).is_file() => {
            info!("Loading configuration from {}", DEFAULT_CONFIG_PATH);
            ConfigRegistry::from_path(Path::new(DEFAULT_CONFIG_PATH))?
        }
        None => {
            info!("No configuration file found, using built-in defaults");
            ConfigRegistry::embedded()?
        }
    };

    let warnings = registry.validate();
    for w in &warnings {
        warn!("{w}");
    }

    match args.dump {
        Some(DumpFormat::Toml) => print!("{}", registry.to_toml_string()?),
        Some(DumpFormat::Json) => {
            println!("{}", serde_json::to_string_pretty(&registry.to_source()?)?)
        }
        None => print_run_order(&registry),
    }

    if args.strict && !warnings.is_empty() {
        error!("{} warning(s) reported in strict mode", warnings.len());
        return Ok(false);
    }
    Ok(true)
}

fn print_run_order(registry: &ConfigRegistry) {
    for (idx, test) in registry.effective_test_order().iter().enumerate() {
        println!("{:>2}. {test}", idx + 1);
    }
    for test in registry.skipped_tests() {
        println!("  - {test} (skipped)");
    }
}

/// Setup tracing subscriber based on CLI arguments.
fn setup_tracing(args: &Args) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    // Logs go to stderr so --dump output stays clean.
    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }
}
