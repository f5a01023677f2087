use anyhow::{Context, Result};
use clap::Parser;
use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;
use tracing::debug;

use class2config::config::{import_classes_from_config_file, CallPlanner, IniFormat};
use class2config::registry::SourceRegistry;
use class2config::settings::Settings;

/// Reads a config file written by class2config and prints the constructor call of each section
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file to import
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Settings file (TOML); defaults to ./class2config.toml when present
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory searched for Python modules (repeatable)
    #[arg(short = 'p', long = "path", value_name = "DIR")]
    search_paths: Vec<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    initialize_logging(args.debug);

    let mut settings = Settings::discover(args.config.as_deref()).context("Failed to load settings")?;
    settings.apply_overrides(&args.search_paths, None, None);
    debug!("Search paths: {:?}", settings.effective_search_paths());

    let registry = SourceRegistry::new(settings.effective_search_paths());
    let calls = import_classes_from_config_file(&registry, &args.input, &IniFormat, &mut CallPlanner)
        .with_context(|| format!("Failed to import {}", args.input.display()))?;

    // Sorted so the output is stable
    let calls: BTreeMap<_, _> = calls.into_iter().collect();
    println!("{}", serde_json::to_string_pretty(&calls)?);

    Ok(())
}

fn initialize_logging(debug: bool) {
    let level = if debug { "debug" } else { "warn" };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}
