use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{debug, info};

use class2config::cli::ClassSpec;
use class2config::config::{export_into, ConfigContainer, ConfigFormat, IniFormat};
use class2config::registry::SourceRegistry;
use class2config::settings::Settings;

/// Finds the given class(es) and writes a config file with their constructor parameters
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Class tokens: `[module:]class[:instance]`, e.g. `shapes:ZCylinder:First`
    #[arg(value_name = "TOKEN", required = true)]
    classes: Vec<String>,

    /// Output file path (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Settings file (TOML); defaults to ./class2config.toml when present
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory searched for Python modules (repeatable)
    #[arg(short = 'p', long = "path", value_name = "DIR")]
    search_paths: Vec<PathBuf>,

    /// Module used for tokens that name only a class
    #[arg(short = 'm', long, value_name = "MODULE")]
    default_module: Option<String>,

    /// INI file whose sections seed the output
    #[arg(short, long, value_name = "FILE")]
    template: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    initialize_logging(args.debug);

    let mut settings = Settings::discover(args.config.as_deref()).context("Failed to load settings")?;
    settings.apply_overrides(
        &args.search_paths,
        args.default_module.as_deref(),
        args.template.as_deref(),
    );
    debug!("Search paths: {:?}", settings.effective_search_paths());

    let specs = args
        .classes
        .iter()
        .map(|token| ClassSpec::parse(token, settings.default_module.as_deref()))
        .collect::<class2config::Result<Vec<_>>>()?;

    let mut container = match &settings.template {
        Some(template) => ConfigContainer::from_template(template)
            .with_context(|| format!("Failed to read template {}", template.display()))?,
        None => ConfigContainer::new(),
    };

    let registry = SourceRegistry::new(settings.effective_search_paths());
    for spec in &specs {
        export_into(
            &registry,
            &mut container,
            &spec.module_name,
            &spec.class_name,
            spec.instance_name.as_deref(),
        )
        .with_context(|| format!("Failed to export {}", spec))?;
    }

    match &args.output {
        Some(path) => {
            ensure_parent_exists(path)?;
            IniFormat.write(&container, path)?;
            info!("Wrote {} sections to {}", container.len(), path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            IniFormat.render(&container, &mut stdout)?;
            stdout.flush()?;
        }
    }

    Ok(())
}

/// Log to stderr so the INI written to stdout stays clean
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

fn ensure_parent_exists(path: &std::path::Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    Ok(())
}
