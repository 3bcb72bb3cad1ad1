//! Mensura CLI
//!
//! Main entry point for the `mensura` command.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use mensura_core::{Measurement, QuantityRegistry};
use mensura_std::UnitTable;

#[derive(Parser)]
#[command(name = "mensura")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Convert measurements between units of the same kind")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON unit table extending the standard units
    #[arg(long, global = true, value_name = "FILE")]
    table: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered kinds with their base units
    Kinds,

    /// List the units of a kind
    Units {
        /// Kind name, e.g. Distance
        kind: String,
    },

    /// Convert a value between two units of a kind
    Convert {
        /// Kind name, e.g. Distance
        kind: String,

        /// Magnitude in the source unit
        #[arg(allow_negative_numbers = true)]
        value: f64,

        /// Source unit (name, symbol or alias)
        from: String,

        /// Target unit (name, symbol or alias)
        to: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let registry = load_registry(cli.table.as_deref())?;
    let output = match cli.command {
        Commands::Kinds => list_kinds(&registry),
        Commands::Units { kind } => list_units(&registry, &kind)?,
        Commands::Convert { kind, value, from, to } => convert(&registry, &kind, value, &from, &to)?,
    };
    println!("{}", output);
    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_registry(table: Option<&Path>) -> Result<QuantityRegistry> {
    let mut registry = mensura_std::standard_registry().context("loading standard units")?;
    if let Some(path) = table {
        let json = fs::read_to_string(path)
            .with_context(|| format!("reading unit table {}", path.display()))?;
        UnitTable::from_json(&json)
            .and_then(|t| t.apply(&mut registry))
            .with_context(|| format!("applying unit table {}", path.display()))?;
        debug!(path = %path.display(), "loaded unit table");
    }
    Ok(registry)
}

fn list_kinds(registry: &QuantityRegistry) -> String {
    registry
        .kinds()
        .map(|kind| format!("{:<12} {:<8} {}", kind.name(), kind.base_unit(), kind.dimension()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn list_units(registry: &QuantityRegistry, kind: &str) -> Result<String> {
    let units = registry.units(kind)?;
    Ok(units
        .iter()
        .map(|unit| format!("{:<20} {}", unit.name(), unit.symbol()))
        .collect::<Vec<_>>()
        .join("\n"))
}

fn convert(registry: &QuantityRegistry, kind: &str, value: f64, from: &str, to: &str) -> Result<String> {
    let source = registry.lookup(kind, from)?;
    let target = registry.lookup(kind, to)?;
    let converted = Measurement::new(value, source)?.convert_to(&target)?;
    Ok(converted.to_string())
}
