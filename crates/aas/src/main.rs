//! AAS command line
//!
//! Thin wrapper over the repository and analytics services.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use aas::alerts::AlertEngine;
use aas::analytics::AssetSummary;
use aas::codec;
use aas::config::LogFormat;
use aas::{AppConfig, FleetAnalytics, Repository};

/// Asset Administration Shell store
#[derive(Parser, Debug)]
#[command(name = "aas")]
#[command(about = "Asset Administration Shell store and fleet analytics", long_about = None)]
struct Args {
    /// Path to a TOML config file (defaults to ./aas.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Database file, overrides `store.db_path`
    #[arg(long)]
    db: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create shells from a JSON array file
    Import { file: PathBuf },
    /// Print one shell by id
    Show { id: String },
    /// List top-level fields of every shell
    List,
    /// Fleet overview table
    Summary,
    /// Full nested view of one shell (id_short or trailing id fragment)
    Detail { identity: String },
    /// Fleet-wide counts and average efficiency
    Metrics,
    /// Evaluate alert rules over the fleet
    Alerts,
    /// Set the status of a shell by id_short
    SetStatus { id_short: String, status: String },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(db) = args.db {
        config.store.db_path = db;
    }

    // Initialize tracing
    let json = config.logging.format == LogFormat::Json;
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .with(json.then(|| fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| fmt::layer().with_writer(std::io::stderr)))
        .init();

    let repo = Arc::new(Repository::open(&config.store)?);
    let analytics = FleetAnalytics::new(repo.clone(), AlertEngine::new(config.alerts.rules));

    match args.command {
        Command::Import { file } => {
            let bytes = std::fs::read(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let shells = codec::decode_shells(&bytes)?;
            for shell in &shells {
                repo.create(shell)
                    .with_context(|| format!("importing {}", shell.id()))?;
            }
            info!("Imported {} shells from {}", shells.len(), file.display());
        }
        Command::Show { id } => match repo.get(&id)? {
            Some(shell) => print_json(&shell)?,
            None => bail!("no shell with id {}", id),
        },
        Command::List => print_json(&repo.list_records()?)?,
        Command::Summary => print_table(&analytics.summarize()?),
        Command::Detail { identity } => match analytics.detail(&identity)? {
            Some(detail) => print_json(&detail)?,
            None => bail!("no shell matches {}", identity),
        },
        Command::Metrics => print_json(&analytics.fleet_metrics()?)?,
        Command::Alerts => print_json(&analytics.alerts()?)?,
        Command::SetStatus { id_short, status } => {
            print_json(&analytics.update_status(&id_short, &status)?)?
        }
    }

    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_table(rows: &[AssetSummary]) {
    const HEADERS: [&str; 6] = [
        "ID",
        "Name",
        "Status",
        "Last Maintenance",
        "Next Service",
        "Efficiency",
    ];

    let cells: Vec<[String; 6]> = rows.iter().map(AssetSummary::cells).collect();
    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |row: &[&str]| {
        row.iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    println!("{}", line(&HEADERS));
    println!("{}", line(&widths.map(|w| "-".repeat(w)).each_ref().map(String::as_str)));
    for row in &cells {
        println!("{}", line(&row.each_ref().map(String::as_str)));
    }
}
