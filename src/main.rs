//! Observation store driver.
//!
//! # Architecture Overview
//!
//! ```text
//!     reports.jsonl ──▶ replay ──▶ ObservationStore ──▶ dump / latest
//!                                        ▲
//!     store.toml ──▶ loader ─────────────┤
//!          │                             │
//!          └──▶ watcher (watch mode) ────┘  retention + watchlist reloads
//! ```

use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use observation_store::config::{load_config, ConfigWatcher, LiveConfig, StoreConfig};
use observation_store::observability::logging;
use observation_store::replay::replay_reports;
use observation_store::{EntityId, HealthStorage, ObservationStore};

#[derive(Parser)]
#[command(name = "observation-store")]
#[command(about = "Replay health reports into an in-memory observation store", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the configured log level.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a JSON-lines report file and print the resulting store
    Replay {
        file: PathBuf,
        /// Admit subjects that are not on the watchlist
        #[arg(long)]
        unfiltered: bool,
        /// Print the dump as JSON
        #[arg(long)]
        json: bool,
        /// Print the latest report for this subject (repeatable)
        #[arg(long)]
        latest: Vec<String>,
    },
    /// Replay a report file, then apply config reloads until Ctrl-C
    Watch { file: PathBuf },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => StoreConfig::default(),
    };
    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.observability.log_level.clone());
    logging::init_logging(&level);

    tracing::info!(
        max_reports_per_view = config.retention.max_reports_per_view,
        filter = config.ingestion.filter,
        subjects = config.watchlist.subjects.len(),
        "Configuration loaded"
    );

    let store = ObservationStore::from_config(&config);

    match cli.command {
        Commands::Replay {
            file,
            unfiltered,
            json,
            latest,
        } => {
            let filter = config.ingestion.filter && !unfiltered;
            let summary = replay_file(&store, &file, filter)?;
            eprintln!(
                "accepted={} ignored={} failed={}",
                summary.accepted, summary.ignored, summary.failed
            );

            if json {
                println!("{}", serde_json::to_string_pretty(&store.snapshot())?);
            } else {
                print!("{}", store.dump());
            }

            for subject in latest {
                match store.get_latest_report(&EntityId::from(subject.as_str())) {
                    Some(report) => println!("{}", serde_json::to_string(&report)?),
                    None => println!("{}: no reports", subject),
                }
            }
        }
        Commands::Watch { file } => {
            let Some(config_path) = cli.config else {
                return Err("watch requires --config".into());
            };
            replay_file(&store, &file, config.ingestion.filter)?;

            let live = LiveConfig::new(config);
            let (watcher, mut updates) = ConfigWatcher::new(&config_path);
            let _watcher = watcher.run()?;

            loop {
                tokio::select! {
                    Some(new_config) = updates.recv() => {
                        live.apply(new_config, &store);
                    }
                    _ = tokio::signal::ctrl_c() => {
                        tracing::info!("Received Ctrl-C, shutting down");
                        break;
                    }
                }
            }
            print!("{}", store.dump());
        }
    }

    Ok(())
}

fn replay_file(
    store: &ObservationStore,
    path: &Path,
    filter: bool,
) -> Result<observation_store::replay::ReplaySummary, Box<dyn std::error::Error>> {
    let file = File::open(path)?;
    let summary = replay_reports(store, BufReader::new(file), filter)?;
    Ok(summary)
}
