//! # spar
//!
//! Estimates how much of each ledger's transaction set could have executed
//! in parallel, by replaying ledgers through the conflict model.
//!
//! ## Usage
//!
//! ```bash
//! # Analyze ledgers 36557164..36557264 from decoded JSON files
//! spar analyze --from 36557164 --to 36557264 --data-dir ./ledgers
//!
//! # Per-transaction outcomes of one ledger
//! spar ledger 36557164 --data-dir ./ledgers
//!
//! # Remember the data directory
//! spar config --set-data-dir ./ledgers --set-jobs 8
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod error;
mod output;
mod source;

pub use config::Config;
pub use error::CliError;
pub use output::Output;

/// Ledger parallelism analyzer
#[derive(Parser, Debug)]
#[command(name = "spar")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Log level used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Config file path (defaults to ~/.spar/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// CLI commands
#[derive(Debug, Subcommand)]
enum Commands {
    /// Analyze a range of ledgers
    Analyze(commands::analyze::AnalyzeCommand),
    /// Show per-transaction outcomes of one ledger
    Ledger(commands::ledger::LedgerCommand),
    /// Show or edit configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
        /// Set the ledger data directory
        #[arg(long)]
        set_data_dir: Option<PathBuf>,
        /// Set the number of concurrent ledgers
        #[arg(long)]
        set_jobs: Option<usize>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays parseable
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let json = cli.json;
    if let Err(e) = run(cli).await {
        if json {
            println!(
                "{}",
                serde_json::json!({
                    "error": format!("{:#}", e),
                    "success": false
                })
            );
        } else {
            eprintln!("Error: {:#}", e);
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config;
    let mut config = Config::load(config_path.as_deref());

    match cli.command {
        Commands::Analyze(cmd) => {
            let (from, to) = (cmd.from, cmd.to);
            cmd.execute(&config, cli.json)
                .await
                .with_context(|| format!("analysis of ledgers {}..{} failed", from, to))
        }
        Commands::Ledger(cmd) => {
            let seq = cmd.seq;
            cmd.execute(&config, cli.json)
                .await
                .with_context(|| format!("replay of ledger {} failed", seq))
        }
        Commands::Config {
            show,
            set_data_dir,
            set_jobs,
        } => handle_config(
            &mut config,
            config_path.as_deref(),
            show,
            set_data_dir,
            set_jobs,
            cli.json,
        )
        .context("configuration update failed"),
    }
}

fn handle_config(
    config: &mut Config,
    path: Option<&std::path::Path>,
    show: bool,
    set_data_dir: Option<PathBuf>,
    set_jobs: Option<usize>,
    json: bool,
) -> Result<(), CliError> {
    let mut modified = false;

    if let Some(dir) = set_data_dir {
        config.data_dir = Some(dir);
        modified = true;
    }

    if let Some(jobs) = set_jobs {
        if jobs == 0 {
            return Err(CliError::InvalidInput("--set-jobs must be at least 1".to_string()));
        }
        config.jobs = jobs;
        modified = true;
    }

    if modified {
        let written = config.save(path)?;
        tracing::info!(path = %written.display(), "configuration saved");
        Output::new(json)
            .field("status", "saved")
            .field("path", &written.display().to_string())
            .message(&format!("Configuration saved to {}", written.display()))
            .print();
    } else if show {
        let data_dir = config
            .data_dir
            .as_ref()
            .map(|d| d.display().to_string())
            .unwrap_or_else(|| "(unset)".to_string());
        Output::new(json)
            .field_value(
                "data_dir",
                serde_json::to_value(&config.data_dir)?,
            )
            .field_u64("jobs", config.jobs as u64)
            .field_value(
                "histogram_buckets",
                serde_json::to_value(&config.histogram_buckets)?,
            )
            .message(&format!(
                "Data dir: {}\nJobs: {}\nHistogram buckets: {:?}",
                data_dir, config.jobs, config.histogram_buckets
            ))
            .print();
    } else {
        Output::new(json)
            .field("status", "unchanged")
            .message("Use --show to display configuration or --set-* to modify")
            .print();
    }

    Ok(())
}
