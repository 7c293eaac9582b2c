//! Infiniscroll CLI
//!
//! Command-line front end for the carousel runtime.
//!
//! Responsibilities:
//! - Replay scroll traces and print the resulting report as JSON
//! - Print the geometry derived for a given layout
//! - Show the effective configuration

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use infiniscroll_core::CarouselGeometry;
use infiniscroll_runtime::config::Config;
use infiniscroll_runtime::run_trace;
use infiniscroll_trace::ScrollTrace;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "infiniscroll")]
#[command(author, version, about = "Drive infinite carousels from scroll traces")]
struct Cli {
    /// Configuration file (defaults to the standard locations)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a JSON scroll trace and print the final report
    Run {
        /// Path to the trace file
        trace: PathBuf,
        /// Pretty-print the report
        #[arg(long)]
        pretty: bool,
    },
    /// Print the geometry for a carousel layout
    Geometry {
        /// Number of real items
        #[arg(short = 'n', long)]
        items: usize,
        /// Item content width in pixels
        #[arg(short = 'w', long)]
        item_width: f64,
        /// Total horizontal margin per item in pixels
        #[arg(short, long, default_value = "0")]
        margin: f64,
        /// Viewport width in pixels
        #[arg(short, long)]
        viewport: f64,
    },
    /// Print the effective configuration as TOML
    Config,
}

fn load_config(path: Option<&PathBuf>) -> Config {
    let loaded = match path {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };
    loaded.unwrap_or_else(|e| {
        // Can't use tracing yet, fall back to eprintln
        eprintln!("Failed to load configuration: {:#}. Using defaults.", e);
        Config::default()
    })
}

/// Pick the filter directive: `--log-level`, then `RUST_LOG`, then the config file.
fn log_directive(cli_level: Option<&str>, env_level: Option<String>, config_level: &str) -> String {
    cli_level
        .map(str::to_string)
        .or(env_level.filter(|level| !level.trim().is_empty()))
        .unwrap_or_else(|| config_level.to_string())
}

fn init_logging(cli_level: Option<&str>, config_level: &str) -> Result<()> {
    let env_level = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directive = log_directive(cli_level, env_level, config_level);
    let filter = EnvFilter::try_new(&directive)
        .with_context(|| format!("Invalid log level: {}", directive))?;

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_ref());
    let config_warnings = config.validate();

    init_logging(cli.log_level.as_deref(), &config.logging.level)?;
    for w in &config_warnings {
        warn!("Config: {} - {}", w.field, w.message);
    }

    match cli.command {
        Commands::Run { trace, pretty } => {
            let json = std::fs::read_to_string(&trace)
                .with_context(|| format!("Failed to read trace file: {}", trace.display()))?;
            let scroll_trace = ScrollTrace::from_json(&json)
                .with_context(|| format!("Failed to load trace: {}", trace.display()))?;

            info!("Running trace {}", trace.display());
            let report = run_trace(config.controller_config(), scroll_trace).await?;

            let output = if pretty {
                serde_json::to_string_pretty(&report)?
            } else {
                serde_json::to_string(&report)?
            };
            println!("{}", output);
        }
        Commands::Geometry {
            items,
            item_width,
            margin,
            viewport,
        } => {
            let geometry = CarouselGeometry::from_metrics(item_width, margin, viewport, items)
                .context("Cannot compute carousel geometry")?;
            println!("{}", serde_json::to_string_pretty(&geometry)?);
        }
        Commands::Config => {
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
