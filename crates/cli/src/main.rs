//! plantwatch CLI
//!
//! Generates simulated plant telemetry, flags anomalous sensor readings and
//! summarizes plant performance from tabular sensor data.

mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{detect, simulate, summary};
use plant_lib::{Frequency, StructuredLogger};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Power plant sensor anomaly detection
#[derive(Parser)]
#[command(name = "plantwatch")]
#[command(author, version, about = "Power plant sensor anomaly detection", long_about = None)]
pub struct Cli {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(long, env = "PLANTWATCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    /// Enable debug logging
    #[arg(long, short)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate simulated sensor data
    Simulate {
        /// Output file path (defaults to the configured data path)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// First timestamp (YYYY-MM-DD HH:MM:SS)
        #[arg(long, default_value = "2025-01-01 00:00:00")]
        start: String,

        /// Number of records to generate
        #[arg(long, default_value_t = 168)]
        periods: usize,

        /// Spacing between records (hourly, daily)
        #[arg(long, default_value = "hourly")]
        frequency: Frequency,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Detect anomalies in sensor data
    Detect {
        /// Input file path (defaults to the configured data path)
        #[arg(long, short)]
        input: Option<PathBuf>,

        /// Moving-average window for trend rules
        #[arg(long, short)]
        window_size: Option<usize>,

        /// Number of findings to list in table output (0 = all)
        #[arg(long, default_value_t = 10)]
        limit: usize,

        /// Print Prometheus metrics to stderr after the report
        #[arg(long)]
        metrics: bool,
    },

    /// Summarize plant performance
    Summary {
        /// Input file path (defaults to the configured data path)
        #[arg(long, short)]
        input: Option<PathBuf>,

        /// Nameplate capacity in MW
        #[arg(long)]
        max_capacity: Option<f64>,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Simulate { .. } => "simulate",
            Commands::Detect { .. } => "detect",
            Commands::Summary { .. } => "summary",
        }
    }
}

fn init_tracing(default_level: &str, verbose: bool, json: bool) {
    let level = if verbose { "debug" } else { default_level };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so stdout stays parseable
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = config::PlantwatchConfig::load(cli.config.as_deref())?;
    init_tracing(&config.log_level, cli.verbose, cli.log_json);
    debug!(
        data_path = %config.data_path.display(),
        window_size = config.window_size,
        max_capacity_mw = config.max_capacity_mw,
        "Configuration loaded"
    );

    StructuredLogger::new(config.data_path.display().to_string())
        .log_startup(VERSION, cli.command.name());

    match cli.command {
        Commands::Simulate {
            output,
            start,
            periods,
            frequency,
            seed,
        } => {
            let output = output.unwrap_or_else(|| config.data_path.clone());
            simulate::run_simulate(&output, &start, periods, frequency, seed, cli.format)?;
        }
        Commands::Detect {
            input,
            window_size,
            limit,
            metrics,
        } => {
            let input = input.unwrap_or_else(|| config.data_path.clone());
            detect::run_detect(
                detect::DetectOptions {
                    input: &input,
                    window_size: window_size.unwrap_or(config.window_size),
                    limit,
                    show_metrics: metrics,
                },
                cli.format,
            )?;
        }
        Commands::Summary {
            input,
            max_capacity,
        } => {
            let input = input.unwrap_or_else(|| config.data_path.clone());
            summary::run_summary(
                &input,
                max_capacity.unwrap_or(config.max_capacity_mw),
                cli.format,
            )?;
        }
    }

    Ok(())
}
