//! Configuration management for the CLI

use anyhow::{Context, Result};
use plant_lib::anomaly::DEFAULT_WINDOW_SIZE;
use plant_lib::performance::DEFAULT_MAX_CAPACITY_MW;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI configuration
///
/// Layered from an optional config file and `PLANTWATCH_*` environment
/// variables; command-line flags override both.
#[derive(Debug, Clone, Deserialize)]
pub struct PlantwatchConfig {
    /// Sensor data file read by `detect` and `summary`
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,

    /// Moving-average window for the trend rules
    #[serde(default = "default_window_size")]
    pub window_size: usize,

    /// Nameplate capacity used for utilization (MW)
    #[serde(default = "default_max_capacity")]
    pub max_capacity_mw: f64,

    /// Default tracing filter when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_data_path() -> PathBuf {
    PathBuf::from("data/simulated_sensor_data.csv")
}

fn default_window_size() -> usize {
    DEFAULT_WINDOW_SIZE
}

fn default_max_capacity() -> f64 {
    DEFAULT_MAX_CAPACITY_MW
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for PlantwatchConfig {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            window_size: default_window_size(),
            max_capacity_mw: default_max_capacity(),
            log_level: default_log_level(),
        }
    }
}

impl PlantwatchConfig {
    /// Load configuration from an optional file and the environment
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let config = builder
            .add_source(config::Environment::with_prefix("PLANTWATCH").try_parsing(true))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to parse configuration")
    }
}
