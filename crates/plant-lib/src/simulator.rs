//! Synthetic sensor data generation
//!
//! Produces plausible plant telemetry as a bounded random walk: each
//! quantity starts from a random operating point, drifts by a small uniform
//! step per period, and is clamped to its physical range.

use crate::loader::{write_records, LoadError};
use crate::models::{SensorRecord, TIMESTAMP_FORMAT};
use chrono::{Duration, NaiveDateTime};
use rand::Rng;
use std::fmt;
use std::ops::RangeInclusive;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error("no data generated")]
    NoData,

    #[error("invalid start timestamp '{0}', expected YYYY-MM-DD HH:MM:SS")]
    InvalidStart(String),

    #[error("frequency must be 'hourly' or 'daily', got '{0}'")]
    InvalidFrequency(String),

    #[error(transparent)]
    Write(#[from] LoadError),
}

/// Spacing between consecutive records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Frequency {
    #[default]
    Hourly,
    Daily,
}

impl Frequency {
    pub fn step(&self) -> Duration {
        match self {
            Frequency::Hourly => Duration::hours(1),
            Frequency::Daily => Duration::days(1),
        }
    }
}

impl FromStr for Frequency {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hourly" => Ok(Frequency::Hourly),
            "daily" => Ok(Frequency::Daily),
            _ => Err(SimulationError::InvalidFrequency(s.to_string())),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::Hourly => f.write_str("hourly"),
            Frequency::Daily => f.write_str("daily"),
        }
    }
}

/// Walk parameters for one measured quantity
struct Channel {
    initial: RangeInclusive<f64>,
    step: f64,
    min: f64,
    max: f64,
    decimals: i32,
}

impl Channel {
    fn advance<R: Rng + ?Sized>(&self, value: f64, rng: &mut R) -> f64 {
        (value + rng.gen_range(-self.step..=self.step)).clamp(self.min, self.max)
    }

    fn round(&self, value: f64) -> f64 {
        let factor = 10f64.powi(self.decimals);
        (value * factor).round() / factor
    }
}

const POWER: Channel = Channel {
    initial: 700.0..=900.0,
    step: 5.0,
    min: 400.0,
    max: 1000.0,
    decimals: 2,
};

const TEMPERATURE: Channel = Channel {
    initial: 450.0..=520.0,
    step: 2.0,
    min: 250.0,
    max: 600.0,
    decimals: 2,
};

const PRESSURE: Channel = Channel {
    initial: 150.0..=180.0,
    step: 1.5,
    min: 100.0,
    max: 220.0,
    decimals: 2,
};

const VIBRATION: Channel = Channel {
    initial: 1.0..=2.5,
    step: 0.05,
    min: 0.5,
    max: 5.0,
    decimals: 3,
};

const EFFICIENCY: Channel = Channel {
    initial: 35.0..=42.0,
    step: 0.1,
    min: 30.0,
    max: 45.0,
    decimals: 2,
};

/// Generates time-ordered plant sensor records
#[derive(Debug, Clone)]
pub struct PowerPlantSimulator {
    pub start: NaiveDateTime,
    pub periods: usize,
    pub frequency: Frequency,
}

impl PowerPlantSimulator {
    pub fn new(start: NaiveDateTime, periods: usize, frequency: Frequency) -> Self {
        Self {
            start,
            periods,
            frequency,
        }
    }

    /// Parse a start timestamp in the simulator's output format
    pub fn parse_start(value: &str) -> Result<NaiveDateTime, SimulationError> {
        NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
            .map_err(|_| SimulationError::InvalidStart(value.to_string()))
    }

    /// Generate `periods` records using `rng`
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<SensorRecord> {
        let channels = [&POWER, &TEMPERATURE, &PRESSURE, &VIBRATION, &EFFICIENCY];
        let mut state = channels.map(|c| rng.gen_range(c.initial.clone()));

        let mut timestamp = self.start;
        let mut records = Vec::with_capacity(self.periods);

        for _ in 0..self.periods {
            for (value, channel) in state.iter_mut().zip(channels) {
                *value = channel.advance(*value, rng);
            }

            let [power, temperature, pressure, vibration, efficiency] = state;
            records.push(SensorRecord {
                timestamp: timestamp.format(TIMESTAMP_FORMAT).to_string(),
                power_output_mw: POWER.round(power),
                temperature_c: TEMPERATURE.round(temperature),
                pressure_bar: PRESSURE.round(pressure),
                vibration_mm_s: VIBRATION.round(vibration),
                efficiency_percent: EFFICIENCY.round(efficiency),
            });

            timestamp += self.frequency.step();
        }

        info!(
            event = "data_generated",
            periods = self.periods,
            frequency = %self.frequency,
            start = %self.start,
            "Generated simulated sensor data"
        );

        records
    }

    /// Write generated records to `path` in the tabular format
    pub fn export(path: impl AsRef<Path>, records: &[SensorRecord]) -> Result<(), SimulationError> {
        if records.is_empty() {
            return Err(SimulationError::NoData);
        }

        let path = path.as_ref();
        write_records(path, records)?;
        info!(
            event = "data_exported",
            path = %path.display(),
            records = records.len(),
            "Exported simulated sensor data"
        );
        Ok(())
    }
}
