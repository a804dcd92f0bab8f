//! Synthetic data generation command

use anyhow::{Context, Result};
use plant_lib::{Frequency, PowerPlantSimulator, TIMESTAMP_FORMAT};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::path::Path;

use crate::output::{print_json, print_success, OutputFormat};

#[derive(Serialize)]
struct SimulationReport {
    path: String,
    records: usize,
    frequency: String,
    first_timestamp: Option<String>,
    last_timestamp: Option<String>,
    seed: Option<u64>,
}

/// Generate a sensor time series and write it to `output`
pub fn run_simulate(
    output: &Path,
    start: &str,
    periods: usize,
    frequency: Frequency,
    seed: Option<u64>,
    format: OutputFormat,
) -> Result<()> {
    let start = PowerPlantSimulator::parse_start(start)?;
    let simulator = PowerPlantSimulator::new(start, periods, frequency);

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let records = simulator.generate(&mut rng);

    PowerPlantSimulator::export(output, &records)
        .with_context(|| format!("Failed to export data to {}", output.display()))?;

    match format {
        OutputFormat::Json => {
            let report = SimulationReport {
                path: output.display().to_string(),
                records: records.len(),
                frequency: frequency.to_string(),
                first_timestamp: records.first().map(|r| r.timestamp.clone()),
                last_timestamp: records.last().map(|r| r.timestamp.clone()),
                seed,
            };
            print_json(&report)?;
        }
        OutputFormat::Table => {
            print_success(&format!(
                "Data successfully exported to {} ({} {} records from {})",
                output.display(),
                records.len(),
                frequency,
                start.format(TIMESTAMP_FORMAT)
            ));
        }
    }

    Ok(())
}
