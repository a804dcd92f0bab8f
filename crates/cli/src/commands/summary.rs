//! Performance summary command

use anyhow::{Context, Result};
use colored::Colorize;
use plant_lib::{load_records, summarize, StructuredLogger};
use std::path::Path;

use crate::output::{color_trend, print_json, print_warning, OutputFormat};

/// Load records and print aggregate performance metrics
pub fn run_summary(input: &Path, max_capacity_mw: f64, format: OutputFormat) -> Result<()> {
    let logger = StructuredLogger::new(input.display().to_string());

    let records = load_records(input)
        .with_context(|| format!("Failed to load {}", input.display()))?;
    logger.log_records_loaded(records.len());

    let summary = summarize(&records, max_capacity_mw).context("Failed to summarize records")?;
    logger.log_performance_summary(&summary);

    match format {
        OutputFormat::Json => print_json(&summary)?,
        OutputFormat::Table => {
            println!("{}", "Performance Summary".bold());
            println!("{}", "=".repeat(50));
            println!("Records:                  {}", summary.record_count);
            println!("Average Power Output:     {:.2} MW", summary.average_power_mw);
            println!(
                "Capacity Utilization:     {:.2} % (of {:.0} MW)",
                summary.capacity_utilization_percent, max_capacity_mw
            );
            println!(
                "Average Efficiency:       {:.2} %",
                summary.average_efficiency_percent
            );
            println!(
                "Efficiency Trend:         {}",
                color_trend(&summary)
            );
            match summary.output_variance {
                Some(variance) => println!("Output Variance:          {:.2}", variance),
                None => print_warning("Output variance needs at least two records"),
            }
        }
    }

    Ok(())
}
