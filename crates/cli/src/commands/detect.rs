//! Anomaly detection command

use anyhow::{Context, Result};
use colored::Colorize;
use plant_lib::anomaly::count_by_rule;
use plant_lib::{load_records, AnomalyDetector, AnomalyFinding, DetectionMetrics, StructuredLogger};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;
use tabled::Tabled;

use crate::output::{
    color_parameter, color_rule, format_measurement, print_info, print_json, print_success,
    print_warning, OutputFormat,
};

/// Options for a detection run after config and flags are merged
pub struct DetectOptions<'a> {
    pub input: &'a Path,
    pub window_size: usize,
    /// Findings listed in table output (0 = all)
    pub limit: usize,
    pub show_metrics: bool,
}

/// Row for the findings table
#[derive(Tabled)]
struct FindingRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Timestamp")]
    timestamp: String,
    #[tabled(rename = "Parameter")]
    parameter: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Reason")]
    reason: String,
}

/// Row for the per-rule counts table
#[derive(Tabled)]
struct RuleCountRow {
    #[tabled(rename = "Rule")]
    rule: String,
    #[tabled(rename = "Findings")]
    count: usize,
}

#[derive(Serialize)]
struct DetectionReport<'a> {
    source: String,
    records: usize,
    window_size: usize,
    total: usize,
    by_rule: BTreeMap<&'static str, usize>,
    findings: &'a [AnomalyFinding],
}

/// Load records, run the detector and print the findings
pub fn run_detect(options: DetectOptions<'_>, format: OutputFormat) -> Result<()> {
    let source = options.input.display().to_string();
    let logger = StructuredLogger::new(&source);
    let metrics = DetectionMetrics::new();

    let records = match load_records(options.input) {
        Ok(records) => records,
        Err(e) => {
            metrics.inc_load_errors();
            logger.log_load_failed(&e.to_string());
            return Err(e).with_context(|| format!("Failed to load {}", source));
        }
    };
    metrics.set_records_loaded(records.len());
    logger.log_records_loaded(records.len());

    let detector = AnomalyDetector::new(options.window_size)?;
    let started = Instant::now();
    let findings = detector
        .detect(&records)
        .context("Anomaly detection failed")?;
    metrics.observe_detection(started.elapsed().as_secs_f64(), &findings);

    for finding in &findings {
        logger.log_finding(finding);
    }
    logger.log_detection_summary(records.len(), detector.window_size(), findings.len());

    let counts = count_by_rule(&findings);

    match format {
        OutputFormat::Json => {
            let report = DetectionReport {
                source,
                records: records.len(),
                window_size: detector.window_size(),
                total: findings.len(),
                by_rule: counts.iter().map(|(rule, n)| (rule.as_str(), *n)).collect(),
                findings: &findings,
            };
            print_json(&report)?;
        }
        OutputFormat::Table => {
            println!("{}", "Anomaly Detection".bold());
            println!("{}", "=".repeat(60));
            println!("Source:       {}", source.cyan());
            println!("Records:      {}", records.len());
            println!("Window size:  {}", detector.window_size());
            println!();

            if findings.is_empty() {
                print_success("No anomalies detected");
            } else {
                println!("Total anomalies detected: {}", findings.len().to_string().bold());
                print_findings(&findings, options.limit);
                print_rule_counts(&counts);
            }
        }
    }

    // Metrics go to stderr so JSON on stdout stays a single document
    if options.show_metrics {
        eprint!("{}", metrics.render().context("Failed to encode metrics")?);
    }

    Ok(())
}

fn print_findings(findings: &[AnomalyFinding], limit: usize) {
    let shown = if limit == 0 {
        findings.len()
    } else {
        limit.min(findings.len())
    };

    let rows: Vec<FindingRow> = findings[..shown]
        .iter()
        .map(|f| FindingRow {
            index: f.index,
            timestamp: f.timestamp.clone(),
            parameter: color_parameter(f.parameter),
            value: format_measurement(f.parameter, f.value),
            reason: f.reason.clone(),
        })
        .collect();

    let table = tabled::Table::new(rows)
        .with(tabled::settings::Style::rounded())
        .to_string();
    println!("{}", table);

    if shown < findings.len() {
        print_info(&format!(
            "Showing first {} of {} findings (use --limit 0 to list all)",
            shown,
            findings.len()
        ));
    }
}

fn print_rule_counts(counts: &[(plant_lib::AnomalyRule, usize)]) {
    let rows: Vec<RuleCountRow> = counts
        .iter()
        .filter(|(_, n)| *n > 0)
        .map(|(rule, n)| RuleCountRow {
            rule: color_rule(*rule),
            count: *n,
        })
        .collect();

    println!();
    println!("{}", "Findings by Rule".bold());
    let table = tabled::Table::new(rows)
        .with(tabled::settings::Style::rounded())
        .to_string();
    println!("{}", table);

    if counts
        .iter()
        .any(|(rule, n)| *n > 0 && rule.kind() == plant_lib::anomaly::RuleKind::Threshold)
    {
        print_warning("Safe operating thresholds were exceeded");
    }
}
