//! Output formatting utilities

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use plant_lib::{AnomalyRule, Parameter, PerformanceSummary, TrendDirection};
use serde::Serialize;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Pretty-print a value as JSON on stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Format a measured value with its unit
pub fn format_measurement(parameter: Parameter, value: f64) -> String {
    match parameter {
        Parameter::Temperature => format!("{:.2} °C", value),
        Parameter::Vibration => format!("{:.3} mm/s", value),
        Parameter::Efficiency => format!("{:.2} %", value),
    }
}

/// Color a parameter name by the quantity it measures
pub fn color_parameter(parameter: Parameter) -> String {
    match parameter {
        Parameter::Temperature => parameter.as_str().red().to_string(),
        Parameter::Vibration => parameter.as_str().yellow().to_string(),
        Parameter::Efficiency => parameter.as_str().cyan().to_string(),
    }
}

/// Color a rule label by its strategy family
pub fn color_rule(rule: AnomalyRule) -> String {
    use plant_lib::anomaly::RuleKind;

    match rule.kind() {
        RuleKind::Threshold => rule.as_str().red().to_string(),
        RuleKind::Trend => rule.as_str().yellow().to_string(),
        RuleKind::Statistical => rule.as_str().magenta().to_string(),
    }
}

/// Color the efficiency trend of a summary by its direction
pub fn color_trend(summary: &PerformanceSummary) -> String {
    let trend = summary.efficiency_trend_percent;
    match summary.efficiency_direction() {
        TrendDirection::Degrading => format!("{:.2} % (Degrading)", trend).red().to_string(),
        TrendDirection::ImprovingOrStable => {
            format!("+{:.2} % (Improving/Stable)", trend).green().to_string()
        }
    }
}
