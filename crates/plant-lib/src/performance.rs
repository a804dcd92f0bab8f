//! Aggregate performance metrics
//!
//! Summarizes power output and efficiency over a loaded record set:
//! average output, capacity utilization, efficiency trend and output
//! variance (a stability indicator).

use crate::models::SensorRecord;
use serde::{Deserialize, Serialize};

/// Nameplate capacity assumed when none is configured (MW)
pub const DEFAULT_MAX_CAPACITY_MW: f64 = 1000.0;

/// Minimum records needed before the efficiency trend is computed
const MIN_RECORDS_FOR_TREND: usize = 4;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReportError {
    #[error("cannot summarize an empty dataset")]
    EmptyDataset,

    #[error("max capacity must be positive, got {0}")]
    InvalidCapacity(f64),
}

/// Direction of the efficiency trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Degrading,
    ImprovingOrStable,
}

/// Performance summary of a record set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub record_count: usize,
    pub average_power_mw: f64,
    pub capacity_utilization_percent: f64,
    pub average_efficiency_percent: f64,
    /// Late-period minus early-period mean efficiency (percentage points)
    pub efficiency_trend_percent: f64,
    /// Sample variance of power output; `None` with fewer than two records
    pub output_variance: Option<f64>,
}

impl PerformanceSummary {
    pub fn efficiency_direction(&self) -> TrendDirection {
        if self.efficiency_trend_percent < 0.0 {
            TrendDirection::Degrading
        } else {
            TrendDirection::ImprovingOrStable
        }
    }
}

/// Compute every metric in one go
pub fn summarize(
    records: &[SensorRecord],
    max_capacity_mw: f64,
) -> Result<PerformanceSummary, ReportError> {
    Ok(PerformanceSummary {
        record_count: records.len(),
        average_power_mw: average_power_output(records)?,
        capacity_utilization_percent: capacity_utilization(records, max_capacity_mw)?,
        average_efficiency_percent: average_efficiency(records)?,
        efficiency_trend_percent: efficiency_trend(records)?,
        output_variance: output_variance(records)?,
    })
}

pub fn average_power_output(records: &[SensorRecord]) -> Result<f64, ReportError> {
    mean(records.iter().map(|r| r.power_output_mw))
}

/// Average output as a percentage of `max_capacity_mw`
pub fn capacity_utilization(
    records: &[SensorRecord],
    max_capacity_mw: f64,
) -> Result<f64, ReportError> {
    if max_capacity_mw.is_nan() || max_capacity_mw <= 0.0 {
        return Err(ReportError::InvalidCapacity(max_capacity_mw));
    }
    Ok(average_power_output(records)? / max_capacity_mw * 100.0)
}

pub fn average_efficiency(records: &[SensorRecord]) -> Result<f64, ReportError> {
    mean(records.iter().map(|r| r.efficiency_percent))
}

/// Compare the first quarter of the dataset with the last quarter
///
/// The early slice holds `n / 4` records (rounded down) and the late slice
/// `n / 4` rounded up. Returns 0.0 for fewer than four records.
pub fn efficiency_trend(records: &[SensorRecord]) -> Result<f64, ReportError> {
    if records.is_empty() {
        return Err(ReportError::EmptyDataset);
    }

    let n = records.len();
    if n < MIN_RECORDS_FOR_TREND {
        return Ok(0.0);
    }

    let early_len = n / 4;
    let late_len = n.div_ceil(4);

    let early = mean(records[..early_len].iter().map(|r| r.efficiency_percent))?;
    let late = mean(records[n - late_len..].iter().map(|r| r.efficiency_percent))?;
    Ok(late - early)
}

/// Sample variance (Bessel-corrected) of power output
pub fn output_variance(records: &[SensorRecord]) -> Result<Option<f64>, ReportError> {
    if records.is_empty() {
        return Err(ReportError::EmptyDataset);
    }
    if records.len() < 2 {
        return Ok(None);
    }

    let avg = average_power_output(records)?;
    let sum_sq: f64 = records
        .iter()
        .map(|r| (r.power_output_mw - avg).powi(2))
        .sum();
    Ok(Some(sum_sq / (records.len() - 1) as f64))
}

fn mean(values: impl Iterator<Item = f64>) -> Result<f64, ReportError> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        return Err(ReportError::EmptyDataset);
    }
    Ok(sum / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(power: f64, efficiency: f64) -> SensorRecord {
        SensorRecord {
            timestamp: String::new(),
            power_output_mw: power,
            temperature_c: 500.0,
            pressure_bar: 160.0,
            vibration_mm_s: 1.5,
            efficiency_percent: efficiency,
        }
    }

    #[test]
    fn test_averages_and_utilization() {
        let records = vec![record(700.0, 36.0), record(900.0, 40.0)];

        assert_eq!(average_power_output(&records).unwrap(), 800.0);
        assert_eq!(average_efficiency(&records).unwrap(), 38.0);
        assert!((capacity_utilization(&records, 1000.0).unwrap() - 80.0).abs() < 1e-9);
        assert!((capacity_utilization(&records, 1600.0).unwrap() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_capacity() {
        let records = vec![record(700.0, 36.0)];
        assert_eq!(
            capacity_utilization(&records, 0.0).unwrap_err(),
            ReportError::InvalidCapacity(0.0)
        );
    }

    #[test]
    fn test_empty_dataset_rejected() {
        assert_eq!(
            summarize(&[], DEFAULT_MAX_CAPACITY_MW).unwrap_err(),
            ReportError::EmptyDataset
        );
        assert_eq!(efficiency_trend(&[]).unwrap_err(), ReportError::EmptyDataset);
    }

    #[test]
    fn test_trend_needs_four_records() {
        let records = vec![record(800.0, 30.0), record(800.0, 40.0), record(800.0, 45.0)];
        assert_eq!(efficiency_trend(&records).unwrap(), 0.0);
    }

    #[test]
    fn test_trend_slices_uneven_quarters() {
        // n = 10: early = first 2, late = last 3
        let efficiencies = [30.0, 32.0, 99.0, 99.0, 99.0, 99.0, 99.0, 40.0, 41.0, 42.0];
        let records: Vec<SensorRecord> =
            efficiencies.iter().map(|e| record(800.0, *e)).collect();

        let trend = efficiency_trend(&records).unwrap();
        assert!((trend - (41.0 - 31.0)).abs() < 1e-9);
    }

    #[test]
    fn test_degrading_direction() {
        let efficiencies = [40.0, 40.0, 39.0, 38.0];
        let records: Vec<SensorRecord> =
            efficiencies.iter().map(|e| record(800.0, *e)).collect();

        let summary = summarize(&records, DEFAULT_MAX_CAPACITY_MW).unwrap();
        assert!((summary.efficiency_trend_percent + 2.0).abs() < 1e-9);
        assert_eq!(summary.efficiency_direction(), TrendDirection::Degrading);
    }

    #[test]
    fn test_flat_trend_is_not_degrading() {
        let records: Vec<SensorRecord> = (0..8).map(|_| record(800.0, 38.0)).collect();

        let summary = summarize(&records, DEFAULT_MAX_CAPACITY_MW).unwrap();
        assert_eq!(summary.efficiency_trend_percent, 0.0);
        assert_eq!(
            summary.efficiency_direction(),
            TrendDirection::ImprovingOrStable
        );
    }

    #[test]
    fn test_output_variance() {
        let records = vec![record(790.0, 38.0), record(800.0, 38.0), record(810.0, 38.0)];
        assert_eq!(output_variance(&records).unwrap(), Some(100.0));

        assert_eq!(output_variance(&records[..1]).unwrap(), None);
    }
}
