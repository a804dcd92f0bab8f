//! Two-pass anomaly detector
//!
//! Pass 1 walks the records once and applies the threshold and trend rules
//! to each record. Pass 2 computes temperature statistics over the whole
//! sequence and flags outliers. Each pass is a pure function; `detect`
//! concatenates their output.

use super::moving_average::MovingAverage;
use super::rules::{
    AnomalyFinding, AnomalyRule, MAX_TEMPERATURE_C, MAX_VIBRATION_MM_S, MIN_EFFICIENCY_PERCENT,
    OUTLIER_STD_DEVS, TEMPERATURE_TREND_MARGIN, VIBRATION_TREND_MARGIN,
};
use super::stats::SampleStats;
use crate::models::SensorRecord;
use std::num::NonZeroUsize;
use tracing::debug;

/// Default look-back span for the moving-average trend rules
pub const DEFAULT_WINDOW_SIZE: usize = 5;

/// Precondition failures detected before any rule runs
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DetectorError {
    #[error("window size must be at least 1")]
    InvalidWindowSize,

    #[error("record {index} has a non-finite value in {field}")]
    NonFiniteValue { index: usize, field: &'static str },
}

/// Classifies sensor records using threshold, trend and statistical rules
///
/// The detector holds no findings between calls: every `detect` call
/// returns a freshly built sequence.
#[derive(Debug, Clone)]
pub struct AnomalyDetector {
    window_size: NonZeroUsize,
}

impl AnomalyDetector {
    /// Create a detector with the given moving-average window
    pub fn new(window_size: usize) -> Result<Self, DetectorError> {
        Ok(Self {
            window_size: validate_window(window_size)?,
        })
    }

    pub fn window_size(&self) -> usize {
        self.window_size.get()
    }

    /// Run both passes over `records`
    ///
    /// # Returns
    /// Pass-1 findings in record order, followed by Pass-2 findings in
    /// record order. Empty input yields an empty sequence.
    pub fn detect(&self, records: &[SensorRecord]) -> Result<Vec<AnomalyFinding>, DetectorError> {
        ensure_finite(records)?;

        let mut findings = scan_local(records, self.window_size);
        let local_count = findings.len();
        findings.extend(statistical_findings(records));

        debug!(
            records = records.len(),
            window_size = self.window_size(),
            local_findings = local_count,
            statistical_findings = findings.len() - local_count,
            "Anomaly detection complete"
        );

        Ok(findings)
    }
}

impl Default for AnomalyDetector {
    fn default() -> Self {
        Self {
            window_size: NonZeroUsize::new(DEFAULT_WINDOW_SIZE).unwrap_or(NonZeroUsize::MIN),
        }
    }
}

/// Pass 1: threshold and trend rules, one forward traversal
///
/// Per record the threshold rules (temperature, vibration, efficiency) are
/// evaluated before the trend rules (temperature, vibration). A zero
/// `window_size` is rejected with [`DetectorError::InvalidWindowSize`].
pub fn local_findings(
    records: &[SensorRecord],
    window_size: usize,
) -> Result<Vec<AnomalyFinding>, DetectorError> {
    Ok(scan_local(records, validate_window(window_size)?))
}

fn scan_local(records: &[SensorRecord], window_size: NonZeroUsize) -> Vec<AnomalyFinding> {
    let mut temperature_ma = MovingAverage::new(window_size);
    let mut vibration_ma = MovingAverage::new(window_size);
    let mut findings = Vec::new();

    for (index, record) in records.iter().enumerate() {
        let temperature_avg = temperature_ma.push(record.temperature_c);
        let vibration_avg = vibration_ma.push(record.vibration_mm_s);

        let checks = [
            (
                AnomalyRule::TemperatureThreshold,
                record.temperature_c > MAX_TEMPERATURE_C,
            ),
            (
                AnomalyRule::VibrationThreshold,
                record.vibration_mm_s > MAX_VIBRATION_MM_S,
            ),
            (
                AnomalyRule::EfficiencyThreshold,
                record.efficiency_percent < MIN_EFFICIENCY_PERCENT,
            ),
            (
                AnomalyRule::TemperatureTrend,
                record.temperature_c - temperature_avg > TEMPERATURE_TREND_MARGIN,
            ),
            (
                AnomalyRule::VibrationTrend,
                record.vibration_mm_s - vibration_avg > VIBRATION_TREND_MARGIN,
            ),
        ];

        findings.extend(
            checks
                .into_iter()
                .filter(|(_, fired)| *fired)
                .map(|(rule, _)| AnomalyFinding::new(rule, index, record)),
        );
    }

    findings
}

/// Pass 2: temperature values further than two sample standard deviations
/// from the dataset mean
///
/// Skipped entirely with fewer than two records.
pub fn statistical_findings(records: &[SensorRecord]) -> Vec<AnomalyFinding> {
    let Some(stats) = SampleStats::from_values(records.iter().map(|r| r.temperature_c)) else {
        return Vec::new();
    };

    debug!(
        mean = stats.mean,
        std_dev = stats.std_dev,
        "Computed temperature statistics"
    );

    records
        .iter()
        .enumerate()
        .filter(|(_, record)| stats.is_outlier(record.temperature_c, OUTLIER_STD_DEVS))
        .map(|(index, record)| AnomalyFinding::new(AnomalyRule::TemperatureOutlier, index, record))
        .collect()
}

/// Number of findings per rule, in rule order (zero counts included)
pub fn count_by_rule(findings: &[AnomalyFinding]) -> Vec<(AnomalyRule, usize)> {
    AnomalyRule::ALL
        .iter()
        .map(|rule| (*rule, findings.iter().filter(|f| f.rule == *rule).count()))
        .collect()
}

fn validate_window(window_size: usize) -> Result<NonZeroUsize, DetectorError> {
    NonZeroUsize::new(window_size).ok_or(DetectorError::InvalidWindowSize)
}

fn ensure_finite(records: &[SensorRecord]) -> Result<(), DetectorError> {
    for (index, record) in records.iter().enumerate() {
        if let Some((field, _)) = record
            .checked_fields()
            .into_iter()
            .find(|(_, value)| !value.is_finite())
        {
            return Err(DetectorError::NonFiniteValue { index, field });
        }
    }
    Ok(())
}
