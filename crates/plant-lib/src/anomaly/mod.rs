//! Anomaly detection for plant sensor records
//!
//! Three complementary strategies run over a fully loaded record sequence:
//! - Absolute thresholds on temperature, vibration and efficiency
//! - Local trend deviation against a trailing moving average
//! - Dataset-wide statistical outliers on temperature

mod detector;
mod moving_average;
mod rules;
mod stats;


pub use detector::{
    count_by_rule, local_findings, statistical_findings, AnomalyDetector, DetectorError,
    DEFAULT_WINDOW_SIZE,
};
pub use moving_average::MovingAverage;
pub use rules::{
    AnomalyFinding, AnomalyRule, RuleKind, MAX_TEMPERATURE_C, MAX_VIBRATION_MM_S,
    MIN_EFFICIENCY_PERCENT, OUTLIER_STD_DEVS, TEMPERATURE_TREND_MARGIN, VIBRATION_TREND_MARGIN,
};
pub use stats::SampleStats;
