//! Detection rules and the findings they produce

use crate::models::{Parameter, SensorRecord};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Temperature above this is unsafe (°C)
pub const MAX_TEMPERATURE_C: f64 = 550.0;

/// Vibration above this is too high (mm/s)
pub const MAX_VIBRATION_MM_S: f64 = 3.5;

/// Efficiency below this is under the expected minimum (%)
pub const MIN_EFFICIENCY_PERCENT: f64 = 32.0;

/// Allowed upward deviation of temperature from its moving average (°C)
pub const TEMPERATURE_TREND_MARGIN: f64 = 15.0;

/// Allowed upward deviation of vibration from its moving average (mm/s)
pub const VIBRATION_TREND_MARGIN: f64 = 0.5;

/// Number of standard deviations that marks a statistical outlier
pub const OUTLIER_STD_DEVS: f64 = 2.0;

/// Strategy family a rule belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Threshold,
    Trend,
    Statistical,
}

/// The six detection rules
///
/// Variant order is the order in which rules are evaluated for a single
/// record; the statistical rule runs in its own pass afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyRule {
    TemperatureThreshold,
    VibrationThreshold,
    EfficiencyThreshold,
    TemperatureTrend,
    VibrationTrend,
    TemperatureOutlier,
}

impl AnomalyRule {
    pub const ALL: [AnomalyRule; 6] = [
        AnomalyRule::TemperatureThreshold,
        AnomalyRule::VibrationThreshold,
        AnomalyRule::EfficiencyThreshold,
        AnomalyRule::TemperatureTrend,
        AnomalyRule::VibrationTrend,
        AnomalyRule::TemperatureOutlier,
    ];

    /// Measured quantity this rule inspects
    pub fn parameter(&self) -> Parameter {
        match self {
            AnomalyRule::TemperatureThreshold
            | AnomalyRule::TemperatureTrend
            | AnomalyRule::TemperatureOutlier => Parameter::Temperature,
            AnomalyRule::VibrationThreshold | AnomalyRule::VibrationTrend => Parameter::Vibration,
            AnomalyRule::EfficiencyThreshold => Parameter::Efficiency,
        }
    }

    /// Fixed human-readable label attached to findings
    pub fn reason(&self) -> &'static str {
        match self {
            AnomalyRule::TemperatureThreshold => "Temperature exceeded safe threshold",
            AnomalyRule::VibrationThreshold => "High vibration level",
            AnomalyRule::EfficiencyThreshold => "Efficiency below expected minimum",
            AnomalyRule::TemperatureTrend => "Temperature deviating upward from moving average",
            AnomalyRule::VibrationTrend => "Vibration deviating from normal trend",
            AnomalyRule::TemperatureOutlier => "Temperature statistical outlier",
        }
    }

    pub fn kind(&self) -> RuleKind {
        match self {
            AnomalyRule::TemperatureThreshold
            | AnomalyRule::VibrationThreshold
            | AnomalyRule::EfficiencyThreshold => RuleKind::Threshold,
            AnomalyRule::TemperatureTrend | AnomalyRule::VibrationTrend => RuleKind::Trend,
            AnomalyRule::TemperatureOutlier => RuleKind::Statistical,
        }
    }

    /// Stable identifier used for metric labels and log fields
    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalyRule::TemperatureThreshold => "temperature_threshold",
            AnomalyRule::VibrationThreshold => "vibration_threshold",
            AnomalyRule::EfficiencyThreshold => "efficiency_threshold",
            AnomalyRule::TemperatureTrend => "temperature_trend",
            AnomalyRule::VibrationTrend => "vibration_trend",
            AnomalyRule::TemperatureOutlier => "temperature_outlier",
        }
    }

    /// Raw value of this rule's parameter on a record
    pub fn value_of(&self, record: &SensorRecord) -> f64 {
        match self.parameter() {
            Parameter::Temperature => record.temperature_c,
            Parameter::Vibration => record.vibration_mm_s,
            Parameter::Efficiency => record.efficiency_percent,
        }
    }
}

impl fmt::Display for AnomalyRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One detected abnormal condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyFinding {
    /// Position of the triggering record in the input sequence
    pub index: usize,
    pub timestamp: String,
    pub parameter: Parameter,
    /// Raw measured value on the triggering record
    pub value: f64,
    pub rule: AnomalyRule,
    pub reason: String,
}

impl AnomalyFinding {
    /// Build the finding `rule` raises for `record` at `index`
    pub fn new(rule: AnomalyRule, index: usize, record: &SensorRecord) -> Self {
        Self {
            index,
            timestamp: record.timestamp.clone(),
            parameter: rule.parameter(),
            value: rule.value_of(record),
            rule,
            reason: rule.reason().to_string(),
        }
    }
}
