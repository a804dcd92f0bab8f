//! Core data models for plant sensor analysis

use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp format written by the simulator and expected by consumers
/// that parse timestamps as instants
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One sensor observation at one instant
///
/// Field names double as the header names of the tabular format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorRecord {
    /// Opaque ordering key, carried through untouched
    pub timestamp: String,
    pub power_output_mw: f64,
    pub temperature_c: f64,
    pub pressure_bar: f64,
    pub vibration_mm_s: f64,
    pub efficiency_percent: f64,
}

impl SensorRecord {
    /// Name and value of each field the detector reads, in rule order
    pub(crate) fn checked_fields(&self) -> [(&'static str, f64); 3] {
        [
            ("temperature_c", self.temperature_c),
            ("vibration_mm_s", self.vibration_mm_s),
            ("efficiency_percent", self.efficiency_percent),
        ]
    }
}

/// Measured quantity that triggered a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parameter {
    Temperature,
    Vibration,
    Efficiency,
}

impl Parameter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Parameter::Temperature => "temperature",
            Parameter::Vibration => "vibration",
            Parameter::Efficiency => "efficiency",
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
