//! Power-plant sensor analysis library
//!
//! This crate provides the core functionality for:
//! - Loading time-ordered sensor records from tabular files
//! - Anomaly detection (thresholds, moving-average trends, statistical outliers)
//! - Performance summaries (capacity utilization, efficiency trend)
//! - Synthetic data generation
//! - Metrics and structured logging

pub mod anomaly;
pub mod loader;
pub mod models;
pub mod observability;
pub mod performance;
pub mod simulator;

pub use anomaly::{AnomalyDetector, AnomalyFinding, AnomalyRule, DetectorError};
pub use loader::{load_records, read_records, write_records, LoadError};
pub use models::*;
pub use observability::{DetectionMetrics, StructuredLogger};
pub use performance::{summarize, PerformanceSummary, ReportError, TrendDirection};
pub use simulator::{Frequency, PowerPlantSimulator, SimulationError};
