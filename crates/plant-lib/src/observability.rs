//! Observability infrastructure for plant analysis runs
//!
//! Provides:
//! - Prometheus metrics (records loaded, detection latency, findings per rule)
//! - Structured logging with tracing

use crate::anomaly::{AnomalyFinding, AnomalyRule};
use crate::performance::PerformanceSummary;
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, register_int_gauge,
    Encoder, Histogram, IntCounter, IntCounterVec, IntGauge, TextEncoder,
};
use std::sync::OnceLock;
use tracing::{debug, info, warn};

/// Histogram buckets for detection latency (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<DetectionMetricsInner> = OnceLock::new();

struct DetectionMetricsInner {
    records_loaded: IntGauge,
    load_errors: IntCounter,
    detection_runs: IntCounter,
    detection_latency_seconds: Histogram,
    findings: IntCounterVec,
}

impl DetectionMetricsInner {
    fn new() -> Self {
        Self {
            records_loaded: register_int_gauge!(
                "plantwatch_records_loaded",
                "Number of sensor records in the most recent load"
            )
            .expect("Failed to register records_loaded"),

            load_errors: register_int_counter!(
                "plantwatch_load_errors_total",
                "Total number of failed record loads"
            )
            .expect("Failed to register load_errors"),

            detection_runs: register_int_counter!(
                "plantwatch_detection_runs_total",
                "Total number of completed detection runs"
            )
            .expect("Failed to register detection_runs"),

            detection_latency_seconds: register_histogram!(
                "plantwatch_detection_latency_seconds",
                "Time spent running both detection passes",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register detection_latency_seconds"),

            findings: register_int_counter_vec!(
                "plantwatch_findings_total",
                "Total number of anomaly findings by rule",
                &["rule", "parameter"]
            )
            .expect("Failed to register findings"),
        }
    }
}

/// Handle to the global detection metrics
///
/// Multiple clones share the same underlying metrics.
#[derive(Clone)]
pub struct DetectionMetrics {
    _private: (),
}

impl Default for DetectionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectionMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(DetectionMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &DetectionMetricsInner {
        GLOBAL_METRICS.get_or_init(DetectionMetricsInner::new)
    }

    pub fn set_records_loaded(&self, count: usize) {
        self.inner().records_loaded.set(count as i64);
    }

    pub fn inc_load_errors(&self) {
        self.inner().load_errors.inc();
    }

    /// Record a completed detection run and its findings
    pub fn observe_detection(&self, duration_secs: f64, findings: &[AnomalyFinding]) {
        let inner = self.inner();
        inner.detection_runs.inc();
        inner.detection_latency_seconds.observe(duration_secs);
        for finding in findings {
            inner
                .findings
                .with_label_values(&[finding.rule.as_str(), finding.parameter.as_str()])
                .inc();
        }
    }

    /// Current count of findings for `rule` across all runs
    pub fn findings_for(&self, rule: AnomalyRule) -> u64 {
        self.inner()
            .findings
            .with_label_values(&[rule.as_str(), rule.parameter().as_str()])
            .get()
    }

    /// Render all registered metrics in the Prometheus text format
    pub fn render(&self) -> prometheus::Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&prometheus::gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

/// Structured logger for analysis events
///
/// Provides consistent field names for loads, findings and summaries so
/// that JSON log output can be filtered by `event`.
#[derive(Clone)]
pub struct StructuredLogger {
    source: String,
}

impl StructuredLogger {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn log_startup(&self, version: &str, command: &str) {
        info!(
            event = "run_started",
            source = %self.source,
            version = %version,
            command = %command,
            "plantwatch started"
        );
    }

    pub fn log_records_loaded(&self, records: usize) {
        info!(
            event = "records_loaded",
            source = %self.source,
            records = records,
            "Loaded sensor records"
        );
    }

    pub fn log_load_failed(&self, error: &str) {
        warn!(
            event = "load_failed",
            source = %self.source,
            error = %error,
            "Failed to load sensor records"
        );
    }

    /// Log a single finding at debug level
    pub fn log_finding(&self, finding: &AnomalyFinding) {
        debug!(
            event = "anomaly_detected",
            source = %self.source,
            index = finding.index,
            timestamp = %finding.timestamp,
            parameter = %finding.parameter,
            rule = %finding.rule,
            value = finding.value,
            "{}",
            finding.reason
        );
    }

    pub fn log_detection_summary(&self, records: usize, window_size: usize, findings: usize) {
        if findings > 0 {
            warn!(
                event = "detection_complete",
                source = %self.source,
                records = records,
                window_size = window_size,
                findings = findings,
                "Anomalies detected"
            );
        } else {
            info!(
                event = "detection_complete",
                source = %self.source,
                records = records,
                window_size = window_size,
                findings = 0,
                "No anomalies detected"
            );
        }
    }

    pub fn log_performance_summary(&self, summary: &PerformanceSummary) {
        info!(
            event = "performance_summary",
            source = %self.source,
            records = summary.record_count,
            average_power_mw = summary.average_power_mw,
            capacity_utilization_percent = summary.capacity_utilization_percent,
            average_efficiency_percent = summary.average_efficiency_percent,
            efficiency_trend_percent = summary.efficiency_trend_percent,
            output_variance = ?summary.output_variance,
            "Computed performance summary"
        );
    }
}
