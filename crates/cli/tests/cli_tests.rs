//! CLI integration tests

use serde_json::Value;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const SCENARIO: &str = "\
timestamp,power_output_mw,temperature_c,pressure_bar,vibration_mm_s,efficiency_percent
2025-01-01 00:00:00,800.0,500.0,165.0,1.0,40.0
2025-01-01 01:00:00,805.0,560.0,165.0,1.0,40.0
2025-01-01 02:00:00,810.0,520.0,165.0,4.0,40.0
2025-01-01 03:00:00,815.0,520.0,165.0,1.0,20.0
";

fn plantwatch(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_plantwatch"))
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("PLANTWATCH_CONFIG")
        .env_remove("PLANTWATCH_WINDOW_SIZE")
        .env_remove("PLANTWATCH_DATA_PATH")
        .output()
        .expect("Failed to execute command")
}

fn write_scenario(dir: &Path) -> String {
    let path = dir.join("scenario.csv");
    std::fs::write(&path, SCENARIO).unwrap();
    path.to_string_lossy().into_owned()
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = plantwatch(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(stdout.contains("Power plant sensor anomaly detection"));
    assert!(stdout.contains("simulate"), "Should show simulate command");
    assert!(stdout.contains("detect"), "Should show detect command");
    assert!(stdout.contains("summary"), "Should show summary command");
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let output = plantwatch(&["--version"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("plantwatch"), "Should show binary name");
}

#[test]
fn test_detect_help() {
    let output = plantwatch(&["detect", "--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("--input"));
    assert!(stdout.contains("--window-size"));
    assert!(stdout.contains("--limit"));
}

#[test]
fn test_detect_scenario_json() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_scenario(temp_dir.path());

    let output = plantwatch(&["--format", "json", "detect", "--input", &input]);
    assert!(output.status.success(), "detect should succeed");

    let report = stdout_json(&output);
    assert_eq!(report["records"], 4);
    assert_eq!(report["window_size"], 5);
    assert_eq!(report["total"], 5);
    assert_eq!(report["by_rule"]["temperature_outlier"], 0);

    let findings = report["findings"].as_array().unwrap();
    let rules: Vec<(&str, u64)> = findings
        .iter()
        .map(|f| (f["rule"].as_str().unwrap(), f["index"].as_u64().unwrap()))
        .collect();
    assert_eq!(
        rules,
        vec![
            ("temperature_threshold", 1),
            ("temperature_trend", 1),
            ("vibration_threshold", 2),
            ("vibration_trend", 2),
            ("efficiency_threshold", 3),
        ]
    );
    assert_eq!(findings[0]["timestamp"], "2025-01-01 01:00:00");
    assert_eq!(findings[0]["reason"], "Temperature exceeded safe threshold");
}

#[test]
fn test_detect_window_size_flag() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_scenario(temp_dir.path());

    // A window of one never deviates from its own average
    let output = plantwatch(&["-f", "json", "detect", "-i", &input, "--window-size", "1"]);
    assert!(output.status.success());

    let report = stdout_json(&output);
    assert_eq!(report["window_size"], 1);
    assert_eq!(report["total"], 3);
}

#[test]
fn test_detect_rejects_zero_window() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_scenario(temp_dir.path());

    let output = plantwatch(&["detect", "--input", &input, "--window-size", "0"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("window size"));
}

#[test]
fn test_detect_missing_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing.csv");

    let output = plantwatch(&["detect", "--input", missing.to_str().unwrap()]);
    assert!(!output.status.success(), "missing input should fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not found"));
}

#[test]
fn test_detect_malformed_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bad.csv");
    std::fs::write(
        &path,
        "timestamp,power_output_mw,temperature_c,pressure_bar,vibration_mm_s,efficiency_percent\n\
         t0,800.0,n/a,165.0,1.0,40.0\n",
    )
    .unwrap();

    let output = plantwatch(&["detect", "--input", path.to_str().unwrap()]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("malformed input at line 2"));
}

#[test]
fn test_detect_table_output() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_scenario(temp_dir.path());

    let output = plantwatch(&["detect", "--input", &input, "--limit", "2"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Total anomalies detected"));
    assert!(stdout.contains("Showing first 2 of 5 findings"));
}

#[test]
fn test_detect_prints_metrics() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_scenario(temp_dir.path());

    let output = plantwatch(&["-f", "json", "detect", "-i", &input, "--metrics"]);
    assert!(output.status.success());

    // stdout stays a single JSON document
    assert_eq!(stdout_json(&output)["total"], 5);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("plantwatch_findings_total"));
    assert!(stderr.contains("plantwatch_records_loaded 4"));
}

#[test]
fn test_detect_huge_window_on_empty_input() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("empty.csv");
    std::fs::write(
        &path,
        "timestamp,power_output_mw,temperature_c,pressure_bar,vibration_mm_s,efficiency_percent\n",
    )
    .unwrap();

    let output = plantwatch(&[
        "-f",
        "json",
        "detect",
        "-i",
        path.to_str().unwrap(),
        "--window-size",
        "1000000000000",
    ]);
    assert!(output.status.success(), "huge window should not fail");

    let report = stdout_json(&output);
    assert_eq!(report["records"], 0);
    assert_eq!(report["total"], 0);
}

#[test]
fn test_simulate_then_detect_and_summarize() {
    let temp_dir = TempDir::new().unwrap();
    let data = temp_dir.path().join("data").join("simulated_sensor_data.csv");
    let data = data.to_str().unwrap();

    let output = plantwatch(&[
        "-f", "json", "simulate", "--output", data, "--periods", "48", "--seed", "7",
    ]);
    assert!(output.status.success(), "simulate should succeed");
    let report = stdout_json(&output);
    assert_eq!(report["records"], 48);
    assert_eq!(report["first_timestamp"], "2025-01-01 00:00:00");
    assert_eq!(report["last_timestamp"], "2025-01-02 23:00:00");

    let output = plantwatch(&["-f", "json", "detect", "--input", data]);
    assert!(output.status.success(), "detect should succeed");
    assert_eq!(stdout_json(&output)["records"], 48);

    let output = plantwatch(&["-f", "json", "summary", "--input", data]);
    assert!(output.status.success(), "summary should succeed");
    let summary = stdout_json(&output);
    assert_eq!(summary["record_count"], 48);
    let utilization = summary["capacity_utilization_percent"].as_f64().unwrap();
    assert!((40.0..=100.0).contains(&utilization));
}

#[test]
fn test_simulate_is_reproducible_with_seed() {
    let temp_dir = TempDir::new().unwrap();
    let first = temp_dir.path().join("a.csv");
    let second = temp_dir.path().join("b.csv");

    for path in [&first, &second] {
        let output = plantwatch(&[
            "simulate",
            "--output",
            path.to_str().unwrap(),
            "--periods",
            "12",
            "--frequency",
            "daily",
            "--seed",
            "21",
        ]);
        assert!(output.status.success());
    }

    assert_eq!(
        std::fs::read_to_string(&first).unwrap(),
        std::fs::read_to_string(&second).unwrap()
    );
}

#[test]
fn test_summary_scenario() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_scenario(temp_dir.path());

    let output = plantwatch(&["-f", "json", "summary", "--input", &input, "--max-capacity", "2000"]);
    assert!(output.status.success());

    let summary = stdout_json(&output);
    assert_eq!(summary["average_power_mw"], 807.5);
    assert_eq!(summary["average_efficiency_percent"], 35.0);
    // early = first record (40), late = last record (20)
    assert_eq!(summary["efficiency_trend_percent"], -20.0);
    let utilization = summary["capacity_utilization_percent"].as_f64().unwrap();
    assert!((utilization - 40.375).abs() < 1e-9);
}

#[test]
fn test_window_size_from_environment() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_scenario(temp_dir.path());

    let output = Command::new(env!("CARGO_BIN_EXE_plantwatch"))
        .args(["-f", "json", "detect", "--input", &input])
        .env_remove("RUST_LOG")
        .env("PLANTWATCH_WINDOW_SIZE", "1")
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success());

    assert_eq!(stdout_json(&output)["window_size"], 1);
}
