//! End-to-end tests driving the `bs` binary against a temporary database.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

fn bs_binary() -> String {
    env!("CARGO_BIN_EXE_bs").to_string()
}

/// Write a config file pointing at a database inside `temp`.
fn write_config(temp: &Path) -> PathBuf {
    let config_path = temp.join("config.toml");
    let db_path = temp.join("data").join("bs.db");
    std::fs::write(
        &config_path,
        format!(
            "database_path = {:?}\nuser_id = \"alice\"\n",
            db_path.display().to_string()
        ),
    )
    .unwrap();
    config_path
}

fn bs(temp: &Path, config: &Path, args: &[&str]) -> Output {
    Command::new(bs_binary())
        .env("HOME", temp)
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(config)
        .args(args)
        .output()
        .expect("failed to run bs")
}

fn stdout_of(output: &Output) -> String {
    assert!(
        output.status.success(),
        "bs should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn record_sample(temp: &Path, config: &Path) {
    let at = "2025-01-01T08:00:00Z";
    for args in [
        ["record", "weight", "80", "--at", at],
        ["record", "height", "180", "--at", at],
        ["record", "body-fat", "15", "--at", at],
    ] {
        let output = stdout_of(&bs(temp, config, &args));
        assert!(output.starts_with("Recorded "), "unexpected output: {output}");
    }
}

#[test]
fn test_record_then_show() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());
    record_sample(temp.path(), &config);

    let output = stdout_of(&bs(temp.path(), &config, &["show"]));
    assert!(output.starts_with("Body statistics for alice\n"));
    assert!(output.contains("Bodyweight: 80.00 kg (2025-01-01 08:00:00 UTC)"));
    assert!(output.contains("BMI:        24.69"));
    assert!(output.contains("FFMI:       21.03"));
}

#[test]
fn test_duplicate_moment_is_reported() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());
    record_sample(temp.path(), &config);

    let output = stdout_of(&bs(
        temp.path(),
        &config,
        &["record", "weight", "82", "--at", "2025-01-01T08:00:00Z"],
    ));
    assert!(output.contains("already exists"), "unexpected output: {output}");
}

#[test]
fn test_invalid_value_fails() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());

    let output = bs(temp.path(), &config, &["record", "weight", "heavy"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("bodyweight must be a number"), "stderr: {stderr}");

    let output = bs(temp.path(), &config, &["record", "body-fat", "-5"]);
    assert!(!output.status.success());
}

#[test]
fn test_history_json_lines() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());
    record_sample(temp.path(), &config);
    stdout_of(&bs(
        temp.path(),
        &config,
        &["record", "weight", "79.5", "--at", "2025-01-02T08:00:00Z"],
    ));

    let output = stdout_of(&bs(
        temp.path(),
        &config,
        &["history", "weight", "--json", "--unit", "lbs"],
    ));
    let rows: Vec<Value> = output
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["moment"], "2025-01-01T08:00:00Z");
    assert_eq!(rows[1]["unit"], "lbs");
}

#[test]
fn test_export_is_json() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());
    record_sample(temp.path(), &config);

    let output = stdout_of(&bs(temp.path(), &config, &["export"]));
    let document: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(document["bodyweight"].as_array().map(Vec::len), Some(1));
    assert_eq!(document["bfPercent"][0]["value"], 15.0);
}

#[test]
fn test_status_lists_current_user() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());
    record_sample(temp.path(), &config);

    let output = stdout_of(&bs(temp.path(), &config, &["status"]));
    assert!(output.contains("- alice (current): last saved"));
}

#[test]
fn test_switching_to_minute_granularity_keeps_history() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());
    for at in ["2025-01-01T08:00:00Z", "2025-01-01T08:00:20Z", "2025-01-01T08:00:40Z"] {
        stdout_of(&bs(temp.path(), &config, &["record", "weight", "80", "--at", at]));
    }

    let existing = std::fs::read_to_string(&config).unwrap();
    std::fs::write(&config, format!("{existing}granularity = \"minutes\"\n")).unwrap();

    let output = stdout_of(&bs(
        temp.path(),
        &config,
        &["record", "weight", "81", "--at", "2025-01-01T08:00:50Z"],
    ));
    assert!(output.contains("already exists"), "unexpected output: {output}");
    stdout_of(&bs(
        temp.path(),
        &config,
        &["record", "weight", "81", "--at", "2025-01-01T09:00:00Z"],
    ));

    let output = stdout_of(&bs(temp.path(), &config, &["export"]));
    let document: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(document["bodyweight"].as_array().map(Vec::len), Some(4));
}
