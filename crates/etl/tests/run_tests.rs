//! Integration tests running the router-etl binary against a temp directory

use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn write_snapshots(input: &Path) {
    fs::create_dir_all(input).unwrap();
    fs::write(
        input.join("Config_a.json"),
        r#"{"_id": "cfg-a", "routers": {"192.168.1.1": {"2024-03-05 08:30:00": {"ge-0/0/1.7": "Core link"}}}}"#,
    )
    .unwrap();
    fs::write(
        input.join("Stat_a.json"),
        r#"{"_id": "stat-a", "routers": {"192.168.1.1": {"Measure_Time": {"2024-03-05 08:30:00": {
            "Time": "08:30:00",
            "IP-MIB-ipIfStatsHCInOctets.IPv4.7": 1000,
            "IP-MIB-ipSystemStatsHCInOctets.IPv4": 24
        }}}}}"#,
    )
    .unwrap();
}

fn run_etl(root: &Path, extra_args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_router-etl"))
        .args(extra_args)
        .env("ETL_INPUT_DIR", root.join("ingested"))
        .env("ETL_LEDGER_PATH", root.join("processed.txt"))
        .env("ETL_OUTPUT_PATH", root.join("metrics.jsonl"))
        .env("ETL_METRICS_PATH", root.join("metrics.prom"))
        .env_remove("ETL_CONFIG")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute router-etl")
}

#[test]
fn test_run_merges_and_prints_summary() {
    let root = TempDir::new().unwrap();
    write_snapshots(&root.path().join("ingested"));

    let output = run_etl(root.path(), &["--log-format", "pretty"]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let summary: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["records_written"], 1);
    assert_eq!(summary["configs_marked"], 1);
    assert_eq!(summary["passes"], 2);

    let line = fs::read_to_string(root.path().join("metrics.jsonl")).unwrap();
    let record: Value = serde_json::from_str(line.trim()).unwrap();
    assert_eq!(record["IP_Address"], "192.168.1.1");
    assert_eq!(record["Interface_ID"], 7);
    assert_eq!(record["Interface_Name"], "ge-0/0/1");
    assert_eq!(record["Stat_Value"], 1024);

    let metrics = fs::read_to_string(root.path().join("metrics.prom")).unwrap();
    assert!(metrics.contains("router_etl_records_written_total 1"));
}

#[test]
fn test_second_run_is_idempotent() {
    let root = TempDir::new().unwrap();
    write_snapshots(&root.path().join("ingested"));

    assert!(run_etl(root.path(), &[]).status.success());
    let output = run_etl(root.path(), &[]);
    assert!(output.status.success());

    let summary: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["records_written"], 0);

    let lines = fs::read_to_string(root.path().join("metrics.jsonl")).unwrap();
    assert_eq!(lines.lines().count(), 1);
}

#[test]
fn test_zero_max_passes_is_rejected() {
    let root = TempDir::new().unwrap();
    write_snapshots(&root.path().join("ingested"));

    let output = run_etl(root.path(), &["--max-passes", "0"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("max_passes"));
}

#[test]
fn test_missing_input_directory_fails() {
    let root = TempDir::new().unwrap();

    let output = run_etl(root.path(), &[]);
    assert!(!output.status.success());
    assert!(!root.path().join("metrics.jsonl").exists());
}
