//! End-to-end pipeline tests over files on disk

use etl_lib::sink::read_records;
use etl_lib::{
    FileLedger, JsonDirSource, JsonLinesSink, MetricValue, Pipeline, PipelineMetrics,
    ProcessedLedger,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const CONFIG_DOC: &str = r#"{
    "_id": "cfg-0001",
    "routers": {
        "10.0.0.1": {
            "Measure_Time": {
                "2024-01-01 10:00:00": {
                    "Time": "10:00:00",
                    "eth0.1": "Uplink",
                    "eth1.2": "Backup"
                }
            }
        }
    }
}"#;

const TRAFFIC_DOC: &str = r#"{
    "_id": {"$oid": "65f0c0ffee"},
    "routers": {
        "10.0.0.1": {
            "Measure_Time": {
                "2024-01-01 10:00:00": {
                    "Time": "10:00:00",
                    "IP-MIB-ipIfStatsInOctets.IPv4.1": 100,
                    "IP-MIB-ipIfStatsInOctets.IPv4.2": "0",
                    "IP-MIB-ipIfStatsOutOctets.IPv6.2": "42",
                    "IP-MIB-ipSystemStatsInReceives.IPv4": 50
                }
            }
        }
    }
}"#;

fn write_inputs(dir: &Path) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join("Config_0001.json"), CONFIG_DOC).unwrap();
    fs::write(dir.join("Stat_0001.json"), TRAFFIC_DOC).unwrap();
}

fn file_pipeline(root: &Path) -> Pipeline<JsonDirSource, JsonLinesSink, FileLedger> {
    Pipeline::new(
        JsonDirSource::new(root.join("ingested")),
        JsonLinesSink::new(root.join("out").join("metrics.jsonl")),
        FileLedger::open(root.join("processed_documents.txt")).unwrap(),
        PipelineMetrics::new().unwrap(),
    )
}

#[test]
fn test_file_backed_pass_writes_records_and_ledger() {
    let root = TempDir::new().unwrap();
    write_inputs(&root.path().join("ingested"));

    let mut pipeline = file_pipeline(root.path());
    let reports = pipeline.run_until_idle(5).unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].pairs_matched, 1);

    let records = read_records(&root.path().join("out").join("metrics.jsonl")).unwrap();
    // The zero-valued IPv4 counter on interface 2 is dropped
    assert_eq!(records.len(), 2);

    let uplink = &records[0];
    assert_eq!(uplink.interface_id, 1);
    assert_eq!(uplink.interface_name.as_deref(), Some("eth0"));
    assert_eq!(uplink.protocol_version, "IPv4");
    assert_eq!(uplink.label, "IP System Inbound Receives");
    assert_eq!(uplink.value, MetricValue::Int(150));

    // IPv6 group has no general counter, so the value is unchanged
    let backup = &records[1];
    assert_eq!(backup.interface_id, 2);
    assert_eq!(backup.interface_description.as_deref(), Some("Backup"));
    assert_eq!(backup.protocol_version, "IPv6");
    assert_eq!(backup.value, MetricValue::Int(42));

    let ledger = fs::read_to_string(root.path().join("processed_documents.txt")).unwrap();
    assert_eq!(ledger, "cfg-0001\n65f0c0ffee\n");
}

#[test]
fn test_rerun_over_same_files_adds_nothing() {
    let root = TempDir::new().unwrap();
    write_inputs(&root.path().join("ingested"));

    file_pipeline(root.path()).run_until_idle(5).unwrap();
    let out = root.path().join("out").join("metrics.jsonl");
    let first = fs::read_to_string(&out).unwrap();

    // A fresh process reads the ledger left behind by the first one
    let mut second = file_pipeline(root.path());
    assert!(second.ledger().is_processed("cfg-0001"));
    let reports = second.run_until_idle(5).unwrap();
    assert_eq!(reports.len(), 1);
    assert!(reports[0].is_idle());
    assert_eq!(reports[0].configs_skipped, 1);

    assert_eq!(fs::read_to_string(&out).unwrap(), first);
}

#[test]
fn test_malformed_document_is_skipped_and_reported() {
    let root = TempDir::new().unwrap();
    let ingested = root.path().join("ingested");
    write_inputs(&ingested);
    fs::write(ingested.join("Stat_0002.json"), r#"{"_id": "broken"}"#).unwrap();

    let mut pipeline = file_pipeline(root.path());
    let report = pipeline.run_pass().unwrap();

    assert_eq!(report.configs_marked, 1);
    assert_eq!(report.malformed.len(), 1);
    assert_eq!(report.malformed[0].snapshot_id, "Stat_0002");

    let metrics = pipeline.metrics().encode_text().unwrap();
    assert!(metrics.contains("router_etl_malformed_snapshots_total 1"));
    assert!(metrics.contains("router_etl_ledger_entries 2"));
}

#[test]
fn test_missing_input_directory_fails_the_pass() {
    let root = TempDir::new().unwrap();
    let mut pipeline = file_pipeline(root.path());
    assert!(pipeline.run_pass().is_err());
}
