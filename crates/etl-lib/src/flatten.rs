//! Snapshot flattening
//!
//! Turns nested configuration and traffic snapshots into flat rows that the
//! merger can join.

use crate::codec;
use crate::error::{EtlError, Result};
use crate::models::{ConfigSnapshot, FlatConfigRow, FlatStatRow, MetricValue, TrafficSnapshot, TIME_KEY};

/// Split `"YYYY-MM-DD HH:MM:SS"` into date and time-of-day on the first space.
///
/// Returns `None` when the timestamp has no space.
pub fn split_timestamp(timestamp: &str) -> Option<(&str, &str)> {
    timestamp.split_once(' ')
}

/// Flatten every statistic of a traffic snapshot.
///
/// The `Time` entry is skipped. A value that is neither a number nor a
/// numeric string, or a timestamp without a time-of-day, fails the whole
/// snapshot with [`EtlError::MalformedSnapshot`].
pub fn flatten_traffic(snapshot: &TrafficSnapshot) -> Result<Vec<FlatStatRow>> {
    let mut rows = Vec::new();

    for (device, entry) in &snapshot.routers {
        for (timestamp, stats) in &entry.measure_time {
            let (measure_date, measure_time) = split_timestamp(timestamp).ok_or_else(|| {
                EtlError::malformed(
                    &snapshot.id,
                    format!("device {} timestamp {:?} has no time of day", device, timestamp),
                )
            })?;

            for (name, raw) in stats {
                if name == TIME_KEY {
                    continue;
                }

                let value = MetricValue::from_json(raw).ok_or_else(|| {
                    EtlError::malformed(
                        &snapshot.id,
                        format!(
                            "device {} timestamp {} metric {} has non-numeric value {}",
                            device, timestamp, name, raw
                        ),
                    )
                })?;

                let decoded = codec::decode(name);
                rows.push(FlatStatRow {
                    device: device.clone(),
                    measure_date: measure_date.to_string(),
                    measure_time: measure_time.to_string(),
                    protocol_version: decoded.protocol_version,
                    stat_description: decoded.stat_description,
                    label: decoded.label,
                    interface_id: decoded.interface_id,
                    value,
                });
            }
        }
    }

    tracing::debug!(
        snapshot_id = %snapshot.id,
        rows = rows.len(),
        "Flattened traffic snapshot"
    );
    Ok(rows)
}

/// Flatten every interface of a configuration snapshot.
///
/// Only the date part of the timestamp is kept.
pub fn flatten_config(snapshot: &ConfigSnapshot) -> Vec<FlatConfigRow> {
    let mut rows = Vec::new();

    for (device, entry) in &snapshot.routers {
        for (timestamp, interfaces) in entry.timestamps() {
            let measure_date = split_timestamp(timestamp)
                .map(|(date, _)| date)
                .unwrap_or(timestamp.as_str());

            for (interface, description) in interfaces {
                if interface == TIME_KEY {
                    continue;
                }

                rows.push(FlatConfigRow {
                    device: device.clone(),
                    interface_id: codec::extract_interface_id(interface),
                    interface_name: codec::interface_name(interface).to_string(),
                    interface_description: description.clone(),
                    measure_date: measure_date.to_string(),
                });
            }
        }
    }

    tracing::debug!(
        snapshot_id = %snapshot.id,
        rows = rows.len(),
        "Flattened config snapshot"
    );
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TS: &str = "2024-01-01 10:00:00";

    #[test]
    fn test_split_timestamp() {
        assert_eq!(split_timestamp(TS), Some(("2024-01-01", "10:00:00")));
        assert_eq!(
            split_timestamp("2024-01-01 10:00:00 UTC"),
            Some(("2024-01-01", "10:00:00 UTC"))
        );
        assert_eq!(split_timestamp("2024-01-01"), None);
    }

    #[test]
    fn test_flatten_traffic() {
        let snapshot = TrafficSnapshot::new("t-1")
            .with_stat("10.0.0.1", TS, "Time", "10:00:00")
            .with_stat("10.0.0.1", TS, "IP-MIB-ipIfStatsInOctets.IPv4.1", 100)
            .with_stat("10.0.0.1", TS, "IP-MIB-ipIfStatsInOctets.IPv4", "50");

        let rows = flatten_traffic(&snapshot).unwrap();
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].device, "10.0.0.1");
        assert_eq!(rows[0].measure_date, "2024-01-01");
        assert_eq!(rows[0].measure_time, "10:00:00");
        assert_eq!(rows[0].interface_id, 1);
        assert_eq!(rows[0].protocol_version, "IPv4");
        assert_eq!(rows[0].stat_description, "IP-MIB-ipIfStatsInOctets");
        assert_eq!(rows[0].label, "IP Interface Inbound Octets");
        assert_eq!(rows[0].value, MetricValue::Int(100));

        assert_eq!(rows[1].interface_id, 0);
        assert_eq!(rows[1].value, MetricValue::Int(50));
    }

    #[test]
    fn test_flatten_traffic_rejects_non_numeric_value() {
        let snapshot = TrafficSnapshot::new("t-bad").with_stat(
            "10.0.0.1",
            TS,
            "IP-MIB-ipIfStatsInOctets.IPv4.1",
            json!("lots"),
        );

        let err = flatten_traffic(&snapshot).unwrap_err();
        match err {
            EtlError::MalformedSnapshot {
                snapshot_id,
                reason,
            } => {
                assert_eq!(snapshot_id, "t-bad");
                assert!(reason.contains("IP-MIB-ipIfStatsInOctets.IPv4.1"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_flatten_traffic_rejects_timestamp_without_time() {
        let snapshot =
            TrafficSnapshot::new("t-2").with_stat("10.0.0.1", "2024-01-01", "X.IPv4", 1);
        assert!(flatten_traffic(&snapshot).is_err());
    }

    #[test]
    fn test_flatten_traffic_empty_device() {
        let snapshot = TrafficSnapshot::new("t-3").with_device("10.0.0.1");
        assert!(flatten_traffic(&snapshot).unwrap().is_empty());
    }

    #[test]
    fn test_flatten_config() {
        let snapshot = ConfigSnapshot::new("c-1")
            .with_interface("10.0.0.1", TS, "Time", "10:00:00")
            .with_interface("10.0.0.1", TS, "eth0.1", "Uplink")
            .with_interface("10.0.0.1", TS, "Loopback0", "Management");

        let rows = flatten_config(&snapshot);
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].interface_id, 1);
        assert_eq!(rows[0].interface_name, "eth0");
        assert_eq!(rows[0].interface_description, "Uplink");
        assert_eq!(rows[0].measure_date, "2024-01-01");

        assert_eq!(rows[1].interface_id, 0);
        assert_eq!(rows[1].interface_name, "Loopback0");
    }

    #[test]
    fn test_flatten_config_visits_every_timestamp() {
        let snapshot = ConfigSnapshot::new("c-2")
            .with_interface("10.0.0.1", TS, "eth0.1", "Uplink")
            .with_interface("10.0.0.1", "2024-01-02 10:00:00", "eth0.1", "Uplink v2");

        let rows = flatten_config(&snapshot);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].measure_date, "2024-01-02");
    }
}
