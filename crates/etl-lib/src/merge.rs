//! Record merging
//!
//! Joins flattened traffic rows with flattened configuration rows, then folds
//! device-wide ("general") counters into every interface counter of the same
//! group:
//!
//! 1. left join on (device, interface id); unmatched rows keep no name
//! 2. interface 0 rows are named and described `General`
//! 3. zero-valued rows are dropped, general rows included
//! 4. rows are grouped by (protocol version, date, time, device)
//! 5. each interface row takes the label of, and adds the value of, every
//!    general row of its group; general rows are not emitted on their own

use crate::codec::GENERAL_INTERFACE_ID;
use crate::models::{FlatConfigRow, FlatStatRow, MergedMetricRecord, MetricValue, GENERAL_LABEL};
use indexmap::IndexMap;
use std::collections::HashMap;
use tracing::debug;

/// A traffic row with the interface name and description joined in
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedRow {
    pub stat: FlatStatRow,
    pub interface_name: Option<String>,
    pub interface_description: Option<String>,
}

impl JoinedRow {
    pub fn is_general(&self) -> bool {
        self.stat.interface_id == GENERAL_INTERFACE_ID
    }

    fn group_key(&self) -> GroupKey<'_> {
        GroupKey {
            protocol_version: &self.stat.protocol_version,
            measure_date: &self.stat.measure_date,
            measure_time: &self.stat.measure_time,
            device: &self.stat.device,
        }
    }

    fn into_record(self) -> MergedMetricRecord {
        MergedMetricRecord {
            device: self.stat.device,
            measure_date: self.stat.measure_date,
            measure_time: self.stat.measure_time,
            interface_id: self.stat.interface_id,
            interface_name: self.interface_name,
            interface_description: self.interface_description,
            protocol_version: self.stat.protocol_version,
            label: self.stat.label,
            value: self.stat.value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct GroupKey<'a> {
    protocol_version: &'a str,
    measure_date: &'a str,
    measure_time: &'a str,
    device: &'a str,
}

/// Left-join traffic rows with configuration rows on (device, interface id).
///
/// A traffic row matching several configuration rows is repeated once per
/// match, in configuration order. Interface 0 rows always end up named
/// `General`.
pub fn join(stats: Vec<FlatStatRow>, configs: &[FlatConfigRow]) -> Vec<JoinedRow> {
    let mut by_interface: HashMap<(String, u64), Vec<&FlatConfigRow>> = HashMap::new();
    for row in configs {
        by_interface
            .entry((row.device.clone(), row.interface_id))
            .or_default()
            .push(row);
    }

    let mut joined = Vec::with_capacity(stats.len());
    for stat in stats {
        let key = (stat.device.clone(), stat.interface_id);
        let matches = by_interface.get(&key).map(Vec::as_slice).unwrap_or(&[]);

        match matches {
            [] => joined.push(JoinedRow {
                stat,
                interface_name: None,
                interface_description: None,
            }),
            [only] => joined.push(JoinedRow {
                stat,
                interface_name: Some(only.interface_name.clone()),
                interface_description: Some(only.interface_description.clone()),
            }),
            many => {
                for config in many {
                    joined.push(JoinedRow {
                        stat: stat.clone(),
                        interface_name: Some(config.interface_name.clone()),
                        interface_description: Some(config.interface_description.clone()),
                    });
                }
            }
        }
    }

    for row in joined.iter_mut().filter(|row| row.is_general()) {
        row.interface_name = Some(GENERAL_LABEL.to_string());
        row.interface_description = Some(GENERAL_LABEL.to_string());
    }

    joined
}

/// Fold general rows into interface rows and emit one record per interface row.
pub fn aggregate(rows: Vec<JoinedRow>) -> Vec<MergedMetricRecord> {
    let total = rows.len();
    let rows: Vec<JoinedRow> = rows.into_iter().filter(|r| !r.stat.value.is_zero()).collect();
    let dropped = total - rows.len();

    // Group members as indices so keys can borrow from `rows`
    let mut groups: IndexMap<GroupKey<'_>, (Vec<usize>, Vec<usize>)> = IndexMap::new();
    for (i, row) in rows.iter().enumerate() {
        let (general, interfaces) = groups.entry(row.group_key()).or_default();
        if row.is_general() {
            general.push(i);
        } else {
            interfaces.push(i);
        }
    }

    let mut folded: Vec<(usize, String, MetricValue)> = Vec::new();
    for (general, interfaces) in groups.values() {
        for &i in interfaces {
            let mut label = rows[i].stat.label.clone();
            let mut value = rows[i].stat.value;
            for &g in general {
                label.clone_from(&rows[g].stat.label);
                value += rows[g].stat.value;
            }
            folded.push((i, label, value));
        }
    }
    let group_count = groups.len();
    drop(groups);

    let mut slots: Vec<Option<JoinedRow>> = rows.into_iter().map(Some).collect();
    let records: Vec<MergedMetricRecord> = folded
        .into_iter()
        .filter_map(|(i, label, value)| {
            let mut row = slots[i].take()?;
            row.stat.label = label;
            row.stat.value = value;
            Some(row.into_record())
        })
        .collect();

    debug!(
        rows = total,
        zero_rows_dropped = dropped,
        groups = group_count,
        records = records.len(),
        "Aggregated joined rows"
    );
    records
}

/// Join and aggregate in one step
pub fn merge(stats: Vec<FlatStatRow>, configs: &[FlatConfigRow]) -> Vec<MergedMetricRecord> {
    aggregate(join(stats, configs))
}
