//! Merged record browsing

use anyhow::{Context, Result};
use etl_lib::sink::read_records;
use etl_lib::MergedMetricRecord;
use std::path::Path;
use tabled::Tabled;

use crate::output::{format_interface_id, format_optional, print_table, OutputFormat};

/// Row for merged records table
#[derive(Tabled)]
struct RecordRow {
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Interface")]
    interface_id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Protocol")]
    protocol: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Value")]
    value: String,
}

impl From<&MergedMetricRecord> for RecordRow {
    fn from(record: &MergedMetricRecord) -> Self {
        Self {
            device: record.device.clone(),
            date: record.measure_date.clone(),
            time: record.measure_time.clone(),
            interface_id: format_interface_id(record.interface_id),
            name: format_optional(record.interface_name.as_deref()),
            description: format_optional(record.interface_description.as_deref()),
            protocol: record.protocol_version.clone(),
            label: record.label.clone(),
            value: record.value.to_string(),
        }
    }
}

/// Show merged records, optionally for one device only
pub fn show_records(
    file: &Path,
    device: Option<&str>,
    limit: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    let records = read_records(file)
        .with_context(|| format!("Failed to read records from {}", file.display()))?;

    let selected: Vec<MergedMetricRecord> = records
        .into_iter()
        .filter(|r| device.map_or(true, |d| r.device == d))
        .take(limit.unwrap_or(usize::MAX))
        .collect();

    let rows: Vec<RecordRow> = selected.iter().map(RecordRow::from).collect();
    print_table(rows, &selected, format)
}
