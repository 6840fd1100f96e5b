//! Metric name decoding

use anyhow::Result;
use etl_lib::codec::{self, MetricName};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{format_interface_id, print_table, OutputFormat};

/// Row for decoded names table
#[derive(Tabled)]
struct DecodedRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Interface")]
    interface_id: String,
    #[tabled(rename = "Protocol")]
    protocol_version: String,
    #[tabled(rename = "Description")]
    stat_description: String,
    #[tabled(rename = "Label")]
    label: String,
}

#[derive(Serialize)]
struct DecodedName<'a> {
    name: &'a str,
    #[serde(flatten)]
    decoded: MetricName,
    mapped: bool,
}

/// Decode each compound metric name
pub fn decode_names(names: &[String], format: OutputFormat) -> Result<()> {
    let decoded: Vec<DecodedName<'_>> = names
        .iter()
        .map(|name| {
            let decoded = codec::decode(name);
            let mapped = codec::lookup(&decoded.stat_description).is_some();
            DecodedName {
                name,
                decoded,
                mapped,
            }
        })
        .collect();

    let rows: Vec<DecodedRow> = decoded
        .iter()
        .map(|d| DecodedRow {
            name: d.name.to_string(),
            interface_id: format_interface_id(d.decoded.interface_id),
            protocol_version: d.decoded.protocol_version.clone(),
            stat_description: d.decoded.stat_description.clone(),
            label: d.decoded.label.clone(),
        })
        .collect();

    print_table(rows, &decoded, format)
}
