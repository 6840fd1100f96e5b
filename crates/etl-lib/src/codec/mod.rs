//! Compound metric name decoding
//!
//! Traffic counters arrive keyed by names such as
//! `IP-MIB-ipIfStatsInOctets.4.IPv4`: a canonical MIB statistic, an optional
//! interface index and a protocol version, joined with dots. Device-wide
//! counters omit the interface index (`IP-MIB-ipIfStatsInOctets.IPv4`).

mod labels;

pub use labels::{known_count, label_for, lookup};

use serde::Serialize;

/// Interface id used for device-wide ("general") counters
pub const GENERAL_INTERFACE_ID: u64 = 0;

/// Structured form of a compound metric name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricName {
    pub interface_id: u64,
    pub protocol_version: String,
    pub stat_description: String,
    pub label: String,
}

impl MetricName {
    /// Returns true for device-wide counters
    pub fn is_general(&self) -> bool {
        self.interface_id == GENERAL_INTERFACE_ID
    }
}

/// Extract the interface id from the last dot-separated segment.
///
/// Returns 0 when there is no dot, when the last segment is not made of
/// ASCII digits, or when it does not fit in a `u64`.
pub fn extract_interface_id(name: &str) -> u64 {
    let name = name.trim();
    let Some((_, last)) = name.rsplit_once('.') else {
        return GENERAL_INTERFACE_ID;
    };

    if last.is_empty() || !last.bytes().all(|b| b.is_ascii_digit()) {
        return GENERAL_INTERFACE_ID;
    }

    last.parse().unwrap_or(GENERAL_INTERFACE_ID)
}

/// Drop the last dot-separated segment (the interface id).
pub fn remove_interface_id(name: &str) -> &str {
    drop_last_segment(name)
}

/// The last dot-separated segment, or the whole name if it has no dot.
pub fn extract_protocol_version(name: &str) -> &str {
    name.rsplit_once('.').map(|(_, last)| last).unwrap_or(name)
}

/// Drop the last dot-separated segment (the protocol version).
pub fn remove_protocol_version(name: &str) -> &str {
    drop_last_segment(name)
}

fn drop_last_segment(name: &str) -> &str {
    name.rsplit_once('.').map(|(head, _)| head).unwrap_or("")
}

/// Decode a compound metric name into its parts.
///
/// The interface id is normally the trailing segment
/// (`stat.IPv4.4`). When it is absent, an id placed just before the
/// protocol version (`stat.4.IPv4`) is recognised as well; traffic
/// documents such as `IP-MIB-ipIfStatsInOctets.1.IPv4` use that layout.
///
/// A name without any dot decodes to interface 0 with the whole name as
/// protocol version and an empty canonical description; it is passed through
/// rather than rejected.
pub fn decode(name: &str) -> MetricName {
    let mut interface_id = extract_interface_id(name);
    let rest = if interface_id != GENERAL_INTERFACE_ID {
        remove_interface_id(name)
    } else {
        name
    };

    let protocol_version = extract_protocol_version(rest);
    let mut stat_description = remove_protocol_version(rest);

    if interface_id == GENERAL_INTERFACE_ID {
        let embedded = extract_interface_id(stat_description);
        if embedded != GENERAL_INTERFACE_ID {
            interface_id = embedded;
            stat_description = remove_interface_id(stat_description);
        }
    }

    MetricName {
        interface_id,
        protocol_version: protocol_version.to_string(),
        stat_description: stat_description.to_string(),
        label: label_for(stat_description).to_string(),
    }
}

/// Interface name of a configuration key: everything before the first dot.
pub fn interface_name(key: &str) -> &str {
    key.split_once('.').map(|(head, _)| head).unwrap_or(key)
}
