//! Human-readable labels for IP-MIB statistics

use std::collections::HashMap;
use std::sync::OnceLock;

/// Canonical MIB statistic name to display label
const STAT_LABELS: &[(&str, &str)] = &[
    ("IP-MIB-ipIfStatsInBcastPkts", "IP Interface Inbound Broadcast Packets"),
    ("IP-MIB-ipIfStatsInDiscards", "IP Interface Inbound Discarded Packets"),
    ("IP-MIB-ipIfStatsInMcastOctets", "IP Interface Inbound Multicast Octets"),
    ("IP-MIB-ipIfStatsInMcastPkts", "IP Interface Inbound Multicast Packets"),
    ("IP-MIB-ipIfStatsHCOutMcastPkts", "IP Interface Outbound Multicast Packets(High Capacity)"),
    ("IP-MIB-ipIfStatsHCOutMcastOctets", "IP Interface Outbound Multicast Octets(High Capacity)"),
    ("IP-MIB-ipIfStatsInAddrErrors", "IP Interface Inbound Address Errors"),
    ("IP-MIB-ipIfStatsInUnknownProtos", "IP Interface Inbound Packets with Unknown Protocols"),
    ("IP-MIB-ipIfStatsOutBcastPkts", "IP Interface Outbound Broadcast Packets"),
    ("IP-MIB-ipIfStatsOutDiscards", "IP Interface Outbound Discarded Packets"),
    ("IP-MIB-ipIfStatsHCInBcastPkts", "IP Interface Inbound Broadcast Packets(High_Capacity)"),
    ("IP-MIB-ipIfStatsHCInMcastOctets", "IP Interface Inbound Multicast Octets(High_Capacity)"),
    ("IP-MIB-ipIfStatsHCOutBcastPkts", "IP Interface Outbound Broadcast Packets(High_Capacity)"),
    ("IP-MIB-ipIfStatsHCInMcastPkts", "IP Interface Inbound Multicast Packets(High_Capacity)"),
    ("IP-MIB-ipSystemStatsOutNoRoutes", "IP System Outbound Packets with No Routes"),
    ("IP-MIB-ipIfStatsOutFragFails", "IP Interface Out Fragmentation Failures"),
    ("IP-MIB-ipIfStatsOutFragOKs", "IP Interface Out Fragmentation Successes"),
    ("IP-MIB-ipIfStatsOutFragReqds", "IP Interface Out Fragmentation Requests"),
    ("IP-MIB-ipIfStatsOutMcastOctets", "IP Interface Out Multicast Octets"),
    ("IP-MIB-ipIfStatsOutMcastPkts", "IP Interface Out Multicast Packets"),
    ("IP-MIB-ipIfStatsOutOctets", "IP Interface Out Octets"),
    ("IP-MIB-ipIfStatsOutRequests", "IP Interface Out Requests"),
    ("IP-MIB-ipIfStatsOutTransmits", "IP Interface Out Transmits"),
    ("IP-MIB-ipIfStatsReasmFails", "IP Interface Reassembly Failures"),
    ("IP-MIB-ipIfStatsReasmOKs", "IP Interface Reassembly Successes"),
    ("IP-MIB-ipIfStatsReasmReqds", "IP Interface Reassembly Requests"),
    ("IP-MIB-ipSystemStatsHCInBcastPkts", "IP System Inbound Broadcast Packets(High_Capacity)"),
    ("IP-MIB-ipSystemStatsHCInDelivers", "IP System Inbound Delivered Packets(High_Capacity)"),
    ("IP-MIB-ipSystemStatsHCInForwDatagrams", "IP System Inbound Forwarded Datagrams(High_Capacity)"),
    ("IP-MIB-ipSystemStatsHCInMcastOctets", "IP System Inbound Multicast Octets(High_Capacity)"),
    ("IP-MIB-ipSystemStatsHCInMcastPkts", "IP System Inbound Multicast Packets(High_Capacity)"),
    ("IP-MIB-ipSystemStatsHCInOctets", "IP System Inbound Octets(High_Capacity)"),
    ("IP-MIB-ipSystemStatsHCInReceives", "IP System Inbound Receives(High_Capacity)"),
    ("IP-MIB-ipSystemStatsHCOutBcastPkts", "IP System Outbound Broadcast Packets(High_Capacity)"),
    ("IP-MIB-ipSystemStatsHCOutForwDatagrams", "IP System Outbound Forwarded Datagrams(High_Capacity)"),
    ("IP-MIB-ipSystemStatsHCOutMcastOctets", "IP System Outbound Multicast Octets(High_Capacity)"),
    ("IP-MIB-ipSystemStatsHCOutMcastPkts", "IP System Outbound Multicast Packets(High_Capacity)"),
    ("IP-MIB-ipSystemStatsHCOutOctets", "IP System Outbound Octets(High_Capacity)"),
    ("IP-MIB-ipSystemStatsHCOutRequests", "IP System Outbound Requests(High_Capacity)"),
    ("IP-MIB-ipSystemStatsHCOutTransmits", "IP System Outbound Transmits(High_Capacity)"),
    ("IP-MIB-ipSystemStatsInAddrErrors", "IP System Inbound Address Errors"),
    ("IP-MIB-ipSystemStatsInBcastPkts", "IP System Inbound Broadcast Packets"),
    ("IP-MIB-ipSystemStatsInDelivers", "IP System Inbound Delivered Packets"),
    ("IP-MIB-ipSystemStatsInDiscards", "IP System Inbound Discarded Packets"),
    ("IP-MIB-ipSystemStatsInForwDatagrams", "IP System Inbound Forwarded Datagrams"),
    ("IP-MIB-ipSystemStatsInHdrErrors", "IP System Inbound Header Errors"),
    ("IP-MIB-ipSystemStatsInMcastOctets", "IP System Inbound Multicast Octets"),
    ("IP-MIB-ipSystemStatsInMcastPkts", "IP System Inbound Multicast Packets"),
    ("IP-MIB-ipSystemStatsInNoRoutes", "IP System Inbound Packets with No Routes"),
    ("IP-MIB-ipSystemStatsInOctets", "IP System Inbound Octets"),
    ("IP-MIB-ipSystemStatsInReceives", "IP System Inbound Receives"),
    ("IP-MIB-ipSystemStatsInTruncatedPkts", "IP System Inbound Truncated Packets"),
    ("IP-MIB-ipSystemStatsInUnknownProtos", "IP System Inbound Packets with Unknown Protocols"),
    ("IP-MIB-ipSystemStatsOutBcastPkts", "IP System Outbound Broadcast Packets"),
    ("IP-MIB-ipSystemStatsOutDiscards", "IP System Outbound Discarded Packets"),
    ("IP-MIB-ipSystemStatsOutForwDatagrams", "IP System Outbound Forwarded Datagrams"),
    ("IP-MIB-ipSystemStatsOutFragCreates", "IP System Outbound Fragmentation Creates"),
    ("IP-MIB-ipSystemStatsOutFragFails", "IP System Outbound Fragmentation Failures"),
    ("IP-MIB-ipSystemStatsOutFragOKs", "IP System Outbound Fragmentation Successes"),
    ("IP-MIB-ipSystemStatsOutFragReqds", "IP System Outbound Fragmentation Requests"),
    ("IP-MIB-ipSystemStatsOutMcastOctets", "IP System Outbound Multicast Octets"),
    ("IP-MIB-ipSystemStatsOutMcastPkts", "IP System Outbound Multicast Packets"),
    ("IP-MIB-ipSystemStatsOutOctets", "IP System Outbound Octets"),
    ("IP-MIB-ipSystemStatsOutRequests", "IP System Outbound Requests"),
    ("IP-MIB-ipSystemStatsOutTransmits", "IP System Outbound Transmits"),
    ("IP-MIB-ipSystemStatsReasmFails", "IP System Reassembly Failures"),
    ("IP-MIB-ipSystemStatsReasmOKs", "IP System Reassembly Successes"),
    ("IP-MIB-ipSystemStatsReasmReqds", "IP System Reassembly Requests"),
    ("IP-MIB-ipIfStatsHCInDelivers", "IP Interface Inbound Delivered Packets(High_Capacity)"),
    ("IP-MIB-ipIfStatsHCInForwDatagrams", "IP Interface Inbound Forwarded Datagrams(High_Capacity)"),
    ("IP-MIB-ipIfStatsHCInOctets", "IP Interface Inbound Octets(High_Capacity)"),
    ("IP-MIB-ipIfStatsHCInReceives", "IP Interface Inbound Receives(High_Capacity)"),
    ("IP-MIB-ipIfStatsHCOutForwDatagrams", "IP Interface Outbound Forwarded Datagrams(High_Capacity)"),
    ("IP-MIB-ipIfStatsHCOutOctets", "IP Interface Outbound Octets(High_Capacity)"),
    ("IP-MIB-ipIfStatsHCOutRequests", "IP Interface Outbound Requests(High_Capacity)"),
    ("IP-MIB-ipIfStatsHCOutTransmits", "IP Interface Outbound Transmits(High_Capacity)"),
    ("IP-MIB-ipIfStatsInDelivers", "IP Interface Inbound Delivered Packets"),
    ("IP-MIB-ipIfStatsInForwDatagrams", "IP Interface Inbound Forwarded Datagrams"),
    ("IP-MIB-ipIfStatsInHdrErrors", "IP Interface Inbound Header Errors"),
    ("IP-MIB-ipIfStatsInNoRoutes", "IP Interface Inbound Packets with No Routes"),
    ("IP-MIB-ipIfStatsInOctets", "IP Interface Inbound Octets"),
    ("IP-MIB-ipIfStatsInReceives", "IP Interface Inbound Receives"),
    ("IP-MIB-ipIfStatsInTruncatedPkts", "IP Interface Inbound Truncated Packets"),
    ("IP-MIB-ipIfStatsOutForwDatagrams", "IP Interface Outbound Forwarded Datagrams"),
    ("IP-MIB-ipIfStatsOutFragCreates", "IP Interface Outbound Fragmentation Creates"),
];

static LABEL_INDEX: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();

fn index() -> &'static HashMap<&'static str, &'static str> {
    LABEL_INDEX.get_or_init(|| STAT_LABELS.iter().copied().collect())
}

/// Look up the label for a canonical statistic name.
pub fn lookup(canonical: &str) -> Option<&'static str> {
    index().get(canonical).copied()
}

/// Label for a canonical statistic name; unmapped names are their own label.
pub fn label_for(canonical: &str) -> &str {
    match lookup(canonical) {
        Some(label) => label,
        None => canonical,
    }
}

/// Number of known statistics
pub fn known_count() -> usize {
    STAT_LABELS.len()
}
