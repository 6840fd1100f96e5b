//! Configuration/traffic snapshot matching
//!
//! A configuration snapshot pairs with a traffic snapshot when, for the same
//! device, both report the same match timestamp. Each traffic snapshot is
//! consumed by at most one pair per pass, and earlier traffic snapshots win.

use crate::ledger::ProcessedLedger;
use crate::models::{ConfigSnapshot, TrafficSnapshot};
use indexmap::IndexMap;
use std::collections::{HashMap, VecDeque};
use tracing::debug;

/// The timestamp a device is matched on: the first key of its timestamp map.
///
/// Later timestamps of the same device never take part in matching.
pub fn match_timestamp<T>(timestamps: &IndexMap<String, T>) -> Option<&str> {
    timestamps.keys().next().map(String::as_str)
}

/// A traffic snapshot claimed by one device of a configuration snapshot
#[derive(Debug, Clone)]
pub struct MatchedTraffic {
    pub device: String,
    pub timestamp: String,
    pub traffic: TrafficSnapshot,
}

/// A configuration snapshot with every traffic snapshot it paired with
#[derive(Debug, Clone)]
pub struct ConfigMatch {
    pub config: ConfigSnapshot,
    pub traffic: Vec<MatchedTraffic>,
}

impl ConfigMatch {
    /// Identities to record once this match has been written:
    /// the configuration first, then each paired traffic snapshot.
    pub fn ledger_ids(&self) -> Vec<String> {
        std::iter::once(self.config.id.clone())
            .chain(self.traffic.iter().map(|m| m.traffic.id.clone()))
            .collect()
    }

    pub fn pairs(&self) -> impl Iterator<Item = MatchedPair<'_>> {
        self.traffic.iter().map(move |m| MatchedPair {
            config: &self.config,
            traffic: &m.traffic,
            device: &m.device,
            timestamp: &m.timestamp,
        })
    }
}

/// One (configuration, traffic) pair sharing a device and timestamp
#[derive(Debug, Clone, Copy)]
pub struct MatchedPair<'a> {
    pub config: &'a ConfigSnapshot,
    pub traffic: &'a TrafficSnapshot,
    pub device: &'a str,
    pub timestamp: &'a str,
}

/// Result of one matching pass
#[derive(Debug, Default)]
pub struct MatchOutcome {
    /// Configurations that found at least one pair, in input order
    pub matches: Vec<ConfigMatch>,
    /// Configurations skipped because the ledger already holds them
    pub skipped: Vec<String>,
    /// Unprocessed configurations that found no pair; retried next pass
    pub unmatched: Vec<String>,
    /// Traffic snapshots nobody claimed
    pub remaining_traffic: Vec<TrafficSnapshot>,
}

impl MatchOutcome {
    pub fn pair_count(&self) -> usize {
        self.matches.iter().map(|m| m.traffic.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn pairs(&self) -> impl Iterator<Item = MatchedPair<'_>> {
        self.matches.iter().flat_map(|m| m.pairs())
    }
}

/// Unconsumed traffic snapshots indexed by (device, match timestamp)
struct TrafficPool {
    slots: Vec<Option<TrafficSnapshot>>,
    index: HashMap<String, HashMap<String, VecDeque<usize>>>,
}

impl TrafficPool {
    fn new(traffic: Vec<TrafficSnapshot>) -> Self {
        let mut index: HashMap<String, HashMap<String, VecDeque<usize>>> = HashMap::new();

        for (slot, snapshot) in traffic.iter().enumerate() {
            for (device, entry) in &snapshot.routers {
                if let Some(timestamp) = match_timestamp(&entry.measure_time) {
                    index
                        .entry(device.clone())
                        .or_default()
                        .entry(timestamp.to_string())
                        .or_default()
                        .push_back(slot);
                }
            }
        }

        Self {
            slots: traffic.into_iter().map(Some).collect(),
            index,
        }
    }

    /// Take the earliest unconsumed snapshot for a device and timestamp
    fn take(&mut self, device: &str, timestamp: &str) -> Option<TrafficSnapshot> {
        let candidates = self.index.get_mut(device)?.get_mut(timestamp)?;
        while let Some(slot) = candidates.pop_front() {
            // Slots consumed through another device's key are already empty
            if let Some(snapshot) = self.slots[slot].take() {
                return Some(snapshot);
            }
        }
        None
    }

    fn into_remaining(self) -> Vec<TrafficSnapshot> {
        self.slots.into_iter().flatten().collect()
    }
}

/// Pair unprocessed configuration snapshots with traffic snapshots.
///
/// Configurations whose identity is in the ledger are skipped. For each
/// device of a configuration, the first unconsumed traffic snapshot whose
/// same device has the same match timestamp is claimed; a configuration may
/// therefore claim one traffic snapshot per device.
pub fn match_snapshots<L>(
    configs: Vec<ConfigSnapshot>,
    traffic: Vec<TrafficSnapshot>,
    ledger: &L,
) -> MatchOutcome
where
    L: ProcessedLedger + ?Sized,
{
    let mut pool = TrafficPool::new(traffic);
    let mut outcome = MatchOutcome::default();

    for config in configs {
        if ledger.is_processed(&config.id) {
            debug!(snapshot_id = %config.id, "Config snapshot already processed, skipping");
            outcome.skipped.push(config.id);
            continue;
        }

        let mut claimed = Vec::new();
        for (device, entry) in &config.routers {
            let Some(timestamp) = match_timestamp(entry.timestamps()) else {
                debug!(
                    snapshot_id = %config.id,
                    device = %device,
                    "Device has no timestamps, skipping"
                );
                continue;
            };

            if let Some(traffic) = pool.take(device, timestamp) {
                debug!(
                    config_id = %config.id,
                    traffic_id = %traffic.id,
                    device = %device,
                    timestamp = %timestamp,
                    "Claimed traffic snapshot"
                );
                claimed.push(MatchedTraffic {
                    device: device.clone(),
                    timestamp: timestamp.to_string(),
                    traffic,
                });
            }
        }

        if claimed.is_empty() {
            outcome.unmatched.push(config.id);
        } else {
            outcome.matches.push(ConfigMatch {
                config,
                traffic: claimed,
            });
        }
    }

    outcome.remaining_traffic = pool.into_remaining();
    outcome
}
