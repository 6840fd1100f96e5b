//! In-memory snapshot source

use super::{SnapshotBatch, SnapshotSource};
use crate::error::Result;
use crate::models::{ConfigSnapshot, TrafficSnapshot};

/// Serves the same snapshots on every load, like a document store that has
/// not received new documents.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    configs: Vec<ConfigSnapshot>,
    traffic: Vec<TrafficSnapshot>,
}

impl MemorySource {
    pub fn new(configs: Vec<ConfigSnapshot>, traffic: Vec<TrafficSnapshot>) -> Self {
        Self { configs, traffic }
    }

    pub fn push_config(&mut self, snapshot: ConfigSnapshot) {
        self.configs.push(snapshot);
    }

    pub fn push_traffic(&mut self, snapshot: TrafficSnapshot) {
        self.traffic.push(snapshot);
    }
}

impl SnapshotSource for MemorySource {
    fn load(&mut self) -> Result<SnapshotBatch> {
        Ok(SnapshotBatch {
            configs: self.configs.clone(),
            traffic: self.traffic.clone(),
            rejected: Vec::new(),
        })
    }

    fn description(&self) -> &str {
        "memory"
    }
}
