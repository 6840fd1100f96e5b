//! Snapshot source abstraction
//!
//! Sources hand the pipeline every configuration and traffic snapshot
//! currently available. Snapshots that cannot be decoded are reported in
//! [`SnapshotBatch::rejected`] instead of failing the whole load.

mod json_dir;
mod memory;

pub use json_dir::{JsonDirSource, CONFIG_PREFIX, TRAFFIC_PREFIX};
pub use memory::MemorySource;

use crate::error::{EtlError, Result};
use crate::models::{ConfigSnapshot, TrafficSnapshot};
use serde::Serialize;
use std::fmt::Debug;

/// Which family a snapshot belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotKind {
    Config,
    Traffic,
}

impl SnapshotKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SnapshotKind::Config => "config",
            SnapshotKind::Traffic => "traffic",
        }
    }
}

/// A snapshot excluded from the pass, with the reason
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MalformedReport {
    pub snapshot_id: String,
    pub kind: SnapshotKind,
    pub reason: String,
}

impl MalformedReport {
    /// Build a report from a recoverable error
    pub fn from_error(kind: SnapshotKind, fallback_id: &str, err: &EtlError) -> Self {
        match err {
            EtlError::MalformedSnapshot {
                snapshot_id,
                reason,
            } => Self {
                snapshot_id: snapshot_id.clone(),
                kind,
                reason: reason.clone(),
            },
            other => Self {
                snapshot_id: fallback_id.to_string(),
                kind,
                reason: other.to_string(),
            },
        }
    }
}

/// Everything a source currently holds
#[derive(Debug, Default)]
pub struct SnapshotBatch {
    pub configs: Vec<ConfigSnapshot>,
    pub traffic: Vec<TrafficSnapshot>,
    pub rejected: Vec<MalformedReport>,
}

/// Provider of configuration and traffic snapshots
pub trait SnapshotSource: Debug {
    /// Load all currently available snapshots, in source order
    fn load(&mut self) -> Result<SnapshotBatch>;

    /// Human-readable description of the source
    fn description(&self) -> &str;
}
