//! Error types for the router ETL core

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while matching, flattening, merging and persisting snapshots.
#[derive(Debug, Error)]
pub enum EtlError {
    /// A snapshot lacks a key or value the core reads.
    /// The snapshot is excluded from the current pass.
    #[error("Malformed snapshot {snapshot_id}: {reason}")]
    MalformedSnapshot { snapshot_id: String, reason: String },

    /// Appending to the processed ledger did not complete durably.
    #[error("Failed to write ledger {}: {source}", path.display())]
    LedgerWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The sink rejected a batch of merged records.
    #[error("Sink rejected batch: {reason}")]
    SinkWrite { reason: String },

    /// The snapshot source could not be read at all.
    #[error("Snapshot source unavailable: {reason}")]
    Source { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl EtlError {
    pub fn malformed(snapshot_id: impl Into<String>, reason: impl Into<String>) -> Self {
        EtlError::MalformedSnapshot {
            snapshot_id: snapshot_id.into(),
            reason: reason.into(),
        }
    }

    pub fn sink(reason: impl Into<String>) -> Self {
        EtlError::SinkWrite {
            reason: reason.into(),
        }
    }

    /// Returns true if the error only affects one snapshot and the pass may continue.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, EtlError::MalformedSnapshot { .. })
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
