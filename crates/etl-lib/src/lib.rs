//! Router telemetry ETL library
//!
//! This crate provides the core functionality for:
//! - Decoding compound metric names into interface, protocol and label
//! - Matching configuration snapshots with traffic snapshots
//! - Flattening snapshots and merging device-wide counters into interface records
//! - Idempotent processing through a durable ledger
//! - Pass orchestration and observability

pub mod codec;
pub mod error;
pub mod flatten;
pub mod ledger;
pub mod matcher;
pub mod merge;
pub mod models;
pub mod observability;
pub mod pipeline;
pub mod sink;
pub mod source;

pub use error::{EtlError, Result};
pub use ledger::{FileLedger, MemoryLedger, ProcessedLedger};
pub use models::*;
pub use observability::{PipelineMetrics, StructuredLogger};
pub use pipeline::{PassReport, Pipeline};
pub use sink::{JsonLinesSink, MemorySink, RecordSink};
pub use source::{JsonDirSource, MalformedReport, MemorySource, SnapshotBatch, SnapshotSource};
