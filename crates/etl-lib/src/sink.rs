//! Merged record sinks
//!
//! A sink must confirm a batch durably before returning `Ok`; the pipeline
//! only records a configuration snapshot as processed after that.

use crate::error::{EtlError, Result};
use crate::models::MergedMetricRecord;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Destination for merged metric records
pub trait RecordSink {
    /// Durably store one batch of records
    fn write_batch(&mut self, records: &[MergedMetricRecord]) -> Result<()>;
}

/// Appends records as JSON lines to a file
#[derive(Debug)]
pub struct JsonLinesSink {
    path: PathBuf,
    written: usize,
}

impl JsonLinesSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            written: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records written by this sink since it was created
    pub fn written(&self) -> usize {
        self.written
    }

    fn append(&self, records: &[MergedMetricRecord]) -> std::result::Result<(), String> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| format!("cannot create {}: {}", parent.display(), e))?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| format!("cannot open {}: {}", self.path.display(), e))?;

        let mut writer = BufWriter::new(file);
        for record in records {
            serde_json::to_writer(&mut writer, record).map_err(|e| e.to_string())?;
            writer.write_all(b"\n").map_err(|e| e.to_string())?;
        }

        let file = writer.into_inner().map_err(|e| e.error().to_string())?;
        file.sync_all().map_err(|e| e.to_string())
    }
}

impl RecordSink for JsonLinesSink {
    fn write_batch(&mut self, records: &[MergedMetricRecord]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        self.append(records).map_err(EtlError::sink)?;
        self.written += records.len();

        debug!(path = %self.path.display(), records = records.len(), "Wrote record batch");
        Ok(())
    }
}

/// Read back a JSON-lines file written by [`JsonLinesSink`]
pub fn read_records(path: &Path) -> Result<Vec<MergedMetricRecord>> {
    let file = File::open(path)?;
    let mut records = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        records.push(serde_json::from_str(&line)?);
    }
    Ok(records)
}

/// Collects batches in memory; can be told to reject the next batch
#[derive(Debug, Default)]
pub struct MemorySink {
    batches: Vec<Vec<MergedMetricRecord>>,
    fail_next: Option<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the next `write_batch` call with this reason
    pub fn fail_next(&mut self, reason: impl Into<String>) {
        self.fail_next = Some(reason.into());
    }

    pub fn batches(&self) -> &[Vec<MergedMetricRecord>] {
        &self.batches
    }

    pub fn records(&self) -> impl Iterator<Item = &MergedMetricRecord> {
        self.batches.iter().flatten()
    }

    pub fn record_count(&self) -> usize {
        self.batches.iter().map(Vec::len).sum()
    }
}

impl RecordSink for MemorySink {
    fn write_batch(&mut self, records: &[MergedMetricRecord]) -> Result<()> {
        if let Some(reason) = self.fail_next.take() {
            return Err(EtlError::sink(reason));
        }
        self.batches.push(records.to_vec());
        Ok(())
    }
}
