//! Processed snapshot ledger
//!
//! Append-only record of snapshot identities that have been merged and
//! written. Configuration identities found here are skipped on later passes;
//! traffic identities are recorded alongside them but never consulted.

use crate::error::{EtlError, Result};
use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Durable set of processed snapshot identities
pub trait ProcessedLedger {
    /// Check whether an identity has been recorded
    fn is_processed(&self, id: &str) -> bool;

    /// Record identities that are not yet present.
    ///
    /// Returns the number of identities actually appended. Re-marking an
    /// identity is a no-op.
    fn mark_processed(&mut self, ids: &[String]) -> Result<usize>;

    /// Refresh from the backing store, picking up entries from other runs
    fn reload(&mut self) -> Result<()> {
        Ok(())
    }

    /// Number of recorded identities
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory ledger
#[derive(Debug, Default, Clone)]
pub struct MemoryLedger {
    ids: HashSet<String>,
    order: Vec<String>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identities in the order they were recorded
    pub fn entries(&self) -> &[String] {
        &self.order
    }
}

impl ProcessedLedger for MemoryLedger {
    fn is_processed(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    fn mark_processed(&mut self, ids: &[String]) -> Result<usize> {
        let mut appended = 0;
        for id in ids {
            if self.ids.insert(id.clone()) {
                self.order.push(id.clone());
                appended += 1;
            }
        }
        Ok(appended)
    }

    fn len(&self) -> usize {
        self.ids.len()
    }
}

/// Newline-delimited ledger file
#[derive(Debug)]
pub struct FileLedger {
    path: PathBuf,
    ids: HashSet<String>,
}

impl FileLedger {
    /// Open a ledger file; a missing file is an empty ledger
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let ids = read_ids(&path)?;
        info!(path = %path.display(), entries = ids.len(), "Opened processed ledger");
        Ok(Self { path, ids })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All recorded identities in file order
    pub fn entries(&self) -> Result<Vec<String>> {
        read_ordered_ids(&self.path)
    }

    fn append(&self, ids: &[&String]) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut buf = String::new();
        for id in ids {
            buf.push_str(id);
            buf.push('\n');
        }
        file.write_all(buf.as_bytes())?;
        file.sync_all()
    }
}

impl ProcessedLedger for FileLedger {
    fn is_processed(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    fn mark_processed(&mut self, ids: &[String]) -> Result<usize> {
        // Another run may have appended since we last read the file
        self.reload()?;

        let mut seen = HashSet::new();
        let fresh: Vec<&String> = ids
            .iter()
            .filter(|id| !id.is_empty() && !self.ids.contains(id.as_str()))
            .filter(|id| seen.insert(id.as_str()))
            .collect();

        if fresh.is_empty() {
            return Ok(0);
        }

        self.append(&fresh).map_err(|source| EtlError::LedgerWrite {
            path: self.path.clone(),
            source,
        })?;

        let appended = fresh.len();
        for id in fresh {
            self.ids.insert(id.clone());
        }

        debug!(path = %self.path.display(), appended, "Appended to processed ledger");
        Ok(appended)
    }

    fn reload(&mut self) -> Result<()> {
        self.ids = read_ids(&self.path)?;
        Ok(())
    }

    fn len(&self) -> usize {
        self.ids.len()
    }
}

fn read_ids(path: &Path) -> Result<HashSet<String>> {
    Ok(read_ordered_ids(path)?.into_iter().collect())
}

fn read_ordered_ids(path: &Path) -> Result<Vec<String>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut ids = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        let id = line.trim();
        if !id.is_empty() {
            ids.push(id.to_string());
        }
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_memory_ledger_marks_once() {
        let mut ledger = MemoryLedger::new();
        assert!(ledger.is_empty());

        assert_eq!(ledger.mark_processed(&ids(&["c1", "t1"])).unwrap(), 2);
        assert_eq!(ledger.mark_processed(&ids(&["c1", "t2"])).unwrap(), 1);

        assert!(ledger.is_processed("c1"));
        assert!(ledger.is_processed("t2"));
        assert!(!ledger.is_processed("c2"));
        assert_eq!(ledger.entries(), &ids(&["c1", "t1", "t2"])[..]);
    }

    #[test]
    fn test_file_ledger_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let ledger = FileLedger::open(dir.path().join("processed.txt")).unwrap();
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_file_ledger_persists_and_dedupes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state").join("processed.txt");

        let mut ledger = FileLedger::open(&path).unwrap();
        assert_eq!(ledger.mark_processed(&ids(&["c1", "t1", "c1"])).unwrap(), 2);
        assert_eq!(ledger.mark_processed(&ids(&["c1"])).unwrap(), 0);

        let reopened = FileLedger::open(&path).unwrap();
        assert!(reopened.is_processed("c1"));
        assert!(reopened.is_processed("t1"));
        assert_eq!(reopened.len(), 2);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "c1\nt1\n");
    }

    #[test]
    fn test_file_ledger_sees_entries_from_overlapping_run() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("processed.txt");

        let mut first = FileLedger::open(&path).unwrap();
        let mut second = FileLedger::open(&path).unwrap();

        first.mark_processed(&ids(&["c1"])).unwrap();
        // second has a stale view but must not duplicate c1
        assert_eq!(second.mark_processed(&ids(&["c1", "c2"])).unwrap(), 1);

        assert_eq!(second.entries().unwrap(), ids(&["c1", "c2"]));
    }

    #[test]
    fn test_file_ledger_ignores_blank_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("processed.txt");
        std::fs::write(&path, "c1\n\n  \nt1\n").unwrap();

        let ledger = FileLedger::open(&path).unwrap();
        assert_eq!(ledger.len(), 2);
        assert!(ledger.is_processed("t1"));
    }

    #[test]
    fn test_file_ledger_write_failure() {
        let dir = TempDir::new().unwrap();
        // A directory where the ledger file should be
        let path = dir.path().join("processed.txt");
        std::fs::create_dir(&path).unwrap();

        let err = FileLedger::open(&path)
            .and_then(|mut ledger| ledger.mark_processed(&ids(&["c1"])))
            .unwrap_err();
        assert!(!err.is_recoverable());
    }
}
