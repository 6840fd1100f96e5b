//! Directory of ingested JSON snapshot documents

use super::{MalformedReport, SnapshotBatch, SnapshotKind, SnapshotSource};
use crate::error::{EtlError, Result};
use crate::models::{ConfigSnapshot, TrafficSnapshot};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name prefix of configuration snapshots
pub const CONFIG_PREFIX: &str = "Config";

/// File name prefix of traffic snapshots
pub const TRAFFIC_PREFIX: &str = "Stat";

/// Reads `Config*.json` and `Stat*.json` documents from a directory.
///
/// Files are read in file-name order. A document without a string `_id`
/// takes its file stem as identity.
#[derive(Debug)]
pub struct JsonDirSource {
    dir: PathBuf,
    description: String,
}

impl JsonDirSource {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref().to_path_buf();
        let description = format!("dir: {}", dir.display());
        Self { dir, description }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn json_files(&self) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(&self.dir).map_err(|e| EtlError::Source {
            reason: format!("cannot list {}: {}", self.dir.display(), e),
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

fn classify(path: &Path) -> Option<SnapshotKind> {
    let name = path.file_name()?.to_str()?;
    if name.starts_with(CONFIG_PREFIX) {
        Some(SnapshotKind::Config)
    } else if name.starts_with(TRAFFIC_PREFIX) {
        Some(SnapshotKind::Traffic)
    } else {
        None
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn read_document<T: DeserializeOwned>(path: &Path, stem: &str) -> Result<T> {
    let content = fs::read_to_string(path)
        .map_err(|e| EtlError::malformed(stem, format!("read error: {}", e)))?;
    serde_json::from_str(&content).map_err(|e| EtlError::malformed(stem, e.to_string()))
}

impl SnapshotSource for JsonDirSource {
    fn load(&mut self) -> Result<SnapshotBatch> {
        let mut batch = SnapshotBatch::default();

        for path in self.json_files()? {
            let Some(kind) = classify(&path) else {
                debug!(path = %path.display(), "Ignoring file with unknown prefix");
                continue;
            };
            let stem = file_stem(&path);

            let loaded = match kind {
                SnapshotKind::Config => read_document::<ConfigSnapshot>(&path, &stem).map(|mut s| {
                    if s.id.is_empty() {
                        s.id = stem.clone();
                    }
                    batch.configs.push(s);
                }),
                SnapshotKind::Traffic => {
                    read_document::<TrafficSnapshot>(&path, &stem).map(|mut s| {
                        if s.id.is_empty() {
                            s.id = stem.clone();
                        }
                        batch.traffic.push(s);
                    })
                }
            };

            if let Err(e) = loaded {
                warn!(
                    path = %path.display(),
                    kind = kind.as_str(),
                    error = %e,
                    "Rejected malformed snapshot document"
                );
                batch
                    .rejected
                    .push(MalformedReport::from_error(kind, &stem, &e));
            }
        }

        debug!(
            source = %self.description,
            configs = batch.configs.len(),
            traffic = batch.traffic.len(),
            rejected = batch.rejected.len(),
            "Loaded snapshot documents"
        );
        Ok(batch)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) {
        fs::write(dir.path().join(name), content).unwrap();
    }

    #[test]
    fn test_loads_documents_by_prefix_in_name_order() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "Stat_002.json",
            r#"{"routers": {"10.0.0.1": {"Measure_Time": {"2024-01-01 10:00:00": {"X.IPv4.1": 1}}}}}"#,
        );
        write(
            &dir,
            "Stat_001.json",
            r#"{"_id": "traffic-a", "routers": {}}"#,
        );
        write(
            &dir,
            "Config_001.json",
            r#"{"routers": {"10.0.0.1": {"2024-01-01 10:00:00": {"eth0.1": "Uplink"}}}}"#,
        );
        write(&dir, "Inventory.json", r#"{"anything": true}"#);
        write(&dir, "Config_notes.txt", "not json");

        let mut source = JsonDirSource::new(dir.path());
        let batch = source.load().unwrap();

        assert_eq!(batch.configs.len(), 1);
        assert_eq!(batch.configs[0].id, "Config_001");
        let traffic_ids: Vec<&str> = batch.traffic.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(traffic_ids, vec!["traffic-a", "Stat_002"]);
        assert!(batch.rejected.is_empty());
    }

    #[test]
    fn test_malformed_documents_are_reported_not_fatal() {
        let dir = TempDir::new().unwrap();
        write(&dir, "Config_bad.json", r#"{"_id": "c-bad"}"#);
        write(&dir, "Stat_broken.json", "{ not json");
        write(
            &dir,
            "Stat_nomeasure.json",
            r#"{"routers": {"10.0.0.1": {"2024-01-01 10:00:00": {}}}}"#,
        );
        write(&dir, "Config_ok.json", r#"{"routers": {}}"#);

        let mut source = JsonDirSource::new(dir.path());
        let batch = source.load().unwrap();

        assert_eq!(batch.configs.len(), 1);
        assert_eq!(batch.rejected.len(), 3);

        let missing_routers = &batch.rejected[0];
        assert_eq!(missing_routers.snapshot_id, "Config_bad");
        assert_eq!(missing_routers.kind, SnapshotKind::Config);
        assert!(missing_routers.reason.contains("routers"));

        assert!(batch
            .rejected
            .iter()
            .any(|r| r.snapshot_id == "Stat_nomeasure" && r.reason.contains("Measure_Time")));
    }

    #[test]
    fn test_missing_directory_is_a_source_error() {
        let dir = TempDir::new().unwrap();
        let mut source = JsonDirSource::new(dir.path().join("absent"));
        let err = source.load().unwrap_err();
        assert!(matches!(err, EtlError::Source { .. }));
        assert!(source.description().contains("absent"));
    }
}
