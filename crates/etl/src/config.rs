//! Pipeline configuration

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable prefix, e.g. `ETL_INPUT_DIR`
const ENV_PREFIX: &str = "ETL";

/// Router ETL configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EtlConfig {
    /// Directory holding `Config*.json` and `Stat*.json` snapshot documents
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,

    /// Newline-delimited ledger of processed snapshot ids
    #[serde(default = "default_ledger_path")]
    pub ledger_path: PathBuf,

    /// JSON-lines file merged records are appended to
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// Where to dump Prometheus metrics after the run, if anywhere
    #[serde(default)]
    pub metrics_path: Option<PathBuf>,

    /// Upper bound on passes per invocation
    #[serde(default = "default_max_passes")]
    pub max_passes: usize,
}

fn default_input_dir() -> PathBuf {
    PathBuf::from("data/ingested")
}

fn default_ledger_path() -> PathBuf {
    PathBuf::from("data/processed_documents.txt")
}

fn default_output_path() -> PathBuf {
    PathBuf::from("data/processed_metrics.jsonl")
}

fn default_max_passes() -> usize {
    16
}

impl Default for EtlConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            ledger_path: default_ledger_path(),
            output_path: default_output_path(),
            metrics_path: None,
            max_passes: default_max_passes(),
        }
    }
}

impl EtlConfig {
    /// Load configuration from an optional file, overridden by environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path.to_path_buf()));
        }

        let config = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .context("Failed to read configuration")?;

        config
            .try_deserialize()
            .context("Invalid configuration")
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_passes == 0 {
            bail!("max_passes must be at least 1");
        }
        if self.input_dir.as_os_str().is_empty() {
            bail!("input_dir must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = EtlConfig::default();
        assert_eq!(config.input_dir, PathBuf::from("data/ingested"));
        assert_eq!(config.ledger_path, PathBuf::from("data/processed_documents.txt"));
        assert_eq!(config.max_passes, 16);
        assert!(config.metrics_path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("etl.toml");
        std::fs::write(
            &path,
            "input_dir = \"/srv/ingested\"\nmax_passes = 3\nmetrics_path = \"/srv/metrics.prom\"\n",
        )
        .unwrap();

        let config = EtlConfig::load(Some(&path)).unwrap();
        assert_eq!(config.input_dir, PathBuf::from("/srv/ingested"));
        assert_eq!(config.max_passes, 3);
        assert_eq!(config.metrics_path, Some(PathBuf::from("/srv/metrics.prom")));
        // Unset keys keep their defaults
        assert_eq!(config.output_path, PathBuf::from("data/processed_metrics.jsonl"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(EtlConfig::load(Some(&dir.path().join("absent.toml"))).is_err());
    }

    #[test]
    fn test_validate_rejects_zero_passes() {
        let config = EtlConfig {
            max_passes: 0,
            ..EtlConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_input_dir() {
        let config = EtlConfig {
            input_dir: PathBuf::new(),
            ..EtlConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
