//! Router ETL - telemetry snapshot merge pipeline
//!
//! This binary matches ingested configuration and traffic snapshots,
//! merges them into per-interface metric records and appends those to a
//! JSON-lines file. It runs passes until nothing new matches, then exits;
//! scheduling repeated runs is left to the host.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use etl_lib::{FileLedger, JsonDirSource, JsonLinesSink, PassReport, Pipeline, PipelineMetrics};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;

const ETL_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "router-etl")]
#[command(about = "Merge router configuration and traffic snapshots into metric records")]
#[command(version)]
struct Args {
    /// Configuration file (TOML, JSON or YAML)
    #[arg(short, long, env = "ETL_CONFIG")]
    config: Option<PathBuf>,

    /// Log output format
    #[arg(long, value_enum, default_value = "json")]
    log_format: LogFormat,

    /// Override the configured pass bound
    #[arg(long)]
    max_passes: Option<usize>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Json,
    Pretty,
}

/// Printed to stdout when the run finishes
#[derive(Serialize)]
struct RunSummary<'a> {
    version: &'a str,
    passes: usize,
    records_written: usize,
    configs_marked: usize,
    malformed: usize,
    reports: &'a [PassReport],
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // stdout carries the run summary, so logs go to stderr
    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

fn write_metrics(metrics: &PipelineMetrics, path: &Path) -> Result<()> {
    let text = metrics.encode_text().context("Failed to encode metrics")?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    std::fs::write(path, text)
        .with_context(|| format!("Failed to write metrics to {}", path.display()))?;
    info!(path = %path.display(), "Wrote metrics");
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_format);

    info!("Starting router-etl");

    let mut config = config::EtlConfig::load(args.config.as_deref())?;
    if let Some(max_passes) = args.max_passes {
        config.max_passes = max_passes;
    }
    config.validate()?;
    info!(
        input_dir = %config.input_dir.display(),
        ledger_path = %config.ledger_path.display(),
        output_path = %config.output_path.display(),
        "Pipeline configured"
    );

    let metrics = PipelineMetrics::new().context("Failed to register pipeline metrics")?;
    let ledger = FileLedger::open(&config.ledger_path)
        .with_context(|| format!("Failed to open ledger {}", config.ledger_path.display()))?;

    let mut pipeline = Pipeline::new(
        JsonDirSource::new(&config.input_dir),
        JsonLinesSink::new(&config.output_path),
        ledger,
        metrics,
    );
    pipeline.logger().log_startup(ETL_VERSION, config.max_passes);

    let result = pipeline.run_until_idle(config.max_passes);

    // Metrics are dumped even when a pass failed
    if let Some(path) = &config.metrics_path {
        write_metrics(pipeline.metrics(), path)?;
    }

    let reports = result.context("Pipeline pass failed")?;
    let summary = RunSummary {
        version: ETL_VERSION,
        passes: reports.len(),
        records_written: reports.iter().map(|r| r.records_written).sum(),
        configs_marked: reports.iter().map(|r| r.configs_marked).sum(),
        malformed: reports.iter().map(|r| r.malformed.len()).sum(),
        reports: &reports,
    };

    info!(
        passes = summary.passes,
        records_written = summary.records_written,
        configs_marked = summary.configs_marked,
        "Router ETL run finished"
    );
    println!("{}", serde_json::to_string(&summary)?);

    Ok(())
}
