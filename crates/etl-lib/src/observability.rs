//! Observability infrastructure for the router ETL
//!
//! Provides:
//! - Prometheus metrics (pairs matched, records written, ledger size, pass latency)
//! - Structured logging of pipeline events with tracing

use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, IntGauge, Registry, TextEncoder};
use tracing::{debug, info, warn};

/// Histogram buckets for pass duration (in seconds)
const PASS_DURATION_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0,
];

/// Pipeline metrics for Prometheus exposition
///
/// Each handle owns its registry, so several pipelines can live in one process.
/// Clones share the same underlying metrics.
#[derive(Clone)]
pub struct PipelineMetrics {
    registry: Registry,
    pairs_matched: IntCounter,
    records_written: IntCounter,
    configs_skipped: IntCounter,
    malformed_snapshots: IntCounter,
    ledger_entries: IntGauge,
    pass_duration_seconds: Histogram,
}

impl std::fmt::Debug for PipelineMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineMetrics")
            .field("pairs_matched", &self.pairs_matched.get())
            .field("records_written", &self.records_written.get())
            .field("ledger_entries", &self.ledger_entries.get())
            .finish()
    }
}

impl PipelineMetrics {
    /// Create and register all pipeline metrics in a fresh registry
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let pairs_matched = IntCounter::new(
            "router_etl_pairs_matched_total",
            "Configuration/traffic snapshot pairs matched",
        )?;
        let records_written = IntCounter::new(
            "router_etl_records_written_total",
            "Merged metric records accepted by the sink",
        )?;
        let configs_skipped = IntCounter::new(
            "router_etl_configs_skipped_total",
            "Configuration snapshots skipped because they were already processed",
        )?;
        let malformed_snapshots = IntCounter::new(
            "router_etl_malformed_snapshots_total",
            "Snapshots excluded from a pass as malformed",
        )?;
        let ledger_entries = IntGauge::new(
            "router_etl_ledger_entries",
            "Identities recorded in the processed ledger",
        )?;
        let pass_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "router_etl_pass_duration_seconds",
                "Wall time of one pipeline pass",
            )
            .buckets(PASS_DURATION_BUCKETS.to_vec()),
        )?;

        registry.register(Box::new(pairs_matched.clone()))?;
        registry.register(Box::new(records_written.clone()))?;
        registry.register(Box::new(configs_skipped.clone()))?;
        registry.register(Box::new(malformed_snapshots.clone()))?;
        registry.register(Box::new(ledger_entries.clone()))?;
        registry.register(Box::new(pass_duration_seconds.clone()))?;

        Ok(Self {
            registry,
            pairs_matched,
            records_written,
            configs_skipped,
            malformed_snapshots,
            ledger_entries,
            pass_duration_seconds,
        })
    }

    pub fn add_pairs_matched(&self, count: usize) {
        self.pairs_matched.inc_by(count as u64);
    }

    pub fn add_records_written(&self, count: usize) {
        self.records_written.inc_by(count as u64);
    }

    pub fn add_configs_skipped(&self, count: usize) {
        self.configs_skipped.inc_by(count as u64);
    }

    pub fn inc_malformed_snapshots(&self) {
        self.malformed_snapshots.inc();
    }

    pub fn set_ledger_entries(&self, count: usize) {
        self.ledger_entries.set(count as i64);
    }

    /// Record a pass duration observation
    pub fn observe_pass_duration(&self, duration_secs: f64) {
        self.pass_duration_seconds.observe(duration_secs);
    }

    pub fn records_written(&self) -> u64 {
        self.records_written.get()
    }

    pub fn pairs_matched(&self) -> u64 {
        self.pairs_matched.get()
    }

    /// Render every metric in the Prometheus text exposition format
    pub fn encode_text(&self) -> prometheus::Result<String> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

/// Structured logger for pipeline events
///
/// Every event carries an `event` field and the source it was loaded from.
#[derive(Debug, Clone)]
pub struct StructuredLogger {
    source: String,
}

impl StructuredLogger {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Log pipeline startup
    pub fn log_startup(&self, version: &str, max_passes: usize) {
        info!(
            event = "pipeline_started",
            source = %self.source,
            version = %version,
            max_passes = max_passes,
            "Router ETL pipeline started"
        );
    }

    pub fn log_config_skipped(&self, snapshot_id: &str) {
        debug!(
            event = "config_skipped",
            source = %self.source,
            snapshot_id = %snapshot_id,
            "Config snapshot already processed"
        );
    }

    /// Log a matched configuration/traffic pair
    pub fn log_match(&self, config_id: &str, traffic_id: &str, device: &str, timestamp: &str) {
        info!(
            event = "match_found",
            source = %self.source,
            config_id = %config_id,
            traffic_id = %traffic_id,
            device = %device,
            timestamp = %timestamp,
            "Matched config and traffic snapshots"
        );
    }

    /// Log a snapshot excluded from the pass
    pub fn log_malformed(&self, snapshot_id: &str, kind: &str, reason: &str) {
        warn!(
            event = "snapshot_malformed",
            source = %self.source,
            snapshot_id = %snapshot_id,
            kind = %kind,
            reason = %reason,
            "Snapshot excluded as malformed"
        );
    }

    pub fn log_batch_written(&self, config_id: &str, traffic_id: &str, records: usize) {
        info!(
            event = "batch_written",
            source = %self.source,
            config_id = %config_id,
            traffic_id = %traffic_id,
            records = records,
            "Merged records written"
        );
    }

    pub fn log_ledger_updated(&self, config_id: &str, appended: usize, total: usize) {
        info!(
            event = "ledger_updated",
            source = %self.source,
            config_id = %config_id,
            appended = appended,
            total = total,
            "Processed ledger updated"
        );
    }

    /// Log the summary of one pass
    pub fn log_pass_complete(
        &self,
        pass: usize,
        pairs_matched: usize,
        records_written: usize,
        configs_marked: usize,
        malformed: usize,
        duration_ms: i64,
    ) {
        info!(
            event = "pass_complete",
            source = %self.source,
            pass = pass,
            pairs_matched = pairs_matched,
            records_written = records_written,
            configs_marked = configs_marked,
            malformed = malformed,
            duration_ms = duration_ms,
            "Pipeline pass complete"
        );
    }

    pub fn log_idle(&self, passes: usize) {
        info!(
            event = "pipeline_idle",
            source = %self.source,
            passes = passes,
            "No new matches, pipeline idle"
        );
    }
}
