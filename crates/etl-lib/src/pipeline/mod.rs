//! Pass driver
//!
//! One pass loads every available snapshot, matches configurations with
//! traffic, merges each pair and hands the records to the sink. A
//! configuration is recorded in the ledger only after all of its pairs have
//! been written, so an interrupted pass is retried in full on the next run.

use crate::error::Result;
use crate::flatten::{flatten_config, flatten_traffic};
use crate::ledger::ProcessedLedger;
use crate::matcher::{match_snapshots, ConfigMatch};
use crate::merge::merge;
use crate::observability::{PipelineMetrics, StructuredLogger};
use crate::sink::RecordSink;
use crate::source::{MalformedReport, SnapshotKind, SnapshotSource};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Instant;


/// Summary of one pass
#[derive(Debug, Clone, Serialize)]
pub struct PassReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub pairs_matched: usize,
    pub records_written: usize,
    /// Configurations recorded in the ledger by this pass
    pub configs_marked: usize,
    /// Configurations skipped because the ledger already held them
    pub configs_skipped: usize,
    /// Configurations that found no pair and will be retried
    pub configs_unmatched: usize,
    pub malformed: Vec<MalformedReport>,
}

impl PassReport {
    fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            finished_at: started_at,
            pairs_matched: 0,
            records_written: 0,
            configs_marked: 0,
            configs_skipped: 0,
            configs_unmatched: 0,
            malformed: Vec::new(),
        }
    }

    /// A pass that recorded nothing in the ledger; no pair matched.
    pub fn is_idle(&self) -> bool {
        self.configs_marked == 0
    }

    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

/// Match, merge and persist snapshots from one source into one sink
#[derive(Debug)]
pub struct Pipeline<S, K, L> {
    source: S,
    sink: K,
    ledger: L,
    metrics: PipelineMetrics,
    logger: StructuredLogger,
    passes: usize,
}

impl<S, K, L> Pipeline<S, K, L>
where
    S: SnapshotSource,
    K: RecordSink,
    L: ProcessedLedger,
{
    pub fn new(source: S, sink: K, ledger: L, metrics: PipelineMetrics) -> Self {
        let logger = StructuredLogger::new(source.description());
        metrics.set_ledger_entries(ledger.len());
        Self {
            source,
            sink,
            ledger,
            metrics,
            logger,
            passes: 0,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut K {
        &mut self.sink
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn metrics(&self) -> &PipelineMetrics {
        &self.metrics
    }

    pub fn logger(&self) -> &StructuredLogger {
        &self.logger
    }

    /// Number of passes run so far
    pub fn passes(&self) -> usize {
        self.passes
    }

    /// Run one pass over everything the source currently holds.
    ///
    /// Malformed snapshots are reported and left out. Sink and ledger
    /// failures abort the pass; configurations not yet marked are retried
    /// by the next pass.
    pub fn run_pass(&mut self) -> Result<PassReport> {
        let timer = Instant::now();
        let mut report = PassReport::new(Utc::now());
        self.passes += 1;

        self.ledger.reload()?;
        let batch = self.source.load()?;

        for rejected in batch.rejected {
            self.report_malformed(&mut report, rejected);
        }

        let outcome = match_snapshots(batch.configs, batch.traffic, &self.ledger);
        for id in &outcome.skipped {
            self.logger.log_config_skipped(id);
        }
        report.configs_skipped = outcome.skipped.len();
        report.configs_unmatched = outcome.unmatched.len();
        report.pairs_matched = outcome.pair_count();
        self.metrics.add_configs_skipped(report.configs_skipped);
        self.metrics.add_pairs_matched(report.pairs_matched);

        for config_match in &outcome.matches {
            self.process_match(config_match, &mut report)?;
        }

        report.finished_at = Utc::now();
        self.metrics.observe_pass_duration(timer.elapsed().as_secs_f64());
        self.metrics.set_ledger_entries(self.ledger.len());
        self.logger.log_pass_complete(
            self.passes,
            report.pairs_matched,
            report.records_written,
            report.configs_marked,
            report.malformed.len(),
            report.duration_ms(),
        );

        Ok(report)
    }

    /// Run passes until one matches nothing, at most `max_passes` times
    pub fn run_until_idle(&mut self, max_passes: usize) -> Result<Vec<PassReport>> {
        let mut reports = Vec::new();

        while reports.len() < max_passes {
            let report = self.run_pass()?;
            let idle = report.is_idle();
            reports.push(report);
            if idle {
                self.logger.log_idle(reports.len());
                break;
            }
        }

        Ok(reports)
    }

    /// Write every pair of one configuration, then mark it processed.
    ///
    /// A malformed traffic snapshot is reported and dropped from the match;
    /// the configuration is still marked together with the traffic it was
    /// written with.
    fn process_match(&mut self, config_match: &ConfigMatch, report: &mut PassReport) -> Result<()> {
        let config_id = config_match.config.id.as_str();
        let config_rows = flatten_config(&config_match.config);
        let mut ledger_ids = vec![config_match.config.id.clone()];

        for pair in config_match.pairs() {
            self.logger
                .log_match(config_id, &pair.traffic.id, pair.device, pair.timestamp);

            let stats = match flatten_traffic(pair.traffic) {
                Ok(rows) => rows,
                Err(e) if e.is_recoverable() => {
                    let rejected =
                        MalformedReport::from_error(SnapshotKind::Traffic, &pair.traffic.id, &e);
                    self.report_malformed(report, rejected);
                    continue;
                }
                Err(e) => return Err(e),
            };

            let records = merge(stats, &config_rows);
            self.sink.write_batch(&records)?;

            report.records_written += records.len();
            self.metrics.add_records_written(records.len());
            self.logger
                .log_batch_written(config_id, &pair.traffic.id, records.len());
            ledger_ids.push(pair.traffic.id.clone());
        }

        let appended = self.ledger.mark_processed(&ledger_ids)?;
        report.configs_marked += 1;
        self.logger
            .log_ledger_updated(config_id, appended, self.ledger.len());

        Ok(())
    }

    fn report_malformed(&self, report: &mut PassReport, rejected: MalformedReport) {
        self.logger
            .log_malformed(&rejected.snapshot_id, rejected.kind.as_str(), &rejected.reason);
        self.metrics.inc_malformed_snapshots();
        report.malformed.push(rejected);
    }
}
