//! Multi-ledger conflict analysis
//!
//! Ledgers are independent batches, so each one is replayed on its own
//! blocking worker with a fresh footprint. Reports are merged once all
//! workers are done and printed in ledger order.

use clap::Args;
use serde_json::json;
use spar_metrics::{
    Metrics, MetricsSnapshot, FREE_FRACTION, LEDGERS_ANALYZED, LEDGERS_EMPTY,
    TRANSACTIONS_CONFLICTED, TRANSACTIONS_FREE,
};
use spar_model::{analyze_batch, BatchReport};
use spar_primitives::LedgerSeq;
use std::ops::Range;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinSet;

use crate::output::{self, Output};
use crate::source::{JsonDirSource, LedgerSource};
use crate::{config::Config, CliError};

/// Analyze a range of ledgers
#[derive(Debug, Args)]
pub struct AnalyzeCommand {
    /// First ledger to analyze
    #[arg(long)]
    pub from: LedgerSeq,
    /// One past the last ledger to analyze
    #[arg(long)]
    pub to: LedgerSeq,
    /// Directory holding `<seq>.json` ledger files
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
    /// Ledgers analyzed concurrently
    #[arg(long)]
    pub jobs: Option<usize>,
}

impl AnalyzeCommand {
    pub async fn execute(self, config: &Config, json: bool) -> Result<(), CliError> {
        if self.from >= self.to {
            return Err(CliError::InvalidRange {
                from: self.from,
                to: self.to,
            });
        }

        let source = Arc::new(JsonDirSource::new(super::data_dir(self.data_dir, config)?));
        let jobs = self.jobs.unwrap_or(config.jobs).max(1);
        let metrics = Arc::new(Metrics::with_histogram_bounds(
            config.histogram_buckets.clone(),
        ));

        tracing::info!(from = self.from, to = self.to, jobs, "starting analysis");
        let reports = analyze_range(source, self.from..self.to, jobs, Arc::clone(&metrics)).await?;

        let mut total = BatchReport::new();
        for (_, report) in &reports {
            total.merge(report);
        }

        print_summary(&reports, &total, &metrics, json)
    }
}

type LedgerResult = Result<(LedgerSeq, BatchReport), CliError>;

/// Analyze every ledger of `range` with at most `jobs` running at once
///
/// Results come back sorted by ledger sequence. A worker result is collected
/// before each new ledger is started once `jobs` are in flight, so the first
/// failure stops the run; workers still in flight are aborted.
pub async fn analyze_range<S>(
    source: Arc<S>,
    range: Range<LedgerSeq>,
    jobs: usize,
    metrics: Arc<Metrics>,
) -> Result<Vec<(LedgerSeq, BatchReport)>, CliError>
where
    S: LedgerSource + 'static,
{
    let jobs = jobs.max(1);
    let mut workers: JoinSet<LedgerResult> = JoinSet::new();
    let mut reports = Vec::with_capacity(range.len());

    for seq in range {
        while workers.len() >= jobs {
            collect_next(&mut workers, &mut reports).await?;
        }

        let source = Arc::clone(&source);
        let metrics = Arc::clone(&metrics);
        workers.spawn_blocking(move || {
            analyze_ledger(source.as_ref(), seq, &metrics).map(|report| (seq, report))
        });
    }

    while !workers.is_empty() {
        collect_next(&mut workers, &mut reports).await?;
    }
    reports.sort_by_key(|(seq, _)| *seq);

    Ok(reports)
}

/// Wait for one worker and keep its report
async fn collect_next(
    workers: &mut JoinSet<LedgerResult>,
    reports: &mut Vec<(LedgerSeq, BatchReport)>,
) -> Result<(), CliError> {
    if let Some(joined) = workers.join_next().await {
        let result = joined.map_err(|e| CliError::Worker(e.to_string()))?;
        match result {
            Ok(report) => reports.push(report),
            Err(e) => {
                tracing::warn!(error = %e, in_flight = workers.len(), "ledger failed, stopping");
                workers.abort_all();
                return Err(e);
            }
        }
    }
    Ok(())
}

/// Load, convert and replay one ledger
pub fn analyze_ledger<S>(source: &S, seq: LedgerSeq, metrics: &Metrics) -> Result<BatchReport, CliError>
where
    S: LedgerSource + ?Sized,
{
    let ledger = source.load(seq)?;
    let transactions = ledger
        .into_transactions()
        .map_err(|source| CliError::Types { seq, source })?;
    let report =
        analyze_batch(&transactions).map_err(|source| CliError::Analysis { seq, source })?;

    metrics.counter(LEDGERS_ANALYZED, 1);
    metrics.counter(TRANSACTIONS_FREE, report.free);
    metrics.counter(TRANSACTIONS_CONFLICTED, report.conflicted);
    match report.free_fraction() {
        Some(fraction) => metrics.histogram(FREE_FRACTION, fraction),
        None => metrics.counter(LEDGERS_EMPTY, 1),
    }

    tracing::info!(
        ledger = seq,
        free = report.free,
        conflicted = report.conflicted,
        "ledger analyzed"
    );
    Ok(report)
}

fn print_summary(
    reports: &[(LedgerSeq, BatchReport)],
    total: &BatchReport,
    metrics: &Metrics,
    json: bool,
) -> Result<(), CliError> {
    let snapshot = MetricsSnapshot::from_metrics(metrics);
    let histogram = snapshot.histograms.get(FREE_FRACTION).cloned();

    let ledgers: Vec<_> = reports
        .iter()
        .map(|(seq, report)| {
            json!({
                "sequence": seq,
                "free": report.free,
                "conflicted": report.conflicted,
                "free_fraction": report.free_fraction(),
            })
        })
        .collect();

    let mut text = output::render_ledger_table(reports);
    text.push('\n');
    text.push_str(&format!(
        "total: {} transactions, {} free, {} conflicted ({} conflict free)\n\n",
        total.total(),
        total.free,
        total.conflicted,
        output::percent(total.free_fraction())
    ));
    text.push_str(&output::render_stats(&total.stats));
    if let Some(summary) = &histogram {
        text.push_str(&format!(
            "\nfree fraction per ledger (mean {:.3} over {} ledgers):\n",
            summary.mean, summary.count
        ));
        text.push_str(&output::render_histogram(summary));
    }

    Output::new(json)
        .field_value("ledgers", json!(ledgers))
        .field_value("total", serde_json::to_value(total)?)
        .field_value("metrics", serde_json::to_value(&snapshot)?)
        .message(text.trim_end())
        .print();

    Ok(())
}
