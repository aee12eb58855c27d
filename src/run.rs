//! Run orchestration
//!
//! Ties the pieces together for one batch:
//! 1. Read the URL list
//! 2. Build the HTTP client and the classifier for the configured mode
//! 3. Dispatch the batch to the worker pool
//! 4. Collect and sort the results
//! 5. Write the report and tally statistics

use crate::batch::{read_url_list, JobBatch};
use crate::config::Config;
use crate::dispatch::{DispatchSettings, Dispatcher};
use crate::probe::{build_classifier, Classifier, ProbeMode};
use crate::report::{aggregate, write_report, ProbeStatistics, ReportRows};
use crate::SweepError;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;

/// What a finished run produced
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// URLs read from the input
    pub batch_size: usize,
    /// Rows written to the report
    pub rows_written: usize,
    pub report_path: PathBuf,
    /// True if the run was stopped before every URL was probed
    pub cancelled: bool,
    pub statistics: ProbeStatistics,
}

impl RunSummary {
    pub fn duration_seconds(&self) -> f64 {
        (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }
}

/// Runs a complete sweep to the end
///
/// # Example
///
/// ```no_run
/// use url_sweep::config::load_config;
/// use url_sweep::run::run_sweep;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("sweep.toml"))?;
/// let summary = run_sweep(config).await?;
/// println!("{} rows written", summary.rows_written);
/// # Ok(())
/// # }
/// ```
pub async fn run_sweep(config: Config) -> Result<RunSummary, SweepError> {
    let (_never_cancel, cancel) = watch::channel(false);
    run_sweep_with_cancel(config, cancel).await
}

/// Runs a sweep that stops early once `cancel` turns true
///
/// Results that completed before the cancellation are still written.
pub async fn run_sweep_with_cancel(
    config: Config,
    cancel: watch::Receiver<bool>,
) -> Result<RunSummary, SweepError> {
    let started_at = Utc::now();

    let batch = read_url_list(&config.input)?;
    let classifier = build_classifier(&config.probe, &config.user_agent)?;
    let settings = DispatchSettings::from_config(&config.probe)?;

    tracing::info!(
        "Probing {} URLs in {} mode with up to {} workers",
        batch.len(),
        config.probe.mode,
        settings.concurrency()
    );

    let (rows, cancelled) = probe_batch(classifier, settings, &batch, cancel).await?;

    let foreign = count_foreign_outcomes(&rows, config.probe.mode);
    if foreign > 0 {
        tracing::warn!(
            "{} results carry a classification outside {} mode",
            foreign,
            config.probe.mode
        );
    }

    let report_path = config.output_path();
    let header = config.output_header();
    let rows_written = write_report(&rows, &report_path, Some(&header))?;
    let statistics = ProbeStatistics::from_rows(&rows);

    let summary = RunSummary {
        started_at,
        finished_at: Utc::now(),
        batch_size: batch.len(),
        rows_written,
        report_path,
        cancelled,
        statistics,
    };

    if cancelled {
        tracing::warn!(
            "Sweep cancelled: {} of {} URLs probed",
            summary.rows_written,
            summary.batch_size
        );
    } else {
        tracing::info!(
            "Sweep completed: {} URLs in {:.2}s",
            summary.rows_written,
            summary.duration_seconds()
        );
    }

    Ok(summary)
}

/// Dispatches a batch and gathers its sorted rows
///
/// Returns the rows and whether cancellation cut the batch short. A cancel
/// that lands after the last result has arrived does not count.
pub async fn probe_batch(
    classifier: Arc<dyn Classifier>,
    settings: DispatchSettings,
    batch: &JobBatch,
    mut cancel: watch::Receiver<bool>,
) -> Result<(ReportRows, bool), SweepError> {
    let mut handle = Dispatcher::new(classifier, settings).dispatch(batch);
    let mut results = Vec::with_capacity(batch.len());
    let mut cancel_open = true;

    if *cancel.borrow_and_update() {
        handle.cancel();
    }

    loop {
        tokio::select! {
            next = handle.next() => match next {
                Some(result) => results.push(result),
                None => break,
            },
            changed = cancel.changed(), if cancel_open && !handle.is_cancelled() => {
                if changed.is_err() {
                    cancel_open = false;
                } else if *cancel.borrow_and_update() {
                    tracing::info!("Cancellation requested, stopping workers");
                    handle.cancel();
                }
            }
        }
    }

    let cancel_requested = handle.is_cancelled();
    results.extend(handle.finish().await?);
    let cancelled = cancel_requested && results.len() < batch.len();

    Ok((aggregate(results), cancelled))
}

/// Rows whose classification the configured mode cannot produce
fn count_foreign_outcomes(rows: &ReportRows, mode: ProbeMode) -> usize {
    rows.rows()
        .iter()
        .filter(|row| !row.outcome.belongs_to(mode))
        .count()
}
