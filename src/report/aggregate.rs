//! Result aggregation
//!
//! Workers finish in whatever order the network allows. The aggregator
//! throws that order away and sorts by URL, falling back to the batch
//! position for identical URLs, so the same set of results always yields
//! the same report.

use crate::dispatch::DispatchHandle;
use crate::probe::ProbeResult;
use crate::SweepError;

/// Final report rows, sorted by URL ascending
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportRows {
    rows: Vec<ProbeResult>,
}

impl ReportRows {
    pub fn rows(&self) -> &[ProbeResult] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `(url, token)` pairs in report order
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &'static str)> + '_ {
        self.rows.iter().map(ProbeResult::report_row)
    }
}

/// Sorts a completed set of results into report order
///
/// Duplicate URLs are kept as separate rows in batch order.
pub fn aggregate(mut results: Vec<ProbeResult>) -> ReportRows {
    results.sort_by(|a, b| a.url.cmp(&b.url).then_with(|| a.position.cmp(&b.position)));
    ReportRows { rows: results }
}

/// Buffers every result from a running dispatch, then sorts them
///
/// Returns once all workers have exited.
pub async fn collect(handle: DispatchHandle) -> Result<ReportRows, SweepError> {
    let results = handle.finish().await?;
    Ok(aggregate(results))
}
