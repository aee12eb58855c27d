//! Statistics over a finished report
//!
//! Summarises how many URLs landed in each classification and prints the
//! operator-facing summary after a run.

use crate::probe::Classification;
use crate::report::aggregate::ReportRows;
use std::collections::HashMap;

/// Counts of a finished report
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProbeStatistics {
    /// Number of report rows
    pub total: usize,

    /// Rows per classification (classifications with no rows are absent)
    pub by_classification: HashMap<Classification, usize>,
}

impl ProbeStatistics {
    /// Tallies the rows of a report
    pub fn from_rows(rows: &ReportRows) -> Self {
        let mut by_classification = HashMap::new();
        for row in rows.rows() {
            *by_classification.entry(row.outcome).or_insert(0) += 1;
        }

        Self {
            total: rows.len(),
            by_classification,
        }
    }

    /// Rows with the given classification
    pub fn count(&self, classification: Classification) -> usize {
        self.by_classification
            .get(&classification)
            .copied()
            .unwrap_or(0)
    }

    /// Rows whose URL could be fetched
    pub fn reachable(&self) -> usize {
        self.by_classification
            .iter()
            .filter(|(classification, _)| classification.is_reachable())
            .map(|(_, count)| count)
            .sum()
    }

    /// Reachable share of the report in percent
    pub fn reachable_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.reachable() as f64 / self.total as f64) * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &ProbeStatistics) {
    println!("=== Probe Statistics ===\n");
    println!("  Total URLs: {}", stats.total);

    for classification in Classification::all() {
        let count = stats.count(classification);
        if count == 0 {
            continue;
        }

        let percentage = (count as f64 / stats.total as f64) * 100.0;
        println!("  {}: {} ({:.1}%)", classification, count, percentage);
    }

    println!(
        "\nReachable: {:.1}% ({} / {} URLs)",
        stats.reachable_rate(),
        stats.reachable(),
        stats.total
    );
}
