//! Report module: from unordered completions to the final report
//!
//! This module handles:
//! - Sorting probe results into deterministic report order
//! - Writing the report as a delimited file
//! - Summary statistics over the report

mod aggregate;
pub mod stats;
mod writer;

pub use aggregate::{aggregate, collect, ReportRows};
pub use stats::{print_statistics, ProbeStatistics};
pub use writer::{write_report, write_rows};
