//! url-sweep: a bounded-concurrency URL prober
//!
//! This crate takes a batch of URLs, probes each one under a fixed worker
//! budget, classifies the outcome, and produces a report sorted by URL.

pub mod batch;
pub mod config;
pub mod dispatch;
pub mod probe;
pub mod report;
pub mod run;

use thiserror::Error;

/// Main error type for url-sweep operations
///
/// Probe failures never show up here: they are folded into
/// [`probe::Classification::DoesNotExist`] by the classifiers.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Input error for {path}: {message}")]
    Input { path: String, message: String },

    #[error("Output error for {path}: {message}")]
    Output { path: String, message: String },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Worker failed: {0}")]
    Worker(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid tag selector: {0}")]
    InvalidSelector(String),
}

/// Result type alias for url-sweep operations
pub type Result<T> = std::result::Result<T, SweepError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use batch::JobBatch;
pub use config::Config;
pub use dispatch::{DispatchHandle, DispatchSettings, Dispatcher, ProgressCounter};
pub use probe::{Classification, Classifier, ProbeMode, ProbeResult};
pub use report::{aggregate, ReportRows};
