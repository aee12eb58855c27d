//! Probe module: classifying a single URL
//!
//! This module contains:
//! - The [`Classification`] outcome type and [`ProbeMode`]
//! - The [`Classifier`] contract with its existence and responsiveness probes
//! - HTTP client construction
//! - Metadata inspection used by the responsiveness probe

mod classification;
mod classifier;
mod client;
mod inspect;

pub use classification::{Classification, ProbeMode, DOES_NOT_EXIST_TOKEN};
pub use classifier::{Classifier, ExistenceProbe, ResponsivenessProbe, MAX_INSPECTED_BYTES};
pub use client::{build_http_client, user_agent_string};
pub use inspect::MarkerInspector;

use crate::config::{ProbeConfig, UserAgentConfig};
use crate::{ConfigError, SweepError};
use std::sync::Arc;

/// One classified URL
///
/// `position` is the URL's index in the submitted batch. It only breaks ties
/// between textually identical URLs when the report is sorted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub url: String,
    pub position: usize,
    pub outcome: Classification,
}

impl ProbeResult {
    pub fn new(url: impl Into<String>, position: usize, outcome: Classification) -> Self {
        Self {
            url: url.into(),
            position,
            outcome,
        }
    }

    /// The `(url, token)` pair handed to the report writer
    pub fn report_row(&self) -> (&str, &'static str) {
        (&self.url, self.outcome.as_report_str())
    }
}

/// Builds the classifier for the configured mode
///
/// # Returns
///
/// * `Ok(Arc<dyn Classifier>)` - Ready to hand to the dispatcher
/// * `Err(SweepError)` - The HTTP client or marker selector could not be built
pub fn build_classifier(
    probe: &ProbeConfig,
    user_agent: &UserAgentConfig,
) -> Result<Arc<dyn Classifier>, SweepError> {
    let client = build_http_client(user_agent, probe)?;

    let classifier: Arc<dyn Classifier> = match probe.mode {
        ProbeMode::Existence => Arc::new(
            ExistenceProbe::new(client).error_status_means_missing(probe.error_status_means_missing),
        ),
        ProbeMode::Responsiveness => {
            let inspector = MarkerInspector::new(&probe.marker_tag, &probe.marker_token)
                .map_err(ConfigError::InvalidSelector)?;
            Arc::new(ResponsivenessProbe::new(client, inspector))
        }
    };

    Ok(classifier)
}
