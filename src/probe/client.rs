//! HTTP client construction
//!
//! One client is built per run and shared by every worker. Request and
//! connect timeouts are always set from the probe config; TLS and redirect
//! handling stay at reqwest's defaults.

use crate::config::{ProbeConfig, UserAgentConfig};
use reqwest::Client;
use std::time::Duration;

/// Formats the User-Agent header: `Name/Version` or `Name/Version (+ContactURL)`
pub fn user_agent_string(config: &UserAgentConfig) -> String {
    match &config.contact_url {
        Some(contact) => format!("{}/{} (+{})", config.name, config.version, contact),
        None => format!("{}/{}", config.name, config.version),
    }
}

/// Builds the HTTP client used by both classifiers
///
/// # Arguments
///
/// * `user_agent` - Identification sent with every probe
/// * `probe` - Supplies the request and connect timeouts
///
/// # Example
///
/// ```no_run
/// use url_sweep::config::{ProbeConfig, UserAgentConfig};
/// use url_sweep::probe::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), &ProbeConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    probe: &ProbeConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent_string(user_agent))
        .timeout(Duration::from_secs(probe.request_timeout_secs))
        .connect_timeout(Duration::from_secs(probe.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}
