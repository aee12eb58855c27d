//! Classifier contract and its two HTTP-backed implementations
//!
//! A classifier performs one fetch per call and always answers with a
//! [`Classification`]. Anything that goes wrong on the wire ends up as
//! [`Classification::DoesNotExist`].

use crate::probe::classification::Classification;
use crate::probe::inspect::MarkerInspector;
use async_trait::async_trait;
use reqwest::{Client, Response};

/// Upper bound on the body bytes read and parsed per page
pub const MAX_INSPECTED_BYTES: usize = 512 * 1024;

const HEAD_END: &[u8] = b"</head>";

/// Turns a URL into a classification
///
/// Implementations must not panic on bad input and must not block
/// indefinitely; the per-request timeout of the transport bounds each call.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Probes `url` once and classifies the outcome
    async fn classify(&self, url: &str) -> Classification;
}

/// Connection-level probe: any HTTP response means the URL exists
#[derive(Debug, Clone)]
pub struct ExistenceProbe {
    client: Client,
    error_status_means_missing: bool,
}

impl ExistenceProbe {
    /// Creates a probe that treats every HTTP response as `Exists`
    pub fn new(client: Client) -> Self {
        Self {
            client,
            error_status_means_missing: false,
        }
    }

    /// Also map 4xx/5xx responses to `DoesNotExist`
    pub fn error_status_means_missing(mut self, enabled: bool) -> Self {
        self.error_status_means_missing = enabled;
        self
    }
}

#[async_trait]
impl Classifier for ExistenceProbe {
    async fn classify(&self, url: &str) -> Classification {
        match self.client.get(url).send().await {
            Ok(response) => {
                let status = response.status();
                if self.error_status_means_missing
                    && (status.is_client_error() || status.is_server_error())
                {
                    tracing::debug!("{} answered {}, counting as missing", url, status);
                    Classification::DoesNotExist
                } else {
                    Classification::Exists
                }
            }
            Err(e) => {
                tracing::debug!("Fetch failed for {}: {}", url, describe_error(&e));
                Classification::DoesNotExist
            }
        }
    }
}

/// Fetches the page and looks for the marker token in its metadata tags
#[derive(Debug, Clone)]
pub struct ResponsivenessProbe {
    client: Client,
    inspector: MarkerInspector,
}

impl ResponsivenessProbe {
    pub fn new(client: Client, inspector: MarkerInspector) -> Self {
        Self { client, inspector }
    }
}

#[async_trait]
impl Classifier for ResponsivenessProbe {
    async fn classify(&self, url: &str) -> Classification {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("Fetch failed for {}: {}", url, describe_error(&e));
                return Classification::DoesNotExist;
            }
        };

        let body = match read_head(response, MAX_INSPECTED_BYTES).await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!("Body read failed for {}: {}", url, describe_error(&e));
                return Classification::DoesNotExist;
            }
        };

        if self.inspector.contains_marker(&body) {
            Classification::Responsive
        } else {
            Classification::NotResponsive
        }
    }
}

/// Reads the body up to `limit` bytes, stopping early once `</head>` is in
async fn read_head(mut response: Response, limit: usize) -> Result<String, reqwest::Error> {
    let mut buf: Vec<u8> = Vec::new();

    while let Some(chunk) = response.chunk().await? {
        let scan_from = buf.len().saturating_sub(HEAD_END.len() - 1);
        buf.extend_from_slice(&chunk);

        if buf.len() >= limit {
            buf.truncate(limit);
            break;
        }
        if contains_head_end(&buf[scan_from..]) {
            break;
        }
    }

    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn contains_head_end(bytes: &[u8]) -> bool {
    bytes
        .windows(HEAD_END.len())
        .any(|window| window.eq_ignore_ascii_case(HEAD_END))
}

/// Short description of a transport error for debug logs
fn describe_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "request timeout".to_string()
    } else if e.is_connect() {
        format!("connection failed ({})", e)
    } else if e.is_builder() {
        format!("malformed URL ({})", e)
    } else {
        e.to_string()
    }
}
