use crate::probe::ProbeMode;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Worker count used when the config does not set one
pub const DEFAULT_CONCURRENCY: usize = 650;

/// Number of URLs a worker takes from the queue at once
pub const DEFAULT_CHUNK_SIZE: usize = 25;

/// Completions between two progress lines at info level
pub const DEFAULT_PROGRESS_INTERVAL: usize = 100;

/// Whole-request timeout applied when the config does not set one
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Connection timeout applied when the config does not set one
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Main configuration structure for url-sweep
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub probe: ProbeConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Returns the report path, deriving `Parsed-<input name>` beside the
    /// input file when no output path is configured
    pub fn output_path(&self) -> PathBuf {
        if let Some(path) = &self.output.path {
            return PathBuf::from(path);
        }

        let input = Path::new(&self.input.path);
        let file_name = input
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "report.csv".to_string());

        input.with_file_name(format!("Parsed-{}", file_name))
    }

    /// Returns the report header row, falling back to the mode's default
    pub fn output_header(&self) -> Vec<String> {
        match &self.output.header {
            Some(header) => header.clone(),
            None => self
                .probe
                .mode
                .default_header()
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Probe and worker pool behaviour
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProbeConfig {
    /// Which classifier to run
    #[serde(default)]
    pub mode: ProbeMode,

    /// Maximum number of probes in flight at once
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// URLs handed to a worker per queue pull
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Whole-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// CSS selector for the metadata elements inspected in responsiveness mode
    #[serde(default = "default_marker_tag")]
    pub marker_tag: String,

    /// Text that marks a page as responsive
    #[serde(default = "default_marker_token")]
    pub marker_token: String,

    /// Treat 4xx/5xx responses as missing in existence mode
    #[serde(default)]
    pub error_status_means_missing: bool,

    /// Completions between two progress lines
    #[serde(default = "default_progress_interval")]
    pub progress_interval: usize,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            mode: ProbeMode::default(),
            concurrency: DEFAULT_CONCURRENCY,
            chunk_size: DEFAULT_CHUNK_SIZE,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            marker_tag: default_marker_tag(),
            marker_token: default_marker_token(),
            error_status_means_missing: false,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UserAgentConfig {
    /// Name of the prober
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Version of the prober
    #[serde(default = "default_agent_version")]
    pub version: String,

    /// URL with information about who runs the probe
    #[serde(default)]
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            version: default_agent_version(),
            contact_url: None,
        }
    }
}

/// Where the URL list comes from
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct InputConfig {
    /// Path to the delimited URL list
    pub path: String,

    /// Field separator; the URL is the first field of every record
    #[serde(default = "default_separator")]
    pub separator: String,

    /// Whether the first record is a header row
    #[serde(default = "default_skip_header")]
    pub skip_header: bool,
}

/// Where the report goes
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Report file path
    #[serde(default)]
    pub path: Option<String>,

    /// Header row written before the results
    #[serde(default)]
    pub header: Option<Vec<String>>,
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_progress_interval() -> usize {
    DEFAULT_PROGRESS_INTERVAL
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

fn default_marker_tag() -> String {
    "meta".to_string()
}

fn default_marker_token() -> String {
    "viewport".to_string()
}

fn default_agent_name() -> String {
    env!("CARGO_PKG_NAME").to_string()
}

fn default_agent_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_separator() -> String {
    ",".to_string()
}

fn default_skip_header() -> bool {
    true
}
