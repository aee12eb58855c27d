//! Probe outcome and mode definitions
//!
//! Every probe ends in exactly one [`Classification`]; transport failures are
//! data here, not errors.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Report token for a URL that could not be fetched
pub const DOES_NOT_EXIST_TOKEN: &str = "Don't Exist";

/// Outcome of probing a single URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Classification {
    /// The URL answered with some HTTP response
    Exists,

    /// The URL could not be fetched (DNS, connect, TLS, timeout, malformed URL)
    DoesNotExist,

    /// The page was fetched and its metadata carries the marker token
    Responsive,

    /// The page was fetched but no metadata element carries the marker token
    NotResponsive,
}

impl Classification {
    /// Returns the literal token written to the report for this outcome
    pub fn as_report_str(&self) -> &'static str {
        match self {
            Self::Exists => "Exists",
            Self::DoesNotExist => DOES_NOT_EXIST_TOKEN,
            Self::Responsive => "True",
            Self::NotResponsive => "False",
        }
    }

    /// Returns true if the URL was reachable
    pub fn is_reachable(&self) -> bool {
        !matches!(self, Self::DoesNotExist)
    }

    /// Returns true if a probe running in `mode` can produce this outcome
    pub fn belongs_to(&self, mode: ProbeMode) -> bool {
        match mode {
            ProbeMode::Existence => matches!(self, Self::Exists | Self::DoesNotExist),
            ProbeMode::Responsiveness => !matches!(self, Self::Exists),
        }
    }

    /// Returns every classification in report order
    pub fn all() -> [Self; 4] {
        [
            Self::Exists,
            Self::Responsive,
            Self::NotResponsive,
            Self::DoesNotExist,
        ]
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_report_str())
    }
}

/// Which classifier a run uses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeMode {
    /// Connection-level probe: any response means the URL exists
    #[default]
    Existence,

    /// Fetch the page and look for the marker token in its metadata
    Responsiveness,
}

impl ProbeMode {
    /// Returns the config/CLI spelling of the mode
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Existence => "existence",
            Self::Responsiveness => "responsiveness",
        }
    }

    /// Header row written to the report when the config does not set one
    pub fn default_header(&self) -> [&'static str; 2] {
        match self {
            Self::Existence => ["HTML-Address", "Exist / Don't Exist"],
            Self::Responsiveness => [
                "URL's",
                "Responsive for Smartphones / Tablets (viewport)",
            ],
        }
    }
}

impl fmt::Display for ProbeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProbeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "existence" => Ok(Self::Existence),
            "responsiveness" => Ok(Self::Responsiveness),
            other => Err(format!(
                "unknown probe mode '{}', expected 'existence' or 'responsiveness'",
                other
            )),
        }
    }
}
