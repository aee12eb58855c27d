use crate::config::types::{Config, InputConfig, ProbeConfig, UserAgentConfig};
use crate::probe::ProbeMode;
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Upper bound on worker count; beyond this the OS runs out of sockets first
const MAX_CONCURRENCY: usize = 10_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_probe_config(&config.probe)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_input_config(&config.input)?;
    Ok(())
}

/// Validates probe and worker pool settings
fn validate_probe_config(config: &ProbeConfig) -> Result<(), ConfigError> {
    if config.concurrency < 1 || config.concurrency > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY, config.concurrency
        )));
    }

    if config.chunk_size < 1 {
        return Err(ConfigError::Validation(format!(
            "chunk_size must be >= 1, got {}",
            config.chunk_size
        )));
    }

    if config.progress_interval < 1 {
        return Err(ConfigError::Validation(format!(
            "progress_interval must be >= 1, got {}",
            config.progress_interval
        )));
    }

    if config.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be > 0".to_string(),
        ));
    }

    if config.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "connect_timeout_secs must be > 0".to_string(),
        ));
    }

    if config.mode == ProbeMode::Responsiveness {
        if config.marker_token.is_empty() {
            return Err(ConfigError::Validation(
                "marker_token cannot be empty in responsiveness mode".to_string(),
            ));
        }

        Selector::parse(&config.marker_tag).map_err(|e| {
            ConfigError::InvalidSelector(format!("'{}': {:?}", config.marker_tag, e))
        })?;
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.name.is_empty() {
        return Err(ConfigError::Validation(
            "user agent name cannot be empty".to_string(),
        ));
    }

    if !config
        .name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "user agent name must contain only alphanumeric characters, hyphens and underscores, got '{}'",
            config.name
        )));
    }

    if let Some(contact_url) = &config.contact_url {
        Url::parse(contact_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;
    }

    Ok(())
}

/// Validates the input file settings
fn validate_input_config(config: &InputConfig) -> Result<(), ConfigError> {
    if config.path.is_empty() {
        return Err(ConfigError::Validation(
            "input path cannot be empty".to_string(),
        ));
    }

    if config.separator.len() != 1 || !config.separator.is_ascii() {
        return Err(ConfigError::Validation(format!(
            "separator must be a single ASCII character, got '{}'",
            config.separator
        )));
    }

    Ok(())
}
