use crate::config::types::{Config, FetcherConfig, HarvestConfig, OutputConfig};
use crate::ConfigError;

/// Upper bound on the per-request timeout
const MAX_TIMEOUT_SECS: u64 = 300;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetcher_config(&config.fetcher)?;
    validate_harvest_config(&config.harvest)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates fetcher configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 || config.timeout_secs > MAX_TIMEOUT_SECS {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be between 1 and {}, got {}",
            MAX_TIMEOUT_SECS, config.timeout_secs
        )));
    }

    Ok(())
}

/// Validates harvest configuration
fn validate_harvest_config(config: &HarvestConfig) -> Result<(), ConfigError> {
    // max_depth <= 0 means unlimited, so every value is accepted

    for keyword in &config.topic_keywords {
        validate_topic_keyword(keyword)?;
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.document_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "document-path cannot be empty".to_string(),
        ));
    }

    if config.flush_interval_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "flush-interval-secs must be >= 1, got {}",
            config.flush_interval_secs
        )));
    }

    Ok(())
}

/// Validates a single topic keyword (non-empty, no path separator)
fn validate_topic_keyword(keyword: &str) -> Result<(), ConfigError> {
    if keyword.trim().is_empty() {
        return Err(ConfigError::Validation(
            "topic keywords cannot be empty".to_string(),
        ));
    }

    if keyword.contains('/') {
        return Err(ConfigError::Validation(format!(
            "topic keyword '{}' must not contain '/'",
            keyword
        )));
    }

    Ok(())
}
