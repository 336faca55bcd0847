use crate::config::types::CrawlConfig;
use crate::ConfigError;
use std::time::Duration;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &CrawlConfig) -> Result<(), ConfigError> {
    validate_seed_url(&config.seed_url)?;
    validate_user_agent(&config.user_agent)?;
    validate_output_dir(config)?;
    validate_limits(config)?;
    Ok(())
}

/// Validates the seed URL: HTTP(S) with a host
fn validate_seed_url(url: &Url) -> Result<(), ConfigError> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "Seed URL '{}' must use the http or https scheme",
            url
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(ConfigError::InvalidUrl(format!(
            "Seed URL '{}' has no host",
            url
        )));
    }

    Ok(())
}

/// Validates the user agent; it ends up in a header, so no control characters
fn validate_user_agent(agent: &str) -> Result<(), ConfigError> {
    if agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if agent.chars().any(char::is_control) {
        return Err(ConfigError::Validation(format!(
            "user_agent must not contain control characters, got {:?}",
            agent
        )));
    }

    Ok(())
}

fn validate_output_dir(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.output_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output_dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates worker count, queue capacity and timing limits
fn validate_limits(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.workers < 1 {
        return Err(ConfigError::Validation(format!(
            "workers must be >= 1, got {}",
            config.workers
        )));
    }

    // Every worker may hold a pending send; a smaller queue invites stalls.
    if config.queue_capacity < config.workers {
        return Err(ConfigError::Validation(format!(
            "queue_capacity must be >= workers ({}), got {}",
            config.workers, config.queue_capacity
        )));
    }

    if config.request_timeout == Duration::ZERO {
        return Err(ConfigError::Validation(
            "request timeout must be greater than zero".to_string(),
        ));
    }

    if config.deadline == Duration::ZERO {
        return Err(ConfigError::Validation(
            "deadline must be greater than zero".to_string(),
        ));
    }

    Ok(())
}
