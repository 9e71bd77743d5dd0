use crate::config::types::{CacheConfig, ClientConfig, Config, RefreshConfig, SourcesConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_sources(&config.sources)?;
    validate_client(&config.client)?;
    validate_cache(&config.cache)?;
    validate_refresh(&config.refresh)?;
    Ok(())
}

/// Validates the upstream endpoint URLs
fn validate_sources(config: &SourcesConfig) -> Result<(), ConfigError> {
    for (name, value) in [
        ("codes-url", &config.codes_url),
        ("shrine-url", &config.shrine_url),
        ("news-url", &config.news_url),
    ] {
        let url = Url::parse(value)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {}: {}", name, e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Validation(format!(
                "{} must use HTTP or HTTPS, got '{}'",
                name,
                url.scheme()
            )));
        }
    }

    Ok(())
}

/// Validates client identification
fn validate_client(config: &ClientConfig) -> Result<(), ConfigError> {
    if config.app_name.is_empty() {
        return Err(ConfigError::Validation(
            "app_name cannot be empty".to_string(),
        ));
    }

    if !config
        .app_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "app_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.app_name
        )));
    }

    if config.app_version.is_empty() {
        return Err(ConfigError::Validation(
            "app_version cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout_secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates cache configuration
fn validate_cache(config: &CacheConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates watch-mode configuration
fn validate_refresh(config: &RefreshConfig) -> Result<(), ConfigError> {
    if config.interval_minutes == 0 {
        return Err(ConfigError::Validation(
            "interval_minutes must be >= 1".to_string(),
        ));
    }

    Ok(())
}
