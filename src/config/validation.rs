use crate::config::types::HostConfig;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &HostConfig) -> Result<(), ConfigError> {
    validate_folders(config)?;
    validate_limits(config)?;
    validate_url(&config.url)?;
    config.parameters()?;
    Ok(())
}

fn validate_folders(config: &HostConfig) -> Result<(), ConfigError> {
    if config.output_folder.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output_folder cannot be empty".to_string(),
        ));
    }

    if config.log_folder.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "log_folder cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_limits(config: &HostConfig) -> Result<(), ConfigError> {
    if config.bulk_size < 1 {
        return Err(ConfigError::Validation(format!(
            "bulk_size must be >= 1, got {}",
            config.bulk_size
        )));
    }

    if config.fetch_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "fetch_timeout_secs must be >= 1, got {}",
            config.fetch_timeout_secs
        )));
    }

    Ok(())
}

/// An empty URL is allowed; sources with a fixed seed ignore it
fn validate_url(url: &str) -> Result<(), ConfigError> {
    if url.is_empty() {
        return Ok(());
    }

    let parsed =
        Url::parse(url).map_err(|e| ConfigError::InvalidUrl(format!("'{}': {}", url, e)))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "'{}' must use http or https",
            url
        )));
    }

    Ok(())
}
