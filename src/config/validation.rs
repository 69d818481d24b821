use crate::config::types::{Config, HttpConfig, RemoteConfig, StorageConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_http_config(&config.http)?;
    validate_remote_config(&config.remote)?;
    validate_storage_config(&config.storage)?;
    Ok(())
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.agent_name.is_empty() {
        return Err(ConfigError::Validation(
            "agent-name cannot be empty".to_string(),
        ));
    }

    if !config
        .agent_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "agent-name must contain only alphanumeric characters and hyphens, got '{}'",
            config.agent_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;

    if config.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "request-timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "connect-timeout-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates remote endpoint templates
fn validate_remote_config(config: &RemoteConfig) -> Result<(), ConfigError> {
    // The fetch proxy is optional; every other endpoint is required
    if !config.fetch_proxy.is_empty() {
        validate_endpoint_template("fetch-proxy", &config.fetch_proxy)?;
    }

    validate_endpoint_template("search-notify-url", &config.search_notify_url)?;
    validate_endpoint_template("aggregator-url", &config.aggregator_url)?;
    validate_endpoint_template("shortener-url", &config.shortener_url)?;
    validate_endpoint_template("shortener-fallback-url", &config.shortener_fallback_url)?;

    Ok(())
}

/// Validates a single `{url}` endpoint template
fn validate_endpoint_template(name: &str, template: &str) -> Result<(), ConfigError> {
    if template.is_empty() {
        return Err(ConfigError::Validation(format!(
            "{} cannot be empty",
            name
        )));
    }

    if !template.contains("{url}") {
        return Err(ConfigError::Validation(format!(
            "{} must contain a {{url}} placeholder, got '{}'",
            name, template
        )));
    }

    // Substituting the placeholder must yield a parseable http(s) URL
    let probe = template.replace("{url}", "http%3A%2F%2Fexample.com%2F");
    let parsed = Url::parse(&probe)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {}: {}", name, e)))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} must be an http(s) endpoint, got scheme '{}'",
            name,
            parsed.scheme()
        )));
    }

    Ok(())
}

/// Validates storage configuration
fn validate_storage_config(config: &StorageConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
