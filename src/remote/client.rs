//! Shared HTTP client construction
//!
//! All remote adapters go through one reqwest client carrying the tool's
//! user agent and the configured timeouts. Individual request timeouts are
//! the only guard on a stuck endpoint; there is no whole-batch timeout.

use crate::config::HttpConfig;
use reqwest::Client;
use std::time::Duration;

/// Builds the HTTP client used by all remote adapters
///
/// User agent format: `Name/Version (+ContactURL)`
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    let user_agent = format!(
        "{}/{} (+{})",
        config.agent_name, config.agent_version, config.contact_url
    );

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}
