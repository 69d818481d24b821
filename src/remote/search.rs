//! Search engine notification adapter
//!
//! Pings the configured search engine endpoint with a validated backlink
//! URL. The call requires a bearer credential; without one the adapter fails
//! before touching the network.

use crate::config::RemoteConfig;
use crate::remote::expand_endpoint;
use crate::LinkampError;
use reqwest::{Client, StatusCode};

/// Notifies the search engine endpoint about a URL
///
/// # Errors
///
/// * `LinkampError::Auth` - Credential absent, or the service rejected it
/// * `LinkampError::Network` - Transport failure
/// * `LinkampError::Remote` - Service answered but did not acknowledge
pub async fn notify_search_engine(
    client: &Client,
    remote: &RemoteConfig,
    url: &str,
    credential: Option<&str>,
) -> Result<(), LinkampError> {
    let token = credential.ok_or_else(|| {
        LinkampError::Auth("no search credential configured".to_string())
    })?;

    let endpoint = expand_endpoint(&remote.search_notify_url, url);

    let response = client
        .get(&endpoint)
        .bearer_auth(token)
        .send()
        .await
        .map_err(|e| LinkampError::Network {
            url: url.to_string(),
            message: e.to_string(),
        })?;

    let status = response.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(LinkampError::Auth(format!(
            "credential rejected (HTTP {})",
            status.as_u16()
        )));
    }

    if !status.is_success() {
        return Err(LinkampError::Remote {
            service: "search notification".to_string(),
            message: format!("HTTP {}", status.as_u16()),
        });
    }

    let body = response.text().await.map_err(|e| LinkampError::Network {
        url: url.to_string(),
        message: e.to_string(),
    })?;

    if !body.contains(&remote.search_ack_marker) {
        return Err(LinkampError::Remote {
            service: "search notification".to_string(),
            message: "unexpected response from service".to_string(),
        });
    }

    Ok(())
}
