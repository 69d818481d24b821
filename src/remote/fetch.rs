//! Page fetch adapter
//!
//! Retrieves the raw markup of a backlink page, optionally through a
//! configured HTML-fetch proxy. Non-2xx statuses and transport failures are
//! both reported as network errors; the caller never sees a reqwest error
//! directly.

use crate::config::RemoteConfig;
use crate::remote::expand_endpoint;
use crate::LinkampError;
use reqwest::Client;

/// Fetches the markup of a page
///
/// When `remote.fetch_proxy` is set, the request goes through the proxy
/// template; otherwise the URL is fetched directly.
///
/// # Returns
///
/// * `Ok(String)` - The response body
/// * `Err(LinkampError::Network)` - Transport failure or non-2xx status
pub async fn fetch_page(
    client: &Client,
    remote: &RemoteConfig,
    url: &str,
) -> Result<String, LinkampError> {
    let request_url = if remote.fetch_proxy.is_empty() {
        url.to_string()
    } else {
        expand_endpoint(&remote.fetch_proxy, url)
    };

    let response = client
        .get(&request_url)
        .send()
        .await
        .map_err(|e| network_error(url, &e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(LinkampError::Network {
            url: url.to_string(),
            message: format!("HTTP {}", status.as_u16()),
        });
    }

    response.text().await.map_err(|e| network_error(url, &e))
}

/// Classifies a reqwest error into a stable network error message
fn network_error(url: &str, error: &reqwest::Error) -> LinkampError {
    let message = if error.is_timeout() {
        "request timeout".to_string()
    } else if error.is_connect() {
        "connection failed".to_string()
    } else {
        error.to_string()
    };

    LinkampError::Network {
        url: url.to_string(),
        message,
    }
}
