//! URL shortening adapter
//!
//! Attempts the primary shortening provider first; on any failure (transport,
//! non-2xx, malformed body) it waits a fixed backoff and tries the fallback
//! provider exactly once. A double failure reports both error messages.

use crate::config::RemoteConfig;
use crate::remote::expand_endpoint;
use crate::LinkampError;
use reqwest::Client;
use std::time::Duration;

/// Creates a short URL for a backlink
///
/// # Arguments
///
/// * `fallback_delay` - Backoff slept between the primary failure and the
///   single fallback attempt (zero in tests)
///
/// # Returns
///
/// * `Ok(String)` - The short URL (from whichever provider succeeded)
/// * `Err(LinkampError::Remote)` - Both providers failed; the message
///   concatenates both errors
pub async fn shorten_url(
    client: &Client,
    remote: &RemoteConfig,
    url: &str,
    fallback_delay: Duration,
) -> Result<String, LinkampError> {
    let primary_err = match request_short_url(client, &remote.shortener_url, url).await {
        Ok(short_url) => return Ok(short_url),
        Err(e) => e,
    };

    tracing::debug!(
        url = %url,
        error = %primary_err,
        "Primary shortener failed, trying fallback"
    );
    tokio::time::sleep(fallback_delay).await;

    match request_short_url(client, &remote.shortener_fallback_url, url).await {
        Ok(short_url) => Ok(short_url),
        Err(fallback_err) => Err(LinkampError::Remote {
            service: "URL shortener".to_string(),
            message: format!("primary: {}; fallback: {}", primary_err, fallback_err),
        }),
    }
}

/// Single shortening attempt against one provider
///
/// The provider answers with the short URL as a plain-text body; anything
/// that does not start with `http` is a malformed response.
async fn request_short_url(
    client: &Client,
    template: &str,
    url: &str,
) -> Result<String, LinkampError> {
    let endpoint = expand_endpoint(template, url);

    let response = client
        .get(&endpoint)
        .send()
        .await
        .map_err(|e| LinkampError::Network {
            url: url.to_string(),
            message: e.to_string(),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(LinkampError::Network {
            url: url.to_string(),
            message: format!("HTTP {}", status.as_u16()),
        });
    }

    let body = response.text().await.map_err(|e| LinkampError::Network {
        url: url.to_string(),
        message: e.to_string(),
    })?;

    let short_url = body.trim();
    if short_url.starts_with("http") {
        Ok(short_url.to_string())
    } else {
        Err(LinkampError::Remote {
            service: "URL shortener".to_string(),
            message: format!("invalid response: {}", truncate(short_url, 80)),
        })
    }
}

/// Truncates a response body snippet for error messages
fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
