//! Ping aggregator adapter
//!
//! Submits a URL to the configured ping aggregator. The aggregator service
//! is known to be unreliable about confirming receipt, so a 2xx response
//! without the confirmation marker is still treated as a success; the
//! caller is told the ack was missing and logs a warning.

use crate::config::RemoteConfig;
use crate::remote::expand_endpoint;
use crate::LinkampError;
use reqwest::Client;

/// How the aggregator acknowledged a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregatorAck {
    /// Response contained the configured confirmation marker
    Confirmed,

    /// Request was accepted (2xx) but receipt was not confirmed
    Unconfirmed,
}

/// Submits a URL to the ping aggregator
///
/// # Returns
///
/// * `Ok(AggregatorAck)` - The request was delivered; see the ack variant
/// * `Err(LinkampError::Network)` - Transport failure or non-2xx status
pub async fn submit_to_aggregator(
    client: &Client,
    remote: &RemoteConfig,
    url: &str,
) -> Result<AggregatorAck, LinkampError> {
    let endpoint = expand_endpoint(&remote.aggregator_url, url);

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

    if body.contains(&remote.aggregator_ack_marker) {
        Ok(AggregatorAck::Confirmed)
    } else {
        Ok(AggregatorAck::Unconfirmed)
    }
}
