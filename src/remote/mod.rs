//! Remote operation adapters
//!
//! One adapter per external capability: page fetching, search engine
//! notification, aggregator pings, and URL shortening. Each adapter is a
//! stateless async operation that converts every transport fault at its own
//! boundary into a uniform `LinkampError`. No fault from a third-party
//! endpoint propagates past these functions as anything else.

mod aggregator;
mod client;
mod fetch;
mod search;
mod shortener;

pub use aggregator::{submit_to_aggregator, AggregatorAck};
pub use client::build_http_client;
pub use fetch::fetch_page;
pub use search::notify_search_engine;
pub use shortener::shorten_url;

/// Percent-encodes a URL for use inside a query string component
pub(crate) fn encode_component(url: &str) -> String {
    url::form_urlencoded::byte_serialize(url.as_bytes()).collect()
}

/// Expands an endpoint template, substituting the percent-encoded backlink
/// URL for every `{url}` placeholder
pub(crate) fn expand_endpoint(template: &str, url: &str) -> String {
    template.replace("{url}", &encode_component(url))
}
