//! Shared helpers for the integration tests

use linkamp::config::Config;
use linkamp::pipeline::AmplifyContext;

/// Builds a config with zero pacing whose remote endpoints all point at the
/// given mock server base URL
pub fn test_config(mock_base: &str) -> Config {
    let mut config = Config::default();

    config.pacing.stage_delay_ms = 0;
    config.pacing.fallback_delay_ms = 0;

    // Backlink pages are fetched directly from the mock server
    config.remote.fetch_proxy = String::new();
    config.remote.search_notify_url = format!("{}/search?u={{url}}", mock_base);
    config.remote.aggregator_url = format!("{}/aggregate?u={{url}}", mock_base);
    config.remote.shortener_url = format!("{}/shorten?u={{url}}", mock_base);
    config.remote.shortener_fallback_url = format!("{}/shorten-fallback?u={{url}}", mock_base);

    config.search.token = Some("test-token".to_string());

    config
}

/// Builds an AmplifyContext for tests
pub fn test_context(mock_base: &str) -> AmplifyContext {
    AmplifyContext::from_config(&test_config(mock_base)).expect("Failed to build context")
}

/// A minimal page containing one anchor to the given href
pub fn page_with_link(title: &str, href: &str, rel: Option<&str>, text: &str) -> String {
    let rel_attr = rel.map(|r| format!(" rel=\"{}\"", r)).unwrap_or_default();
    format!(
        "<html><head><title>{}</title></head><body>\
         <a href=\"{}\"{}>{}</a>\
         </body></html>",
        title, href, rel_attr, text
    )
}
