//! Link validator
//!
//! Composes the page fetch adapter with a markup scan to decide whether a
//! backlink page is live and actually links to the target domain, and to
//! classify the link it found.
//!
//! The scan is syntactic: first matching anchor in document order wins, the
//! page title comes from the first `<title>` element, and the rel attribute
//! decides dofollow/nofollow. The matching rules live in the matcher
//! submodule.

mod matcher;

pub use matcher::{href_matches_target, rel_is_nofollow};

use crate::config::RemoteConfig;
use crate::model::LinkType;
use crate::remote::fetch_page;
use crate::LinkampError;
use reqwest::Client;
use scraper::{Html, Selector};

/// Marker stored when the matching anchor has no text content
pub const EMPTY_ANCHOR_MARKER: &str = "(empty anchor)";

/// Metadata extracted by a successful validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    /// First `<title>` element content, trimmed; None when absent or empty
    pub page_title: Option<String>,

    /// Text content of the matching anchor, or [`EMPTY_ANCHOR_MARKER`]
    pub anchor_text: String,

    /// Dofollow unless the anchor's rel attribute carries a nofollow token
    pub link_type: LinkType,
}

/// Validates that a backlink page links to the target domain
///
/// # Errors
///
/// * `LinkampError::Network` - Page could not be fetched
/// * `LinkampError::LinkNotFound` - Page fetched, but no anchor references
///   the target domain
pub async fn validate_backlink(
    client: &Client,
    remote: &RemoteConfig,
    url: &str,
    target_domain: &str,
) -> Result<Validation, LinkampError> {
    let html = fetch_page(client, remote, url).await?;

    scan_markup(&html, target_domain).ok_or_else(|| LinkampError::LinkNotFound {
        url: url.to_string(),
        target_domain: target_domain.to_string(),
    })
}

/// Scans markup for the first anchor referencing the target domain
///
/// Returns None when no anchor matches. Pure and synchronous so the parsed
/// document never lives across a suspension point.
pub fn scan_markup(html: &str, target_domain: &str) -> Option<Validation> {
    let document = Html::parse_document(html);

    let page_title = extract_title(&document);
    let (anchor_text, link_type) = find_target_anchor(&document, target_domain)?;

    Some(Validation {
        page_title,
        anchor_text,
        link_type,
    })
}

/// Extracts the page title from the first title element
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Finds the first anchor whose href references the target domain
///
/// Anchors are visited in document order; the first match wins.
fn find_target_anchor(document: &Html, target_domain: &str) -> Option<(String, LinkType)> {
    let a_selector = Selector::parse("a[href]").ok()?;

    for element in document.select(&a_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        if !href_matches_target(href, target_domain) {
            continue;
        }

        let text = element.text().collect::<String>().trim().to_string();
        let anchor_text = if text.is_empty() {
            EMPTY_ANCHOR_MARKER.to_string()
        } else {
            text
        };

        let link_type = if rel_is_nofollow(element.value().attr("rel")) {
            LinkType::Nofollow
        } else {
            LinkType::Dofollow
        };

        return Some((anchor_text, link_type));
    }

    None
}
