//! CSV export of campaign link results
//!
//! Produces a flattened projection with a fixed column order. Field quoting
//! follows RFC 4180 (the csv crate doubles embedded quotes and wraps fields
//! containing commas, quotes, or newlines). Sentinel renderings like
//! "no title" and "-" exist only in this projection; the data model keeps
//! proper optionals and enums.

use crate::model::{LinkResult, LinkType, StageOutcome};
use crate::LinkampError;
use std::io::Write;
use std::path::Path;

/// Fixed CSV header
const HEADER: [&str; 9] = [
    "URL",
    "Status",
    "Validation",
    "Link Type",
    "Anchor Text",
    "Page Title",
    "Notify Status",
    "Short URL",
    "Last Checked",
];

/// Writes a campaign's link results as CSV to the given writer
pub fn write_links_csv<W: Write>(writer: W, links: &[LinkResult]) -> Result<(), LinkampError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(HEADER)?;

    for link in links {
        let checked = checked_field(link);
        csv_writer.write_record([
            link.url.as_str(),
            status_field(link),
            outcome_field(link.validation),
            link_type_field(link.link_type),
            link.anchor_text.as_deref().unwrap_or("-"),
            link.page_title.as_deref().unwrap_or("no title"),
            outcome_field(link.search_notify),
            link.short_url.as_deref().unwrap_or("-"),
            checked.as_str(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Exports a campaign's link results to a CSV file on disk
pub fn export_campaign_csv(path: &Path, links: &[LinkResult]) -> Result<(), LinkampError> {
    let file = std::fs::File::create(path)?;
    write_links_csv(file, links)
}

/// Overall row status: critical faults trump stage failures
fn status_field(link: &LinkResult) -> &'static str {
    if link.critical {
        "CRITICAL"
    } else if link.has_failure() {
        "FAILED"
    } else {
        "OK"
    }
}

fn outcome_field(outcome: StageOutcome) -> &'static str {
    match outcome {
        StageOutcome::NotRun => "-",
        StageOutcome::Success => "success",
        StageOutcome::Failure => "failure",
    }
}

fn link_type_field(link_type: LinkType) -> &'static str {
    match link_type {
        LinkType::Dofollow => "dofollow",
        LinkType::Nofollow => "nofollow",
        LinkType::Unknown => "-",
    }
}

fn checked_field(link: &LinkResult) -> String {
    link.last_checked_at
        .map(|ts| ts.to_rfc3339())
        .unwrap_or_else(|| "never".to_string())
}
