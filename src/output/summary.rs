//! Post-batch summary report
//!
//! Renders the per-URL outcome table shown after a batch run, plus the
//! aggregate counts. Text-mode counterpart of the source tool's summary
//! table.

use crate::model::{LinkResult, StageOutcome};

/// Renders the summary table for a set of link results
pub fn render_summary(links: &[LinkResult]) -> String {
    let mut out = String::new();

    out.push_str("=== Amplification Summary ===\n\n");

    if links.is_empty() {
        out.push_str("No URLs were processed.\n");
        return out;
    }

    out.push_str(&format!(
        "{:<50} {:>10} {:>10} {:>10} {:<30}\n",
        "Backlink URL", "Validation", "Notify", "Aggregator", "Short URL"
    ));

    for link in links {
        let short_url = if link.short_link == StageOutcome::Failure {
            "error"
        } else {
            link.short_url.as_deref().unwrap_or("-")
        };

        out.push_str(&format!(
            "{:<50} {:>10} {:>10} {:>10} {:<30}\n",
            truncate(&link.url, 50),
            mark(link.validation),
            mark(link.search_notify),
            mark(link.aggregator_ping),
            short_url
        ));
    }

    let live = links.iter().filter(|l| l.live == Some(true)).count();
    let failed = links.iter().filter(|l| l.has_failure()).count();
    let critical = links.iter().filter(|l| l.critical).count();

    out.push_str(&format!(
        "\n{} processed, {} live, {} with failures",
        links.len(),
        live,
        failed
    ));
    if critical > 0 {
        out.push_str(&format!(", {} critical", critical));
    }
    out.push('\n');

    out
}

/// Prints the summary table to stdout
pub fn print_summary(links: &[LinkResult]) {
    print!("{}", render_summary(links));
}

fn mark(outcome: StageOutcome) -> &'static str {
    match outcome {
        StageOutcome::NotRun => "-",
        StageOutcome::Success => "ok",
        StageOutcome::Failure => "fail",
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
