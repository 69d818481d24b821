//! Batch runner
//!
//! Feeds a list of candidate URLs one at a time through the stage pipeline,
//! skipping URLs already present in the campaign, reporting cumulative
//! progress, and collecting results in submission order. One bad URL never
//! aborts the rest of the batch.

use crate::model::{LinkResult, StageConfig, StageOutcome};
use crate::pipeline::context::AmplifyContext;
use crate::pipeline::events::EventSink;
use crate::pipeline::processor::LinkProcessor;
use crate::LinkampError;
use chrono::Utc;
use std::collections::HashSet;

/// Runs the amplification batch over `urls` in input order
///
/// URLs present in `existing_urls` are skipped (exact string match, no
/// normalization) and omitted from the output; the remaining results appear
/// in submission order. Progress events carry the count of processed URLs
/// over the full submitted total, so a batch with skips finishes below
/// `total`. Deliberate: skips were never processed.
///
/// # Errors
///
/// * `LinkampError::Configuration` - Validation is enabled but the target
///   domain is empty. Rejected before any network activity.
pub async fn run_batch(
    ctx: &AmplifyContext,
    urls: &[String],
    target_domain: &str,
    stages: StageConfig,
    existing_urls: &HashSet<String>,
    events: &EventSink,
) -> Result<Vec<LinkResult>, LinkampError> {
    if stages.validate && target_domain.trim().is_empty() {
        let message = "validation is enabled but no target domain was provided";
        events.error(message);
        return Err(LinkampError::Configuration(message.to_string()));
    }

    events.info(format!(
        "Starting batch of {} URL(s) for target domain \"{}\".",
        urls.len(),
        target_domain
    ));

    let processor = LinkProcessor::new(ctx, target_domain, stages, events);
    let total = urls.len();
    let mut completed = 0;
    let mut results = Vec::new();

    for url in urls {
        if existing_urls.contains(url) {
            events.info(format!("Skipping {}: already in campaign.", url));
            continue;
        }

        let result = match processor.process(url).await {
            Ok(result) => result,
            Err(e) => {
                events.error(format!(
                    "A critical error occurred processing {}: {}",
                    url, e
                ));
                critical_result(url, &e)
            }
        };

        results.push(result);
        completed += 1;
        events.progress(completed, total);
    }

    events.success(format!(
        "Batch complete: {} processed, {} skipped.",
        completed,
        total - completed
    ));
    tracing::info!(
        processed = completed,
        skipped = total - completed,
        "Batch run finished"
    );

    Ok(results)
}

/// Builds the record for a URL whose pass aborted on an unexpected fault
///
/// Validation is marked failed, every other stage NotRun, and the record
/// carries the critical marker so the failure is distinguishable from an
/// ordinary stage failure.
fn critical_result(url: &str, error: &LinkampError) -> LinkResult {
    let marker = LinkampError::Critical {
        url: url.to_string(),
        message: error.to_string(),
    };

    let mut result = LinkResult::new(url);
    result.validation = StageOutcome::Failure;
    result.critical = true;
    result.record_error(marker.to_string());
    result.last_processed_at = Some(Utc::now());
    result
}
