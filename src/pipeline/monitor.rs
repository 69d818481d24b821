//! Monitoring runner
//!
//! Re-validates every previously stored link: liveness, title, anchor and
//! link-type classification only. The notify/ping/shorten outcomes recorded
//! by the original amplification pass are never touched, and there is no
//! early-exit, since validation is the only stage here.

use crate::model::{LinkResult, StageOutcome};
use crate::pipeline::context::AmplifyContext;
use crate::pipeline::events::EventSink;
use crate::validator::validate_backlink;
use crate::LinkampError;
use chrono::Utc;
use std::time::Duration;

/// Re-checks every stored link against the target domain
///
/// Takes the campaign's stored results and returns them with the liveness
/// fields (`live`, `page_title`, `anchor_text`, `link_type`) and
/// `last_checked_at` overwritten. Pacing and progress behave as in the
/// batch runner; every entry counts as processed.
///
/// # Errors
///
/// * `LinkampError::Configuration` - The campaign's target domain is empty.
pub async fn run_monitor(
    ctx: &AmplifyContext,
    mut results: Vec<LinkResult>,
    target_domain: &str,
    events: &EventSink,
) -> Result<Vec<LinkResult>, LinkampError> {
    if target_domain.trim().is_empty() {
        let message = "monitoring requires a non-empty target domain";
        events.error(message);
        return Err(LinkampError::Configuration(message.to_string()));
    }

    events.info(format!(
        "Re-checking {} stored link(s) against \"{}\".",
        results.len(),
        target_domain
    ));

    let total = results.len();
    let delay = Duration::from_millis(ctx.pacing.stage_delay_ms);

    for (index, result) in results.iter_mut().enumerate() {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        events.info(format!("Re-checking: {}...", result.url));

        result.reset_liveness();
        match validate_backlink(&ctx.client, &ctx.remote, &result.url, target_domain).await {
            Ok(validation) => {
                result.validation = StageOutcome::Success;
                result.live = Some(true);
                result.page_title = validation.page_title;
                result.anchor_text = Some(validation.anchor_text);
                result.link_type = validation.link_type;
                events.success(format!("{} is live.", result.url));
            }
            Err(e) => {
                result.validation = StageOutcome::Failure;
                result.live = Some(false);
                events.error(format!("{} failed the check: {}", result.url, e));
            }
        }
        result.last_checked_at = Some(Utc::now());

        events.progress(index + 1, total);
    }

    events.success(format!("Monitoring complete: {} link(s) checked.", total));
    tracing::info!(checked = total, "Monitoring run finished");

    Ok(results)
}
