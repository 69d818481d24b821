//! Stage pipeline for a single URL
//!
//! Runs one backlink URL through the ordered stage sequence:
//! validation, search engine notification, aggregator ping, URL shortening.
//! Validation is the gating stage: when it fails, every later stage is left
//! NotRun and the pass returns immediately. Every other stage failure is
//! recorded as data and never halts the pass.
//!
//! A fixed pacing delay runs before each stage as a courtesy toward the
//! third-party endpoints; it is configurable and zero in tests.

use crate::config::OperationMode;
use crate::model::{LinkResult, StageConfig, StageOutcome};
use crate::pipeline::context::AmplifyContext;
use crate::pipeline::events::EventSink;
use crate::remote::{notify_search_engine, shorten_url, submit_to_aggregator, AggregatorAck};
use crate::validator::validate_backlink;
use crate::LinkampError;
use chrono::Utc;
use std::time::Duration;

/// Runs the stage pipeline for single URLs within one batch run
///
/// Holds everything that is constant across the run: the shared HTTP client
/// and endpoints, the target domain, the stage toggles, and the event sink.
pub struct LinkProcessor<'a> {
    ctx: &'a AmplifyContext,
    target_domain: &'a str,
    stages: StageConfig,
    events: &'a EventSink,
}

impl<'a> LinkProcessor<'a> {
    pub fn new(
        ctx: &'a AmplifyContext,
        target_domain: &'a str,
        stages: StageConfig,
        events: &'a EventSink,
    ) -> Self {
        Self {
            ctx,
            target_domain,
            stages,
            events,
        }
    }

    /// Executes the full amplification sequence for one URL
    ///
    /// Always returns a complete [`LinkResult`]; adapter failures are data,
    /// not errors. The `Err` branch exists for unexpected internal faults
    /// and is converted into a critical result by the batch runner.
    pub async fn process(&self, url: &str) -> Result<LinkResult, LinkampError> {
        let mut result = LinkResult::new(url);

        self.events
            .info(format!("--- Starting amplification for: {} ---", url));

        if self.stages.validate {
            let keep_going = self.run_validation(&mut result).await;
            if !keep_going {
                result.last_processed_at = Some(Utc::now());
                return Ok(result);
            }
        }

        if self.stages.search_notify {
            self.run_search_notify(&mut result).await;
        }

        if self.stages.aggregator_ping {
            self.run_aggregator_ping(&mut result).await;
        }

        if self.stages.short_link {
            self.run_short_link(&mut result).await;
        }

        self.events
            .info(format!("--- Finished amplification for: {} ---", url));
        result.last_processed_at = Some(Utc::now());
        Ok(result)
    }

    /// Gating stage. Returns false when the pipeline must early-exit.
    async fn run_validation(&self, result: &mut LinkResult) -> bool {
        self.pace().await;
        self.events.info(format!("Validating: {}...", result.url));

        match validate_backlink(
            &self.ctx.client,
            &self.ctx.remote,
            &result.url,
            self.target_domain,
        )
        .await
        {
            Ok(validation) => {
                result.validation = StageOutcome::Success;
                result.live = Some(true);
                result.page_title = validation.page_title;
                result.anchor_text = Some(validation.anchor_text);
                result.link_type = validation.link_type;
                result.last_checked_at = Some(Utc::now());
                self.events.success("Backlink validated successfully.");
                true
            }
            Err(e) => {
                result.validation = StageOutcome::Failure;
                result.live = Some(false);
                result.record_error(e.to_string());
                result.last_checked_at = Some(Utc::now());
                self.events.error(format!("Validation failed: {}", e));
                self.events.warning(format!(
                    "--- Halting amplification for {} after validation failure. ---",
                    result.url
                ));
                false
            }
        }
    }

    async fn run_search_notify(&self, result: &mut LinkResult) {
        self.pace().await;

        // Privacy mode forbids this stage outright; configuration-level
        // failure, no network call.
        if self.ctx.operation_mode == OperationMode::Privacy {
            result.search_notify = StageOutcome::Failure;
            result.record_error("search notification disabled by privacy mode");
            self.events
                .error("Search notification is disabled by privacy mode.");
            return;
        }

        self.events
            .info(format!("Notifying search engine for: {}...", result.url));

        match notify_search_engine(
            &self.ctx.client,
            &self.ctx.remote,
            &result.url,
            self.ctx.credential.as_deref(),
        )
        .await
        {
            Ok(()) => {
                result.search_notify = StageOutcome::Success;
                self.events.success("Search engine notified.");
            }
            Err(e) => {
                result.search_notify = StageOutcome::Failure;
                result.record_error(e.to_string());
                self.events
                    .error(format!("Search engine notification failed: {}", e));
            }
        }
    }

    async fn run_aggregator_ping(&self, result: &mut LinkResult) {
        self.pace().await;
        self.events
            .info(format!("Submitting to ping aggregator: {}...", result.url));

        match submit_to_aggregator(&self.ctx.client, &self.ctx.remote, &result.url).await {
            Ok(AggregatorAck::Confirmed) => {
                result.aggregator_ping = StageOutcome::Success;
                self.events.success("Aggregator ping confirmed.");
            }
            Ok(AggregatorAck::Unconfirmed) => {
                // Optimistic success: the aggregator rarely confirms receipt
                result.aggregator_ping = StageOutcome::Success;
                self.events
                    .warning("Could not confirm aggregator receipt, but the request was sent.");
            }
            Err(e) => {
                result.aggregator_ping = StageOutcome::Failure;
                result.record_error(e.to_string());
                self.events
                    .error(format!("Aggregator submission failed: {}", e));
            }
        }
    }

    async fn run_short_link(&self, result: &mut LinkResult) {
        self.pace().await;
        self.events
            .info(format!("Creating short URL for: {}...", result.url));

        let fallback_delay = Duration::from_millis(self.ctx.pacing.fallback_delay_ms);

        match shorten_url(
            &self.ctx.client,
            &self.ctx.remote,
            &result.url,
            fallback_delay,
        )
        .await
        {
            Ok(short_url) => {
                result.short_link = StageOutcome::Success;
                self.events
                    .success(format!("Short URL created: {}", short_url));
                result.short_url = Some(short_url);
            }
            Err(e) => {
                result.short_link = StageOutcome::Failure;
                result.record_error(e.to_string());
                self.events
                    .error(format!("Failed to create short URL: {}", e));
            }
        }
    }

    /// Courtesy delay before each stage
    async fn pace(&self) {
        let delay = self.ctx.pacing.stage_delay_ms;
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
    }
}
