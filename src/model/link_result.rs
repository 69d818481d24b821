//! Per-link result record
//!
//! A `LinkResult` is created fresh for each amplification pass over one URL
//! and never mutated after the pipeline returns it. A monitoring pass instead
//! takes an existing record and overwrites only the liveness fields.

use crate::model::{Stage, StageOutcome};
use chrono::{DateTime, Utc};
use std::fmt;

/// Classification of the anchor that references the target domain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkType {
    /// Anchor carries no nofollow relation
    Dofollow,

    /// Anchor's rel attribute contains a nofollow token
    Nofollow,

    /// Validation has not (successfully) classified the link
    Unknown,
}

impl LinkType {
    /// Converts the link type to a database string representation
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Dofollow => "dofollow",
            Self::Nofollow => "nofollow",
            Self::Unknown => "unknown",
        }
    }

    /// Parses a link type from a database string representation
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "dofollow" => Some(Self::Dofollow),
            "nofollow" => Some(Self::Nofollow),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}

/// The record produced by running the pipeline once over one URL
///
/// Invariants maintained by the pipeline:
/// - a disabled stage is always `NotRun`, never `Success`;
/// - once `validation` is `Failure`, every later stage is `NotRun`;
/// - `live`, `page_title`, `anchor_text` and `link_type` are populated as a
///   unit by the same validation call.
#[derive(Debug, Clone)]
pub struct LinkResult {
    /// The backlink URL as supplied (not normalized)
    pub url: String,

    pub validation: StageOutcome,
    pub search_notify: StageOutcome,
    pub aggregator_ping: StageOutcome,
    pub short_link: StageOutcome,

    /// Whether the page was reachable and carried the target link.
    /// None until the validation stage has run at least once.
    pub live: Option<bool>,

    pub page_title: Option<String>,
    pub anchor_text: Option<String>,
    pub link_type: LinkType,

    /// Short URL produced by a successful shortening stage
    pub short_url: Option<String>,

    /// First error recorded during the pass, verbatim
    pub error_message: Option<String>,

    /// Set when the whole pass aborted on an unexpected fault
    pub critical: bool,

    pub last_processed_at: Option<DateTime<Utc>>,
    pub last_checked_at: Option<DateTime<Utc>>,
}

impl LinkResult {
    /// Creates a fresh record for one URL with nothing run yet
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            validation: StageOutcome::NotRun,
            search_notify: StageOutcome::NotRun,
            aggregator_ping: StageOutcome::NotRun,
            short_link: StageOutcome::NotRun,
            live: None,
            page_title: None,
            anchor_text: None,
            link_type: LinkType::Unknown,
            short_url: None,
            error_message: None,
            critical: false,
            last_processed_at: None,
            last_checked_at: None,
        }
    }

    /// Returns the outcome recorded for a stage
    pub fn outcome(&self, stage: Stage) -> StageOutcome {
        match stage {
            Stage::Validation => self.validation,
            Stage::SearchNotify => self.search_notify,
            Stage::AggregatorPing => self.aggregator_ping,
            Stage::ShortLink => self.short_link,
        }
    }

    /// Records the outcome for a stage
    pub fn set_outcome(&mut self, stage: Stage, outcome: StageOutcome) {
        match stage {
            Stage::Validation => self.validation = outcome,
            Stage::SearchNotify => self.search_notify = outcome,
            Stage::AggregatorPing => self.aggregator_ping = outcome,
            Stage::ShortLink => self.short_link = outcome,
        }
    }

    /// Records an error message; only the first one sticks
    pub fn record_error(&mut self, message: impl Into<String>) {
        if self.error_message.is_none() {
            self.error_message = Some(message.into());
        }
    }

    /// Clears the validation metadata back to its unknown state.
    /// A monitoring pass calls this before re-validating.
    pub fn reset_liveness(&mut self) {
        self.live = None;
        self.page_title = None;
        self.anchor_text = None;
        self.link_type = LinkType::Unknown;
    }

    /// Returns true if any stage ran and failed
    pub fn has_failure(&self) -> bool {
        Stage::all_stages()
            .iter()
            .any(|s| self.outcome(*s).is_failure())
    }
}
