/// Stage definitions for the amplification pipeline
///
/// This module defines the four pipeline stages, the tri-state outcome
/// recorded for each, and the per-run stage toggle set.
use std::fmt;

/// One independently toggleable unit of work in the pipeline
///
/// Stages always execute in the declaration order below. Validation is the
/// gating stage: when it fails, every later stage is left NotRun.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Confirm the backlink page is live and actually links to the target
    Validation,

    /// Notify the search engine ping endpoint about the URL
    SearchNotify,

    /// Submit the URL to the ping aggregator service
    AggregatorPing,

    /// Create a short URL for the backlink
    ShortLink,
}

impl Stage {
    /// Converts the stage to a database string representation
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::SearchNotify => "search_notify",
            Self::AggregatorPing => "aggregator_ping",
            Self::ShortLink => "short_link",
        }
    }

    /// Parses a stage from a database string representation
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "validation" => Some(Self::Validation),
            "search_notify" => Some(Self::SearchNotify),
            "aggregator_ping" => Some(Self::AggregatorPing),
            "short_link" => Some(Self::ShortLink),
            _ => None,
        }
    }

    /// Human-readable stage name for log messages
    pub fn label(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::SearchNotify => "search engine notification",
            Self::AggregatorPing => "aggregator ping",
            Self::ShortLink => "URL shortening",
        }
    }

    /// Returns all stages in pipeline execution order
    pub fn all_stages() -> [Self; 4] {
        [
            Self::Validation,
            Self::SearchNotify,
            Self::AggregatorPing,
            Self::ShortLink,
        ]
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}

/// Outcome of one stage within one pipeline pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageOutcome {
    /// Stage was disabled, skipped by early-exit, or never reached
    NotRun,

    /// Stage completed successfully
    Success,

    /// Stage ran and failed
    Failure,
}

impl StageOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure)
    }

    /// Converts the outcome to a database string representation
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::NotRun => "not_run",
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }

    /// Parses an outcome from a database string representation
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "not_run" => Some(Self::NotRun),
            "success" => Some(Self::Success),
            "failure" => Some(Self::Failure),
            _ => None,
        }
    }
}

impl fmt::Display for StageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}

/// Stage toggles for one batch run
///
/// Immutable for the duration of a run. A disabled stage is always recorded
/// as NotRun, never Success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageConfig {
    pub validate: bool,
    pub search_notify: bool,
    pub aggregator_ping: bool,
    pub short_link: bool,
}

impl StageConfig {
    /// All stages enabled (the default amplification run)
    pub fn all_enabled() -> Self {
        Self {
            validate: true,
            search_notify: true,
            aggregator_ping: true,
            short_link: true,
        }
    }

    /// Returns whether the given stage is enabled in this run
    pub fn is_enabled(&self, stage: Stage) -> bool {
        match stage {
            Stage::Validation => self.validate,
            Stage::SearchNotify => self.search_notify,
            Stage::AggregatorPing => self.aggregator_ping,
            Stage::ShortLink => self.short_link,
        }
    }

    /// Returns true if at least one stage is enabled
    pub fn any_enabled(&self) -> bool {
        self.validate || self.search_notify || self.aggregator_ping || self.short_link
    }
}

impl Default for StageConfig {
    fn default() -> Self {
        Self::all_enabled()
    }
}
