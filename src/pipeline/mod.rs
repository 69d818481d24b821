//! Amplification pipeline
//!
//! This module contains the core control flow of the tool:
//! - the per-URL stage pipeline with its early-exit rule
//! - the batch runner with dedup and progress reporting
//! - the monitoring runner that re-validates stored links
//! - the log/progress event channels the runners publish on

mod batch;
mod context;
mod events;
mod monitor;
mod processor;

pub use batch::run_batch;
pub use context::AmplifyContext;
pub use events::{EventSink, LogEvent, ProgressEvent, Severity};
pub use monitor::run_monitor;
pub use processor::LinkProcessor;
