//! Log and progress event channels
//!
//! The runners never call back into UI code. They push events into two
//! unbounded channels: a log stream of `(message, severity)` pairs and a
//! progress stream of `(completed, total)` pairs. The caller renders
//! them however it likes. Sends never block; a dropped receiver is ignored
//! so a caller may subscribe to either stream or neither.

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

/// Severity of a log event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

/// One line of the pipeline's log stream
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub message: String,
    pub severity: Severity,
}

/// Cumulative batch progress: `completed` processed URLs out of `total`
/// submitted. Skipped URLs count toward the total but not toward completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEvent {
    pub completed: usize,
    pub total: usize,
}

/// Sending half of both event streams, held by the runners
#[derive(Debug, Clone)]
pub struct EventSink {
    log_tx: UnboundedSender<LogEvent>,
    progress_tx: UnboundedSender<ProgressEvent>,
}

impl EventSink {
    /// Creates a sink plus the receiving halves of both streams
    pub fn channel() -> (
        Self,
        UnboundedReceiver<LogEvent>,
        UnboundedReceiver<ProgressEvent>,
    ) {
        let (log_tx, log_rx) = unbounded_channel();
        let (progress_tx, progress_rx) = unbounded_channel();

        (
            Self {
                log_tx,
                progress_tx,
            },
            log_rx,
            progress_rx,
        )
    }

    /// Emits a log event; a closed receiver is ignored
    pub fn log(&self, severity: Severity, message: impl Into<String>) {
        let _ = self.log_tx.send(LogEvent {
            message: message.into(),
            severity,
        });
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(Severity::Info, message);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.log(Severity::Success, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.log(Severity::Error, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.log(Severity::Warning, message);
    }

    /// Emits a progress event; a closed receiver is ignored
    pub fn progress(&self, completed: usize, total: usize) {
        let _ = self.progress_tx.send(ProgressEvent { completed, total });
    }
}
