//! The host-facing log stream.
//!
//! Frame execution never throws for per-node problems; it pushes leveled
//! entries here instead, and the embedding editor drains them into its log
//! panel. Entries are mirrored to `tracing` for developer diagnostics.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

/// One log line, stamped with the frame it was produced on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub frame: u64,
    pub message: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:>5}] #{} {}", self.level, self.frame, self.message)
    }
}

/// Accumulates log entries for the host to drain.
#[derive(Debug, Default)]
pub struct LogQueue {
    entries: Vec<LogEntry>,
}

impl LogQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, level: LogLevel, frame: u64, message: impl Into<String>) {
        let message = message.into();
        match level {
            LogLevel::Info => tracing::info!(frame, "{message}"),
            LogLevel::Warning => tracing::warn!(frame, "{message}"),
            LogLevel::Error => tracing::error!(frame, "{message}"),
        }
        self.entries.push(LogEntry {
            level,
            frame,
            message,
        });
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Removes and returns everything accumulated so far.
    pub fn drain(&mut self) -> Vec<LogEntry> {
        std::mem::take(&mut self.entries)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
