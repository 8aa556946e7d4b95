//! In-memory debug trace.
//!
//! Every transition appends a human-readable line. The trace is unbounded and
//! lives only as long as the session; each line is also emitted as a
//! `tracing` debug event so it reaches the log file.

use chrono::{DateTime, Local, Utc};

/// One trace line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugEntry {
    /// When the line was recorded.
    pub at: DateTime<Utc>,
    /// Line text.
    pub message: String,
}

impl DebugEntry {
    /// Local wall-clock time of the entry (`HH:MM:SS`).
    pub fn timestamp(&self) -> String {
        self.at.with_timezone(&Local).format("%H:%M:%S").to_string()
    }
}

impl std::fmt::Display for DebugEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.timestamp(), self.message)
    }
}

/// Append-only list of trace lines.
#[derive(Debug, Clone, Default)]
pub struct DebugLog {
    entries: Vec<DebugEntry>,
}

impl DebugLog {
    /// Empty trace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line.
    pub fn push(&mut self, at: DateTime<Utc>, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(target: "huddle::trace", "{message}");
        self.entries.push(DebugEntry { at, message });
    }

    /// All lines, oldest first.
    pub fn entries(&self) -> &[DebugEntry] {
        &self.entries
    }

    /// Most recent line.
    pub fn last(&self) -> Option<&DebugEntry> {
        self.entries.last()
    }

    /// Whether any line equals `message`.
    pub fn contains(&self, message: &str) -> bool {
        self.entries.iter().any(|entry| entry.message == message)
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the trace is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
