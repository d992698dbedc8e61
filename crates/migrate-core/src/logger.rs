//! Deduplicating message logger
//!
//! [`DedupLogger`] emits each distinct message string at most once over its
//! lifetime, no matter how many calls or derived contexts produce it.

use dashmap::DashSet;
use parking_lot::Mutex;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

/// Destination for emitted messages
#[cfg_attr(test, mockall::automock)]
pub trait MessageSink: Send + Sync {
    /// Deliver one message
    fn emit(&self, message: &str);
}

/// Prints each message to standard output
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl MessageSink for StdoutSink {
    fn emit(&self, message: &str) {
        println!("{message}");
    }
}

/// Forwards each message to `tracing` at `warn` level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl MessageSink for TracingSink {
    fn emit(&self, message: &str) {
        tracing::warn!(target: "migrate", "{message}");
    }
}

/// Collects messages in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    messages: Mutex<Vec<String>>,
}

impl MemorySink {
    /// Create empty sink
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages received so far, in order
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    /// Number of messages received
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.lock().len()
    }

    /// Whether nothing was received
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }

    /// Messages containing `needle`
    #[must_use]
    pub fn matching(&self, needle: &str) -> Vec<String> {
        self.messages
            .lock()
            .iter()
            .filter(|m| m.contains(needle))
            .cloned()
            .collect()
    }
}

impl MessageSink for MemorySink {
    fn emit(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }
}

/// Logger that emits each distinct message once
pub struct DedupLogger {
    seen: DashSet<String>,
    sink: Arc<dyn MessageSink>,
}

impl DedupLogger {
    /// Create logger writing to `sink`
    #[must_use]
    pub fn new(sink: Arc<dyn MessageSink>) -> Self {
        Self {
            seen: DashSet::new(),
            sink,
        }
    }

    /// Create logger writing to standard output
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(Arc::new(StdoutSink))
    }

    /// Emit `message` unless it was emitted before
    ///
    /// Returns `true` if the message was emitted.
    pub fn log(&self, message: impl Into<String>) -> bool {
        let message = message.into();
        if !self.seen.insert(message.clone()) {
            return false;
        }
        self.sink.emit(&message);
        true
    }

    /// Whether `message` has been emitted
    #[inline]
    #[must_use]
    pub fn contains(&self, message: &str) -> bool {
        self.seen.contains(message)
    }

    /// Number of distinct messages emitted
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether nothing has been emitted
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Snapshot of emitted messages, in no particular order
    #[must_use]
    pub fn seen(&self) -> Vec<String> {
        self.seen.iter().map(|m| m.key().clone()).collect()
    }
}

impl Default for DedupLogger {
    fn default() -> Self {
        Self::stdout()
    }
}

impl Debug for DedupLogger {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("DedupLogger")
            .field("seen", &self.seen.len())
            .finish_non_exhaustive()
    }
}
