//! Pipeline events and the sinks that receive them.
//!
//! Components never log directly; they report to an [`EventSink`] handed in
//! by the caller. The binary passes [`TracingSink`], which forwards to the
//! process-wide `tracing` subscriber set up by [`crate::logging`]. Tests pass
//! a [`MemorySink`] and assert on what was recorded.

use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

/// Something worth a log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// One attempt failed; another follows after `retry_in`.
    AttemptFailed {
        url: String,
        /// 1-based attempt number.
        attempt: u32,
        max_attempts: u32,
        error: String,
        retry_in: Duration,
    },
    /// Body stored at `path`.
    Downloaded {
        url: String,
        path: PathBuf,
        bytes: u64,
        sha256: String,
        attempt: u32,
    },
    /// Retry budget exhausted; nothing was written. `error` is the last failure.
    GaveUp {
        url: String,
        attempts: u32,
        error: String,
    },
    /// Manifest rewritten with `entries` downloads.
    ManifestUpdated { path: PathBuf, entries: usize },
    /// Existing manifest names a different jurisdiction; its values were kept.
    JurisdictionMismatch { path: PathBuf },
}

pub trait EventSink {
    fn record(&self, event: &Event);
}

/// Forwards events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&self, event: &Event) {
        match event {
            Event::AttemptFailed {
                url,
                attempt,
                max_attempts,
                error,
                retry_in,
            } => tracing::warn!(
                %url,
                attempt,
                max_attempts,
                "attempt {}/{} failed: {}; retrying in {}s",
                attempt,
                max_attempts,
                error,
                retry_in.as_secs_f64()
            ),
            Event::Downloaded {
                url,
                path,
                bytes,
                sha256,
                attempt,
            } => tracing::info!(
                %url,
                bytes,
                %sha256,
                attempt,
                "downloaded successfully: {}",
                path.display()
            ),
            Event::GaveUp {
                url,
                attempts,
                error,
            } => tracing::error!("failed after {} attempts: {} ({})", attempts, url, error),
            Event::ManifestUpdated { path, entries } => {
                tracing::info!(entries, "updated manifest: {}", path.display())
            }
            Event::JurisdictionMismatch { path } => tracing::warn!(
                "manifest {} records a different jurisdiction; keeping stored values",
                path.display()
            ),
        }
    }
}

/// Keeps every event in memory, in order.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<Event>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events
            .lock()
            .map(|e| e.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    pub fn count(&self, pred: impl Fn(&Event) -> bool) -> usize {
        self.events().iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for MemorySink {
    fn record(&self, event: &Event) {
        let mut events = match self.events.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        events.push(event.clone());
    }
}
