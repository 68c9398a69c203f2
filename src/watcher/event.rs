//! Watch event types and options

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Debounce duration in milliseconds
pub const DEBOUNCE_MS: u64 = 100;

/// How often an https root is re-fetched
pub const URL_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Watch options
#[derive(Debug, Clone, Default)]
pub struct WatchOptions {
    /// Local path or https url of the root module
    pub root_specifier: String,
    /// Extra paths watched unfiltered (`--watch-include`)
    pub include: Vec<PathBuf>,
}

impl WatchOptions {
    pub fn new(root_specifier: impl Into<String>) -> Self {
        Self {
            root_specifier: root_specifier.into(),
            include: Vec::new(),
        }
    }

    pub fn with_include(mut self, include: Vec<PathBuf>) -> Self {
        self.include = include;
        self
    }
}

/// Watch event types for NDJSON output
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WatchEvent {
    WatchStarted {
        root: String,
        include: Vec<String>,
    },
    ChangesDetected {
        paths: Vec<String>,
    },
    /// A push failed; the loop keeps waiting for the next change
    PushFailed {
        kind: String,
        message: String,
    },
    Shutdown,
}

impl WatchEvent {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Watcher state for debouncing
pub(crate) struct WatcherState {
    pub(crate) pending_changes: HashSet<String>,
    pub(crate) last_change: Option<Instant>,
}

impl WatcherState {
    pub(crate) fn new() -> Self {
        Self {
            pending_changes: HashSet::new(),
            last_change: None,
        }
    }

    pub(crate) fn add_change(&mut self, change: String) {
        self.pending_changes.insert(change);
        self.last_change = Some(Instant::now());
    }

    pub(crate) fn should_push(&self) -> bool {
        if let Some(last) = self.last_change {
            !self.pending_changes.is_empty() && last.elapsed() >= Duration::from_millis(DEBOUNCE_MS)
        } else {
            false
        }
    }

    /// Drain pending changes, sorted for stable output
    pub(crate) fn take_changes(&mut self) -> Vec<String> {
        let mut changes: Vec<_> = self.pending_changes.drain().collect();
        changes.sort();
        self.last_change = None;
        changes
    }
}
