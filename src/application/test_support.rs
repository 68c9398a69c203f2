//! In-memory ports shared by the use case tests

use std::cell::RefCell;
use std::collections::HashMap;

use crate::domain::ports::{BundleOutput, Bundler, PushEvent, PushEventSink, SourceReader};
use crate::error::{EdgeError, EdgeResult};

/// Returns a fixed bundle and counts invocations
pub struct MockBundler {
    pub code: String,
    pub calls: RefCell<usize>,
}

impl MockBundler {
    pub fn new(code: &str) -> Self {
        Self {
            code: code.to_string(),
            calls: RefCell::new(0),
        }
    }
}

impl Bundler for MockBundler {
    fn bundle(&self, _root: &str) -> EdgeResult<BundleOutput> {
        *self.calls.borrow_mut() += 1;
        Ok(BundleOutput {
            code: self.code.clone(),
            backend: "mock".to_string(),
        })
    }
}

/// Bundler that always fails
pub struct FailingBundler;

impl Bundler for FailingBundler {
    fn bundle(&self, root: &str) -> EdgeResult<BundleOutput> {
        Err(EdgeError::BundleFailed {
            root: root.to_string(),
            message: "syntax error".to_string(),
        })
    }
}

/// Specifier → bytes
#[derive(Default)]
pub struct MapReader {
    pub files: HashMap<String, Vec<u8>>,
}

impl MapReader {
    pub fn with(mut self, specifier: &str, bytes: &[u8]) -> Self {
        self.files.insert(specifier.to_string(), bytes.to_vec());
        self
    }
}

impl SourceReader for MapReader {
    fn read_bytes(&self, specifier: &str) -> EdgeResult<Vec<u8>> {
        self.files.get(specifier).cloned().ok_or_else(|| {
            EdgeError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                specifier.to_string(),
            ))
        })
    }
}

#[derive(Default)]
pub struct RecordingEventSink {
    pub events: RefCell<Vec<PushEvent>>,
}

impl RecordingEventSink {
    pub fn count(&self, pred: impl Fn(&PushEvent) -> bool) -> usize {
        self.events.borrow().iter().filter(|e| pred(e)).count()
    }
}

impl PushEventSink for RecordingEventSink {
    fn on_event(&self, event: PushEvent) {
        self.events.borrow_mut().push(event);
    }
}
