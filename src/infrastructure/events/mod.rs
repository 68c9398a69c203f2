//! Event Sink Implementations
//!
//! Provides concrete implementations of PushEventSink:
//! - JsonEventSink: NDJSON output for CI/automation

mod json;

pub use json::JsonEventSink;
