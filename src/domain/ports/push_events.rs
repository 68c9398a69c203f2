//! Push Event Port
//!
//! Progress of a push, reported as events so the terminal renderer and the
//! NDJSON stream see the same sequence.

use serde::Serialize;

/// Event emitted during a push to either target
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PushEvent {
    /// Module bundling started
    Bundling { script: String },

    Bundled { backend: String, elapsed_ms: u64 },

    BindingsComputed { elapsed_ms: u64 },

    /// A durable object namespace did not exist and was created
    NamespaceCreated { name: String },

    /// Script upload about to start (Workers)
    Uploading {
        script: String,
        is_module: bool,
        usage_model: Option<String>,
        push_id: Option<String>,
        size: u64,
        compressed_size: u64,
    },

    MigrationScheduled { deleted_classes: Vec<String> },

    Uploaded {
        script: String,
        push_id: Option<String>,
        elapsed_ms: u64,
    },

    NamespaceUpdating {
        name: String,
        script: String,
        class: String,
    },

    NamespacesUpdated { elapsed_ms: u64 },

    CustomDomainEnsuring { hostname: String, script: String },

    CustomDomainsBound { count: usize, elapsed_ms: u64 },

    WorkersDevToggled {
        script: String,
        subdomain: String,
        enabled: bool,
        elapsed_ms: u64,
    },

    /// Deploy push started
    DeployPushing {
        script: String,
        push_id: Option<String>,
    },

    EnvironmentUpdating { count: usize },

    /// Files the server reported missing after negotiation
    FilesNegotiated { updated: usize, total: usize },

    /// Message forwarded verbatim from the deploy stream
    DeployMessage { message: serde_json::Value },

    Deployed { script: String, elapsed_ms: u64 },

    /// Log entry of a deployment (`--get-logs` / `--query-logs`)
    Log { entry: serde_json::Value },
}

/// Trait for receiving push events
///
/// Implementations:
/// - console renderer (binary)
/// - `JsonEventSink`: NDJSON stream
/// - `NoopEventSink`: silent
pub trait PushEventSink {
    fn on_event(&self, event: PushEvent);
}

impl<T: PushEventSink + ?Sized> PushEventSink for &T {
    fn on_event(&self, event: PushEvent) {
        (**self).on_event(event)
    }
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl PushEventSink for NoopEventSink {
    fn on_event(&self, _event: PushEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct RecordingEventSink {
        events: RefCell<Vec<PushEvent>>,
    }

    impl PushEventSink for RecordingEventSink {
        fn on_event(&self, event: PushEvent) {
            self.events.borrow_mut().push(event);
        }
    }

    #[test]
    fn recording_sink_captures_events() {
        let sink = RecordingEventSink {
            events: RefCell::new(Vec::new()),
        };
        let by_ref = &sink;
        by_ref.on_event(PushEvent::Bundling {
            script: "foo".to_string(),
        });
        by_ref.on_event(PushEvent::NamespacesUpdated { elapsed_ms: 3 });
        assert_eq!(sink.events.borrow().len(), 2);
    }

    #[test]
    fn event_serializes_with_snake_case_tag() {
        let json = serde_json::to_value(PushEvent::FilesNegotiated {
            updated: 2,
            total: 5,
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "event": "files_negotiated", "updated": 2, "total": 5 })
        );
    }
}
