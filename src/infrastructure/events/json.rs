//! JSON Event Sink
//!
//! Outputs push events as NDJSON for CI/automation consumption.

use crate::domain::ports::{PushEvent, PushEventSink};
use serde::Serialize;
use std::io::{self, Write};
use std::sync::Mutex;

/// Event sink that outputs NDJSON events to stdout
pub struct JsonEventSink {
    command: &'static str,
    /// Mutex to ensure thread-safe writes
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonEventSink {
    /// Create a new JSON event sink writing to stdout
    pub fn stdout(command: &'static str) -> Self {
        Self::with_writer(command, io::stdout())
    }

    /// Create a JSON event sink writing to a custom writer (for testing)
    pub fn with_writer<W: Write + Send + 'static>(command: &'static str, writer: W) -> Self {
        Self {
            command,
            writer: Mutex::new(Box::new(writer)),
        }
    }

    /// Write any serializable event, tagged with this sink's command
    pub fn emit<T: Serialize>(&self, event: &T) {
        let mut value = match serde_json::to_value(event) {
            Ok(value) => value,
            Err(_) => return,
        };
        if let Some(object) = value.as_object_mut() {
            object.insert("command".to_string(), self.command.into());
        }
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", value);
            let _ = writer.flush();
        }
    }
}

impl PushEventSink for JsonEventSink {
    fn on_event(&self, event: PushEvent) {
        self.emit(&event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct TestWriter {
        buffer: Arc<Mutex<Vec<u8>>>,
    }

    impl TestWriter {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let buffer = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    buffer: buffer.clone(),
                },
                buffer,
            )
        }
    }

    impl Write for TestWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.buffer.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn lines(buffer: &Arc<Mutex<Vec<u8>>>) -> Vec<serde_json::Value> {
        String::from_utf8(buffer.lock().unwrap().clone())
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn json_sink_outputs_uploaded_event() {
        let (writer, buffer) = TestWriter::new();
        let sink = JsonEventSink::with_writer("push", writer);

        sink.on_event(PushEvent::Uploaded {
            script: "foo".to_string(),
            push_id: None,
            elapsed_ms: 42,
        });

        let events = lines(&buffer);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0]["event"], "uploaded");
        assert_eq!(events[0]["command"], "push");
        assert_eq!(events[0]["elapsed_ms"], 42);
    }

    #[test]
    fn json_sink_forwards_deploy_messages_verbatim() {
        let (writer, buffer) = TestWriter::new();
        let sink = JsonEventSink::with_writer("push-deploy", writer);

        let message = serde_json::json!({ "type": "staticFile", "currentBytes": 10 });
        sink.on_event(PushEvent::DeployMessage {
            message: message.clone(),
        });

        let events = lines(&buffer);
        assert_eq!(events[0]["event"], "deploy_message");
        assert_eq!(events[0]["message"], message);
    }

    #[test]
    fn one_line_per_event() {
        let (writer, buffer) = TestWriter::new();
        let sink = JsonEventSink::with_writer("push", writer);
        sink.on_event(PushEvent::Bundling {
            script: "foo".to_string(),
        });
        sink.on_event(PushEvent::BindingsComputed { elapsed_ms: 1 });
        assert_eq!(lines(&buffer).len(), 2);
    }
}
