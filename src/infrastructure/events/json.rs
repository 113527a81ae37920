//! JSON Event Sink
//!
//! Outputs resolve events as NDJSON for CI/automation consumption.

use std::io::{self, Write};
use std::sync::Mutex;

use crate::domain::ports::{ResolveEvent, ResolveEventSink};

/// Event sink that outputs NDJSON events
pub struct JsonEventSink {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonEventSink {
    /// Create a new JSON event sink writing to stdout
    pub fn stdout() -> Self {
        Self {
            writer: Mutex::new(Box::new(io::stdout())),
        }
    }

    /// Create a JSON event sink writing to a custom writer
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    fn write_event(&self, event: serde_json::Value) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", event);
            let _ = writer.flush();
        }
    }
}

/// JSON shape of a single event
pub fn event_to_json(event: &ResolveEvent) -> serde_json::Value {
    match event {
        ResolveEvent::FetchStarted { kind } => serde_json::json!({
            "event": "fetch_start",
            "kind": kind,
        }),
        ResolveEvent::CacheHit { kind } => serde_json::json!({
            "event": "cache_hit",
            "kind": kind,
        }),
        ResolveEvent::Loaded { kind, hash } => serde_json::json!({
            "event": "loaded",
            "kind": kind,
            "hash": hash,
        }),
        ResolveEvent::CorruptRecord { kind, message } => serde_json::json!({
            "event": "corrupt_record",
            "kind": kind,
            "message": message,
        }),
        ResolveEvent::Generating {
            kind,
            dependency_count,
        } => serde_json::json!({
            "event": "generating",
            "kind": kind,
            "dependencies": dependency_count,
        }),
        ResolveEvent::Generated {
            kind,
            hash,
            file_count,
        } => serde_json::json!({
            "event": "generated",
            "kind": kind,
            "hash": hash,
            "files": file_count,
        }),
        ResolveEvent::GenerateFailed { kind, error } => serde_json::json!({
            "event": "generate_error",
            "kind": kind,
            "error": error,
        }),
        ResolveEvent::Purged { kind } => serde_json::json!({
            "event": "purged",
            "kind": kind,
        }),
        ResolveEvent::PurgeFailed { kind, error } => serde_json::json!({
            "event": "purge_error",
            "kind": kind,
            "error": error,
        }),
        ResolveEvent::Materialized { kind, path } => serde_json::json!({
            "event": "materialized",
            "kind": kind,
            "path": path.display().to_string(),
        }),
    }
}

impl ResolveEventSink for JsonEventSink {
    fn on_event(&self, event: ResolveEvent) {
        self.write_event(event_to_json(&event));
    }
}
