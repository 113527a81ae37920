//! Resolve Event Port
//!
//! Observable interface for resolution, purge and materialization.
//! Enables progress reporting, JSON event streams and structured logs.

use std::path::PathBuf;

use crate::domain::value_objects::{AssetKind, ContentHash};

/// Event emitted while a session works through the graph
#[derive(Debug, Clone)]
pub enum ResolveEvent {
    /// A fetch for this kind started (cache miss in memory)
    FetchStarted { kind: AssetKind },

    /// Served from the session's in-memory cache
    CacheHit { kind: AssetKind },

    /// Adopted from the state store without generating
    Loaded { kind: AssetKind, hash: ContentHash },

    /// A stored record failed its integrity check and was ignored
    CorruptRecord { kind: AssetKind, message: String },

    /// `generate` is about to run
    Generating {
        kind: AssetKind,
        dependency_count: usize,
    },

    /// `generate` succeeded and the record was persisted
    Generated {
        kind: AssetKind,
        hash: ContentHash,
        file_count: usize,
    },

    /// `generate`, a dependency, or persistence failed
    GenerateFailed { kind: AssetKind, error: String },

    /// A transient asset was discarded after its dependents consumed it
    Purged { kind: AssetKind },

    /// Purge cleanup failed (non-fatal)
    PurgeFailed { kind: AssetKind, error: String },

    /// A file was written to the output directory
    Materialized { kind: AssetKind, path: PathBuf },
}

impl ResolveEvent {
    /// Kind this event is about
    pub fn kind(&self) -> &AssetKind {
        match self {
            ResolveEvent::FetchStarted { kind }
            | ResolveEvent::CacheHit { kind }
            | ResolveEvent::Loaded { kind, .. }
            | ResolveEvent::CorruptRecord { kind, .. }
            | ResolveEvent::Generating { kind, .. }
            | ResolveEvent::Generated { kind, .. }
            | ResolveEvent::GenerateFailed { kind, .. }
            | ResolveEvent::Purged { kind }
            | ResolveEvent::PurgeFailed { kind, .. }
            | ResolveEvent::Materialized { kind, .. } => kind,
        }
    }
}

/// Trait for receiving resolve events
///
/// Implementations:
/// - `TracingEventSink`: structured log lines via `tracing`
/// - `JsonEventSink`: NDJSON event stream for CI
/// - `NoopEventSink`: silent operation
pub trait ResolveEventSink: Send + Sync {
    fn on_event(&self, event: ResolveEvent);

    /// Whether this sink wants per-kind chatter (fetch/cache events)
    fn wants_detailed_events(&self) -> bool {
        true
    }
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl ResolveEventSink for NoopEventSink {
    fn on_event(&self, _event: ResolveEvent) {}

    fn wants_detailed_events(&self) -> bool {
        false
    }
}
