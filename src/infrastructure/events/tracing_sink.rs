//! Tracing Event Sink
//!
//! Forwards resolve events to `tracing` so they show up in the regular log
//! stream with structured fields.

use crate::domain::ports::{ResolveEvent, ResolveEventSink};

/// Event sink that logs through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl ResolveEventSink for TracingEventSink {
    fn on_event(&self, event: ResolveEvent) {
        match event {
            ResolveEvent::FetchStarted { kind } => {
                tracing::trace!(kind = %kind, "fetch started");
            }
            ResolveEvent::CacheHit { kind } => {
                tracing::trace!(kind = %kind, "served from session cache");
            }
            ResolveEvent::Loaded { kind, hash } => {
                tracing::info!(kind = %kind, hash = %hash.short(), "reusing persisted state");
            }
            ResolveEvent::CorruptRecord { kind, message } => {
                tracing::warn!(kind = %kind, %message, "ignoring corrupt state record");
            }
            ResolveEvent::Generating {
                kind,
                dependency_count,
            } => {
                tracing::debug!(kind = %kind, dependencies = dependency_count, "generating");
            }
            ResolveEvent::Generated {
                kind,
                hash,
                file_count,
            } => {
                tracing::info!(kind = %kind, hash = %hash.short(), files = file_count, "generated");
            }
            ResolveEvent::GenerateFailed { kind, error } => {
                tracing::error!(kind = %kind, %error, "generation failed");
            }
            ResolveEvent::Purged { kind } => {
                tracing::info!(kind = %kind, "purged consumed transient asset");
            }
            ResolveEvent::PurgeFailed { kind, error } => {
                tracing::warn!(kind = %kind, %error, "purge failed");
            }
            ResolveEvent::Materialized { kind, path } => {
                tracing::debug!(kind = %kind, path = %path.display(), "wrote file");
            }
        }
    }
}
