//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `fs/` - Local file system with atomic writes
//! - `state/` - State store implementations and the state directory lock
//! - `events/` - Resolve event sinks (JSON, tracing)

pub mod events;
pub mod fs;
pub mod state;

pub use events::{JsonEventSink, TracingEventSink};
pub use fs::LocalFs;
pub use state::{FsStateStore, MemoryStateStore, StateDirLock};
