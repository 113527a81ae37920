//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod asset;
pub mod file_system;
pub mod resolve_events;
pub mod state_store;
pub mod validator;

pub use asset::{Asset, CancellationToken, GenerateContext};
pub use file_system::{FileSystem, FsError, FsResult};
pub use resolve_events::{NoopEventSink, ResolveEvent, ResolveEventSink};
pub use state_store::{StateStore, StateStoreError, StateStoreResult};
pub use validator::{ensure_valid, Validator};
