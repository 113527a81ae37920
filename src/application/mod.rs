//! Application Layer
//!
//! Orchestrates the domain: a registry of assets, the session that resolves
//! them, and the policies applied to a session's results.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT know about concrete assets (those live in `installer`)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Building blocks
//!
//! - `AssetRegistry` - validated set of assets and their dependency graph
//! - `Session` - resolves kinds: memory, then state store, then `generate`
//! - `Purger` - discards consumed transient assets
//! - `Materializer` - writes generated files to an output directory
//!
//! ## Use Cases
//!
//! - `InstallUseCase` - lock, resolve a target, write it, purge
//! - `StateUseCase` - list or clear stored records

pub mod install;
mod materialize;
mod purge;
mod registry;
mod session;
pub mod state;

pub use install::{InstallOptions, InstallResult, InstallTarget, InstallUseCase};
pub use materialize::{MaterializeError, Materializer};
pub use purge::{PurgeFailure, PurgeReport, Purger};
pub use registry::{AssetRegistry, AssetRegistryBuilder};
pub use session::Session;
pub use state::{clear_install_state, EntryStatus, StateEntry, StateUseCase};
