//! assetforge - asset dependency graph and generation cache
//!
//! Installation inputs, derived configuration and rendered manifests are
//! modelled as typed assets. Each asset declares the kinds it depends on; a
//! session resolves requested kinds in dependency order, generates each one at
//! most once, persists the result so later invocations can reuse it, and
//! discards transient secrets once their consumers are done.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod installer;

// Re-exports for convenience
pub use application::{
    AssetRegistry, InstallOptions, InstallResult, InstallTarget, InstallUseCase, Materializer,
    Purger, Session,
};
pub use config::Config;
pub use domain::entities::{AssetContent, AssetFile, AssetState, Origin, Parents};
pub use domain::ports::{Asset, CancellationToken, GenerateContext, StateStore};
pub use domain::value_objects::AssetKind;
pub use error::{ForgeError, ForgeResult, GenerateError, GraphError, ResolveError};
