//! StateStore port - durable persistence of generated asset content
//!
//! Keyed by asset kind only. Inputs that change between invocations are not
//! detected; callers clear records to force regeneration.

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::entities::StateRecord;
use crate::domain::ports::FsError;
use crate::domain::value_objects::AssetKind;

/// Result type for state store operations
pub type StateStoreResult<T> = Result<T, StateStoreError>;

/// State store operation errors
#[derive(Error, Debug)]
pub enum StateStoreError {
    /// Record exists but failed its integrity check or could not be parsed
    #[error("corrupt state record for '{kind}': {message}")]
    Corrupt { kind: AssetKind, message: String },

    #[error("state record format for '{kind}' is incompatible (found v{found}, expected v{expected}); clear the state directory to regenerate")]
    VersionMismatch {
        kind: AssetKind,
        found: u32,
        expected: u32,
    },

    #[error("I/O error on {path}: {error}")]
    Io {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("failed to write state record: {0}")]
    Write(#[from] FsError),

    #[error("failed to serialize state record for '{kind}': {error}")]
    Serialization {
        kind: AssetKind,
        error: serde_json::Error,
    },
}

impl StateStoreError {
    /// Whether the failure means "treat the record as absent"
    pub fn is_corruption(&self) -> bool {
        matches!(self, StateStoreError::Corrupt { .. })
    }
}

/// Abstract persistence for generated asset content
///
/// Implementations:
/// - `FsStateStore` - one JSON file per kind, atomic rename writes
/// - `MemoryStateStore` - in-process map for tests and dry runs
pub trait StateStore: Send + Sync {
    /// Load the record for `kind`, `None` if never generated or purged
    fn load(&self, kind: &AssetKind) -> StateStoreResult<Option<StateRecord>>;

    /// Persist a record, replacing any previous one atomically
    fn save(&self, record: &StateRecord) -> StateStoreResult<()>;

    /// Remove the record for `kind`. Removing a missing record is a no-op.
    fn purge(&self, kind: &AssetKind) -> StateStoreResult<()>;

    /// Kinds that currently have a record
    fn kinds(&self) -> StateStoreResult<Vec<AssetKind>>;

    /// Remove every record
    fn clear(&self) -> StateStoreResult<()> {
        for kind in self.kinds()? {
            self.purge(&kind)?;
        }
        Ok(())
    }
}
