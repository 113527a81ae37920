//! Install result

use std::path::PathBuf;

use serde::Serialize;

use crate::application::PurgeFailure;
use crate::domain::value_objects::AssetKind;

/// What an install invocation did
#[derive(Debug, Clone, Default, Serialize)]
pub struct InstallResult {
    pub target: String,
    /// Kinds whose `generate` ran in this invocation
    pub generated: Vec<AssetKind>,
    /// Kinds adopted from the state store
    pub loaded: Vec<AssetKind>,
    /// Files written into the install directory
    pub written: Vec<PathBuf>,
    pub purged: Vec<AssetKind>,
    pub purge_failures: Vec<PurgeFailure>,
}

impl InstallResult {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            ..Self::default()
        }
    }

    /// Nothing was generated: every asset came from a previous run
    pub fn is_noop(&self) -> bool {
        self.generated.is_empty()
    }
}
