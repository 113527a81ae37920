//! Install options

use std::path::{Path, PathBuf};

use crate::domain::ports::CancellationToken;
use crate::domain::value_objects::AssetKind;

/// State directory name inside the install directory
pub const DEFAULT_STATE_DIR: &str = ".assetforge";

/// A named set of root assets the user can ask for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallTarget {
    pub name: String,
    pub roots: Vec<AssetKind>,
}

impl InstallTarget {
    pub fn new(name: impl Into<String>, roots: Vec<AssetKind>) -> Self {
        Self {
            name: name.into(),
            roots,
        }
    }
}

/// Options for the install use case
#[derive(Debug, Clone)]
pub struct InstallOptions {
    /// Install directory: inputs are read from here, outputs written here
    pub dir: PathBuf,
    /// State directory, relative to `dir` unless absolute
    pub state_dir: PathBuf,
    /// Resolve sibling dependencies concurrently
    pub parallel: bool,
    /// Apply the purge policy after the roots are written
    pub purge_transient: bool,
    pub cancellation: CancellationToken,
}

impl InstallOptions {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
            parallel: true,
            purge_transient: true,
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_state_dir(mut self, state_dir: impl Into<PathBuf>) -> Self {
        self.state_dir = state_dir.into();
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_purge_transient(mut self, purge: bool) -> Self {
        self.purge_transient = purge;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Directory holding the lock file and the `state/` records
    pub fn state_root(&self) -> PathBuf {
        if self.state_dir.is_absolute() {
            self.state_dir.clone()
        } else {
            self.dir.join(&self.state_dir)
        }
    }

    pub fn records_dir(&self) -> PathBuf {
        self.state_root().join("state")
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
