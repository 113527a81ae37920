//! Configuration type definitions

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::application::install::DEFAULT_STATE_DIR;

use super::loader::{self, ConfigError};

/// File looked up in the install directory
pub const CONFIG_FILE_NAME: &str = "assetforge.toml";

/// State directory configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateConfig {
    /// State directory, relative to the install directory unless absolute
    #[serde(default = "default_state_dir")]
    pub dir: String,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            dir: default_state_dir(),
        }
    }
}

fn default_state_dir() -> String {
    DEFAULT_STATE_DIR.to_string()
}

/// Resolver configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveConfig {
    /// Resolve sibling dependencies concurrently
    #[serde(default = "default_true")]
    pub parallel: bool,

    /// Purge consumed transient assets after a target is written
    #[serde(default = "default_true")]
    pub purge_transient: bool,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            purge_transient: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Full configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub state: StateConfig,

    #[serde(default)]
    pub resolve: ResolveConfig,
}

impl Config {
    /// Load configuration from a TOML file, dropping unknown-key warnings
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        loader::load_with_warnings(path).map(|(config, _)| config)
    }
}
