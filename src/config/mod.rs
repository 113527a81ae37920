//! Configuration module
//!
//! Precedence, highest first:
//! 1. CLI flags
//! 2. Environment variables (`ASSETFORGE_*`)
//! 3. `assetforge.toml` in the install directory
//! 4. Built-in defaults

mod env;
mod loader;
mod types;

pub use env::{with_env_overrides, with_overrides_from, ENV_PARALLEL, ENV_PURGE, ENV_STATE_DIR};
pub use loader::{load_for_dir, load_with_warnings, ConfigError, ConfigWarning};
pub use types::{Config, ResolveConfig, StateConfig, CONFIG_FILE_NAME};
