//! Command handlers
//!
//! Each handler turns parsed CLI arguments into options for a use case and
//! renders the result as text or NDJSON.

pub mod create;
pub mod graph;
pub mod state;

use std::path::{Path, PathBuf};

use anyhow::Result;

use assetforge::config::{load_for_dir, ConfigWarning};
use assetforge::InstallOptions;

/// Build install options from `assetforge.toml`, environment, then CLI flags
pub fn install_options(dir: &Path, state_dir: Option<PathBuf>, json: bool) -> Result<InstallOptions> {
    let (config, warnings) = load_for_dir(dir)?;
    report_warnings(&warnings, json);

    let state_dir = state_dir.unwrap_or_else(|| PathBuf::from(&config.state.dir));
    Ok(InstallOptions::new(dir)
        .with_state_dir(state_dir)
        .with_parallel(config.resolve.parallel)
        .with_purge_transient(config.resolve.purge_transient))
}

fn report_warnings(warnings: &[ConfigWarning], json: bool) {
    for warning in warnings {
        if json {
            let _ = crate::ui::json::emit(serde_json::json!({
                "event": "config_warning",
                "key": warning.key,
                "message": warning.to_string(),
            }));
        } else {
            eprintln!("[WARN] {warning}");
        }
    }
}
