//! State command handlers

use std::path::PathBuf;

use anyhow::Result;

use assetforge::application::{clear_install_state, EntryStatus, StateEntry, StateUseCase};

/// List stored records
pub fn cmd_state_list(dir: PathBuf, state_dir: Option<PathBuf>, json: bool) -> Result<()> {
    let options = super::install_options(&dir, state_dir, json)?;
    let entries = StateUseCase::for_install(&options).list()?;

    if json {
        for entry in &entries {
            crate::ui::json::emit_with("state_entry", entry)?;
        }
        crate::ui::json::emit(serde_json::json!({
            "event": "complete",
            "command": "state list",
            "records": entries.len(),
        }))?;
        return Ok(());
    }

    if entries.is_empty() {
        println!(
            "No stored assets in {}",
            options.records_dir().display()
        );
        return Ok(());
    }
    print!("{}", render_entries(&entries));
    Ok(())
}

/// Remove every stored record
pub fn cmd_state_clear(dir: PathBuf, state_dir: Option<PathBuf>, json: bool) -> Result<()> {
    let options = super::install_options(&dir, state_dir, json)?;
    let removed = clear_install_state(&options)?;

    if json {
        crate::ui::json::emit(serde_json::json!({
            "event": "complete",
            "command": "state clear",
            "removed": removed,
        }))?;
    } else {
        println!("Removed {removed} stored asset(s)");
    }
    Ok(())
}

fn render_entries(entries: &[StateEntry]) -> String {
    let width = entries
        .iter()
        .map(|e| e.kind.as_str().len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for entry in entries {
        let line = match &entry.status {
            EntryStatus::Intact {
                hash,
                generated_at,
                files,
            } => format!(
                "{:<width$}  {}  {}  {} file(s)",
                entry.kind.as_str(),
                hash.short(),
                generated_at.format("%Y-%m-%d %H:%M:%S"),
                files,
            ),
            EntryStatus::Unusable { reason } => {
                format!("{:<width$}  unusable: {}", entry.kind.as_str(), reason)
            }
        };
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
