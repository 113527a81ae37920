//! Graph command handler
//!
//! Prints every registered asset in generation order and the targets that can
//! be created.

use anyhow::Result;

use assetforge::{installer, AssetRegistry};

/// Execute the graph command
pub fn cmd_graph(json: bool) -> Result<()> {
    let registry = installer::registry()?;

    if json {
        for kind in registry.graph().topological_order() {
            crate::ui::json::emit(serde_json::json!({
                "event": "asset",
                "kind": kind,
                "dependencies": registry.graph().dependencies(kind),
                "transient": registry.is_transient(kind),
            }))?;
        }
        for target in installer::targets() {
            crate::ui::json::emit(serde_json::json!({
                "event": "target",
                "name": target.name,
                "roots": target.roots,
            }))?;
        }
        return Ok(());
    }

    print!("{}", render_graph(&registry));
    Ok(())
}

fn render_graph(registry: &AssetRegistry) -> String {
    let mut out = String::from("Assets (generation order):\n");
    for kind in registry.graph().topological_order() {
        out.push_str(&format!("  {kind}"));
        let deps = registry.graph().dependencies(kind);
        if !deps.is_empty() {
            let names: Vec<&str> = deps.iter().map(|d| d.as_str()).collect();
            out.push_str(&format!(" <- {}", names.join(", ")));
        }
        if registry.is_transient(kind) {
            out.push_str(" (transient)");
        }
        out.push('\n');
    }

    out.push_str("Targets:\n");
    for target in installer::targets() {
        let roots: Vec<&str> = target.roots.iter().map(|r| r.as_str()).collect();
        out.push_str(&format!("  {}: {}\n", target.name, roots.join(", ")));
    }
    out
}
