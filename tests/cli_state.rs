use std::path::Path;
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::tempdir;

fn assetforge(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_assetforge"))
        .current_dir(dir)
        .env_remove("ASSETFORGE_STATE_DIR")
        .args(args)
        .output()
        .unwrap()
}

fn seed(dir: &Path) {
    std::fs::write(
        dir.join("install-config.yaml"),
        "baseDomain: example.com\nmetadata:\n  name: demo\nplatform:\n  none: {}\n",
    )
    .unwrap();
    let output = assetforge(dir, &["create", "manifests"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
}

#[test]
fn state_list_on_fresh_dir() {
    let dir = tempdir().unwrap();

    let output = assetforge(dir.path(), &["state", "list"]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("No stored assets in "));
}

#[test]
fn state_list_json_reports_each_record() {
    let dir = tempdir().unwrap();
    seed(dir.path());

    let output = assetforge(dir.path(), &["state", "list", "--json"]);

    assert!(output.status.success());
    let events: Vec<Value> = String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    let kinds: Vec<&str> = events
        .iter()
        .filter(|e| e["event"] == "state_entry")
        .map(|e| e["kind"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["cluster-id", "install-config", "manifests"]);
    assert!(events
        .iter()
        .filter(|e| e["event"] == "state_entry")
        .all(|e| e["status"] == "intact"));
    assert_eq!(events.last().unwrap()["records"], 3);
}

#[test]
fn state_list_flags_tampered_records() {
    let dir = tempdir().unwrap();
    seed(dir.path());
    std::fs::write(dir.path().join(".assetforge/state/manifests.json"), b"{}").unwrap();

    let output = assetforge(dir.path(), &["state", "list"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout
        .lines()
        .any(|l| l.starts_with("manifests") && l.contains("unusable")));
}

#[test]
fn state_clear_forces_regeneration() {
    let dir = tempdir().unwrap();
    seed(dir.path());

    let output = assetforge(dir.path(), &["state", "clear"]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "Removed 3 stored asset(s)"
    );

    let output = assetforge(dir.path(), &["create", "manifests", "--json"]);
    let last: Value = String::from_utf8_lossy(&output.stdout)
        .lines()
        .last()
        .map(|l| serde_json::from_str(l).unwrap())
        .unwrap();
    assert_eq!(last["generated"].as_array().unwrap().len(), 3);
}

#[test]
fn graph_lists_targets() {
    let dir = tempdir().unwrap();

    let output = assetforge(dir.path(), &["graph"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("bootstrap-token (transient)"));
    assert!(stdout.contains("manifests: manifests"));
}
