use std::path::Path;
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::tempdir;

const MINIMAL_INSTALL_CONFIG: &str = "\
baseDomain: example.com
metadata:
  name: demo
platform:
  none: {}
";

fn assetforge(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_assetforge"))
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .env_remove("ASSETFORGE_STATE_DIR")
        .env_remove("ASSETFORGE_PARALLEL")
        .env_remove("ASSETFORGE_PURGE")
        .args(args)
        .output()
        .unwrap()
}

fn events(output: &Output) -> Vec<Value> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

#[test]
fn create_cluster_writes_files_and_reports_text() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("install-config.yaml"), MINIMAL_INSTALL_CONFIG).unwrap();

    let output = assetforge(dir.path(), &["create", "cluster", "--dir", "."]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Created 'cluster'"));
    assert!(stdout.contains("purged:    bootstrap-token"));
    assert!(dir.path().join("bootstrap.json").exists());
    assert!(dir.path().join("metadata.json").exists());
    assert!(dir.path().join(".assetforge/state/manifests.json").exists());
}

#[test]
fn create_json_emits_ndjson_event_stream() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("install-config.yaml"), MINIMAL_INSTALL_CONFIG).unwrap();
    let dir_arg = dir.path().to_str().unwrap();

    let output = assetforge(dir.path(), &["create", "manifests", "--dir", dir_arg, "--json"]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let events = events(&output);
    assert!(events.len() > 2);
    assert_eq!(events[0]["event"], "start");
    assert_eq!(events[0]["command"], "create");

    let last = events.last().unwrap();
    assert_eq!(last["event"], "complete");
    assert_eq!(last["target"], "manifests");
    assert_eq!(last["generated"].as_array().unwrap().len(), 3);

    assert!(events
        .iter()
        .any(|e| e["event"] == "generated" && e["kind"] == "install-config"));
    assert!(events.iter().any(|e| e["event"] == "materialized"));
}

#[test]
fn second_create_reuses_state() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("install-config.yaml"), MINIMAL_INSTALL_CONFIG).unwrap();

    assert!(assetforge(dir.path(), &["create", "manifests"]).status.success());
    let output = assetforge(dir.path(), &["create", "manifests", "--json"]);

    let events = events(&output);
    let last = events.last().unwrap();
    assert!(last["generated"].as_array().unwrap().is_empty());
    assert_eq!(last["loaded"], serde_json::json!(["manifests"]));
}

#[test]
fn invalid_config_fails_with_field_errors() {
    let dir = tempdir().unwrap();
    std::fs::write(
        dir.path().join("install-config.yaml"),
        "metadata:\n  name: demo\nplatform:\n  none: {}\n",
    )
    .unwrap();

    let output = assetforge(dir.path(), &["create", "manifests"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[ERROR] invalid install configuration"));
    assert!(stderr.contains("[install-config] baseDomain: Required value"));
    assert!(!dir.path().join("manifests").exists());
}

#[test]
fn unknown_target_is_rejected() {
    let dir = tempdir().unwrap();

    let output = assetforge(dir.path(), &["create", "everything", "--json"]);

    assert!(!output.status.success());
    let events = events(&output);
    assert_eq!(events[0]["event"], "error");
    assert!(events[0]["message"]
        .as_str()
        .unwrap()
        .contains("unknown target 'everything'"));
}

#[test]
fn config_file_and_env_select_state_dir() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("install-config.yaml"), MINIMAL_INSTALL_CONFIG).unwrap();
    std::fs::write(
        dir.path().join("assetforge.toml"),
        "[state]\ndir = \"from-file\"\n[resolve]\nparalel = false\n",
    )
    .unwrap();

    let output = assetforge(dir.path(), &["create", "manifests"]);

    assert!(output.status.success());
    assert!(dir.path().join("from-file/state/manifests.json").exists());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown config key 'paralel'"));
    assert!(stderr.contains("did you mean 'parallel'?"));

    let output = Command::new(env!("CARGO_BIN_EXE_assetforge"))
        .current_dir(dir.path())
        .env("ASSETFORGE_STATE_DIR", "from-env")
        .args(["create", "manifests"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(dir.path().join("from-env/state/manifests.json").exists());
}
