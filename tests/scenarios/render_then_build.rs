//! Scenario: render manifests, then build the full cluster in a second run.
//!
//! The second invocation must reuse everything the first one generated and
//! only produce what is new, then drop the bootstrap token.

use std::sync::Arc;

use assetforge::{installer, InstallOptions, InstallUseCase};
use tempfile::tempdir;

use crate::common::{k, write_install_config, AWS_INSTALL_CONFIG, MINIMAL_INSTALL_CONFIG};

fn use_case() -> InstallUseCase {
    InstallUseCase::new(Arc::new(installer::registry().unwrap()))
}

#[test]
fn render_then_full_build_reuses_persisted_assets() {
    let dir = tempdir().unwrap();
    write_install_config(dir.path(), AWS_INSTALL_CONFIG);
    let options = InstallOptions::new(dir.path());
    let use_case = use_case();

    let render = use_case
        .execute(&installer::target("manifests").unwrap(), &options)
        .unwrap();
    assert_eq!(
        render.generated,
        vec![k("install-config"), k("cluster-id"), k("manifests")]
    );
    assert!(dir.path().join("manifests/cluster-version.yaml").exists());
    assert!(!dir.path().join("bootstrap.json").exists());

    let infra_manifest =
        std::fs::read_to_string(dir.path().join("manifests/cluster-infrastructure-02-config.yaml"))
            .unwrap();

    let build = use_case
        .execute(&installer::target("cluster").unwrap(), &options)
        .unwrap();

    let mut generated = build.generated.clone();
    generated.sort();
    assert_eq!(
        generated,
        vec![k("bootstrap-payload"), k("bootstrap-token"), k("metadata")]
    );
    assert!(build.loaded.contains(&k("manifests")));
    assert!(!build.generated.contains(&k("cluster-id")));
    assert_eq!(build.purged, vec![k("bootstrap-token")]);
    assert!(build.purge_failures.is_empty());

    // cluster-id was reused, so metadata agrees with the rendered manifests
    let metadata: serde_json::Value =
        serde_json::from_slice(&std::fs::read(dir.path().join("metadata.json")).unwrap()).unwrap();
    let infra_id = metadata["infraID"].as_str().unwrap();
    assert!(infra_id.starts_with("prod-east-"));
    assert!(infra_manifest.contains(infra_id));
    assert_eq!(metadata["region"], "us-east-1");

    let records = options.records_dir();
    assert!(records.join("bootstrap-payload.json").exists());
    assert!(!records.join("bootstrap-token.json").exists());
}

#[test]
fn repeated_build_is_a_noop() {
    let dir = tempdir().unwrap();
    write_install_config(dir.path(), MINIMAL_INSTALL_CONFIG);
    let options = InstallOptions::new(dir.path());
    let target = installer::target("cluster").unwrap();
    let use_case = use_case();

    use_case.execute(&target, &options).unwrap();
    let payload = std::fs::read(dir.path().join("bootstrap.json")).unwrap();
    let second = use_case.execute(&target, &options).unwrap();

    assert!(second.is_noop());
    assert!(second.purged.is_empty());
    assert_eq!(std::fs::read(dir.path().join("bootstrap.json")).unwrap(), payload);
}

#[test]
fn payload_is_private() {
    let dir = tempdir().unwrap();
    write_install_config(dir.path(), MINIMAL_INSTALL_CONFIG);

    use_case()
        .execute(
            &installer::target("cluster").unwrap(),
            &InstallOptions::new(dir.path()).with_parallel(false),
        )
        .unwrap();

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(dir.path().join("bootstrap.json"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }
    assert!(!dir.path().join("auth/bootstrap-token").exists());
}

#[test]
fn keeping_transients_leaves_the_token_record() {
    let dir = tempdir().unwrap();
    write_install_config(dir.path(), MINIMAL_INSTALL_CONFIG);
    let options = InstallOptions::new(dir.path()).with_purge_transient(false);

    let result = use_case()
        .execute(&installer::target("cluster").unwrap(), &options)
        .unwrap();

    assert!(result.purged.is_empty());
    assert!(options.records_dir().join("bootstrap-token.json").exists());
}
