//! Scenario: a broken or missing install-config stops the run before anything
//! is written, and reports every field problem at once.

use std::sync::Arc;

use assetforge::{installer, ForgeError, InstallOptions, InstallUseCase, ResolveError};
use tempfile::tempdir;

use crate::common::{k, write_install_config, INVALID_INSTALL_CONFIG};

#[test]
fn every_field_error_is_reported() {
    let dir = tempdir().unwrap();
    write_install_config(dir.path(), INVALID_INSTALL_CONFIG);
    let use_case = InstallUseCase::new(Arc::new(installer::registry().unwrap()));

    let err = use_case
        .execute(
            &installer::target("cluster").unwrap(),
            &InstallOptions::new(dir.path()),
        )
        .unwrap_err();

    let resolve = match err {
        ForgeError::Resolve(resolve) => resolve,
        other => panic!("expected a resolve error, got {other}"),
    };
    assert_eq!(resolve.failing_kinds(), vec![k("install-config")]);

    let mut fields: Vec<String> = resolve
        .field_errors()
        .into_iter()
        .map(|(_, e)| e.field)
        .collect();
    fields.sort();
    fields.dedup();
    assert_eq!(
        fields,
        vec![
            "baseDomain".to_string(),
            "metadata.name".to_string(),
            "networking.machineNetwork[0].cidr".to_string(),
        ]
    );

    assert!(!dir.path().join("manifests").exists());
    assert!(!dir.path().join("metadata.json").exists());
}

#[test]
fn missing_install_config_names_the_file() {
    let dir = tempdir().unwrap();
    let use_case = InstallUseCase::new(Arc::new(installer::registry().unwrap()));

    let err = use_case
        .execute(
            &installer::target("manifests").unwrap(),
            &InstallOptions::new(dir.path()),
        )
        .unwrap_err();

    assert!(matches!(err, ForgeError::Resolve(ResolveError::Dependency { .. })));
    assert!(err.to_string().contains("install-config.yaml"));
}

#[test]
fn fixing_the_config_after_a_failure_succeeds() {
    let dir = tempdir().unwrap();
    write_install_config(dir.path(), INVALID_INSTALL_CONFIG);
    let use_case = InstallUseCase::new(Arc::new(installer::registry().unwrap()));
    let target = installer::target("manifests").unwrap();
    let options = InstallOptions::new(dir.path());

    assert!(use_case.execute(&target, &options).is_err());

    write_install_config(dir.path(), crate::common::MINIMAL_INSTALL_CONFIG);
    let result = use_case.execute(&target, &options).unwrap();

    assert!(result.generated.contains(&k("install-config")));
}
