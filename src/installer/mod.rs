//! Installer assets
//!
//! The concrete asset graph of a cluster installation:
//!
//! - `install-config`: read from `install-config.yaml` and validated
//! - `cluster-id` <- install-config
//! - `bootstrap-token` (transient)
//! - `manifests` <- install-config, cluster-id
//! - `bootstrap-payload` <- install-config, manifests, bootstrap-token
//! - `metadata` <- install-config, cluster-id
//!
//! Targets name the roots a user can ask for: `manifests` renders the
//! manifests only, `cluster` produces everything a bootstrap needs.

pub mod bootstrap;
pub mod bootstrap_token;
pub mod cluster_id;
pub mod install_config;
pub mod manifests;
pub mod metadata;
pub mod validation;

use std::sync::Arc;

use crate::application::{AssetRegistry, InstallTarget};
use crate::domain::ports::Validator;
use crate::domain::value_objects::AssetKind;
use crate::error::{ForgeError, GraphError};

use bootstrap::{BootstrapPayloadAsset, BOOTSTRAP_PAYLOAD};
use bootstrap_token::BootstrapTokenAsset;
use cluster_id::ClusterIdAsset;
use install_config::{InstallConfig, InstallConfigAsset};
use manifests::{ManifestsAsset, MANIFESTS};
use metadata::{MetadataAsset, METADATA};
use validation::InstallConfigValidator;

/// Registry of every installer asset with the built-in validator
pub fn registry() -> Result<AssetRegistry, GraphError> {
    registry_with_validator(Arc::new(InstallConfigValidator))
}

/// Registry with a caller-supplied install-config validator
pub fn registry_with_validator(
    validator: Arc<dyn Validator<InstallConfig>>,
) -> Result<AssetRegistry, GraphError> {
    AssetRegistry::builder()
        .register(InstallConfigAsset::new(validator))
        .register(ClusterIdAsset)
        .register(BootstrapTokenAsset)
        .register(ManifestsAsset)
        .register(BootstrapPayloadAsset)
        .register(MetadataAsset)
        .build()
}

/// Every target the CLI accepts
pub fn targets() -> Vec<InstallTarget> {
    vec![
        InstallTarget::new("manifests", vec![AssetKind::from_static(MANIFESTS)]),
        InstallTarget::new(
            "cluster",
            vec![
                AssetKind::from_static(MANIFESTS),
                AssetKind::from_static(BOOTSTRAP_PAYLOAD),
                AssetKind::from_static(METADATA),
            ],
        ),
    ]
}

/// Look a target up by name
pub fn target(name: &str) -> Result<InstallTarget, ForgeError> {
    let all = targets();
    let expected = all
        .iter()
        .map(|t| t.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    all.into_iter()
        .find(|t| t.name == name)
        .ok_or_else(|| ForgeError::UnknownTarget {
            name: name.to_string(),
            expected,
        })
}
