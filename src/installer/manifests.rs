//! manifests asset
//!
//! Cluster-level manifests rendered from the install config. This is the
//! root of the "render" target; a later full build reuses it from state.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::entities::{AssetContent, AssetFile, Parents};
use crate::domain::ports::{Asset, GenerateContext};
use crate::domain::value_objects::AssetKind;
use crate::error::GenerateError;

use super::cluster_id::{ClusterId, CLUSTER_ID};
use super::install_config::{InstallConfig, INSTALL_CONFIG};

pub const MANIFESTS: &str = "manifests";

const API_GROUP: &str = "config.assetforge.io/v1";

/// Payload: which manifest files were rendered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestIndex {
    pub files: Vec<String>,
}

#[derive(Debug, Default)]
pub struct ManifestsAsset;

impl ManifestsAsset {
    fn render(config: &InstallConfig, id: &ClusterId) -> Result<Vec<AssetFile>, GenerateError> {
        let install_config_yaml = serde_yaml_ng::to_string(config)?;
        let cluster_domain = config.cluster_domain();

        let documents = [
            (
                "manifests/cluster-config.yaml",
                json!({
                    "apiVersion": "v1",
                    "kind": "ConfigMap",
                    "metadata": {"name": "cluster-config-v1", "namespace": "kube-system"},
                    "data": {"install-config": install_config_yaml},
                }),
            ),
            (
                "manifests/cluster-infrastructure-02-config.yaml",
                json!({
                    "apiVersion": API_GROUP,
                    "kind": "Infrastructure",
                    "metadata": {"name": "cluster"},
                    "spec": {"platform": config.platform.name()},
                    "status": {
                        "infrastructureName": id.infra_id,
                        "apiServerURL": format!("https://api.{cluster_domain}:6443"),
                        "apiServerInternalURI": format!("https://api-int.{cluster_domain}:6443"),
                    },
                }),
            ),
            (
                "manifests/cluster-dns-02-config.yaml",
                json!({
                    "apiVersion": API_GROUP,
                    "kind": "DNS",
                    "metadata": {"name": "cluster"},
                    "spec": {"baseDomain": cluster_domain},
                }),
            ),
            (
                "manifests/cluster-network-02-config.yaml",
                json!({
                    "apiVersion": API_GROUP,
                    "kind": "Network",
                    "metadata": {"name": "cluster"},
                    "spec": {
                        "clusterNetwork": config.networking.cluster_network,
                        "serviceNetwork": config.networking.service_network,
                    },
                }),
            ),
            (
                "manifests/cluster-version.yaml",
                json!({
                    "apiVersion": API_GROUP,
                    "kind": "ClusterVersion",
                    "metadata": {"name": "version"},
                    "spec": {"clusterID": id.uuid},
                }),
            ),
        ];

        documents
            .into_iter()
            .map(|(path, doc)| -> Result<AssetFile, GenerateError> {
                Ok(AssetFile::new(path, serde_yaml_ng::to_string(&doc)?))
            })
            .collect()
    }
}

impl Asset for ManifestsAsset {
    fn kind(&self) -> AssetKind {
        AssetKind::from_static(MANIFESTS)
    }

    fn name(&self) -> String {
        "Common Manifests".to_string()
    }

    fn dependencies(&self) -> Vec<AssetKind> {
        vec![
            AssetKind::from_static(INSTALL_CONFIG),
            AssetKind::from_static(CLUSTER_ID),
        ]
    }

    fn generate(
        &self,
        parents: &Parents,
        ctx: &GenerateContext,
    ) -> Result<AssetContent, GenerateError> {
        let config: InstallConfig = parents.data_as(&AssetKind::from_static(INSTALL_CONFIG))?;
        let id: ClusterId = parents.data_as(&AssetKind::from_static(CLUSTER_ID))?;
        ctx.cancellation().check()?;

        let files = Self::render(&config, &id)?;
        let index = ManifestIndex {
            files: files
                .iter()
                .map(|f| f.path().to_string_lossy().into_owned())
                .collect(),
        };

        let mut content = AssetContent::from_data(&index)?;
        for file in files {
            content = content.with_file(file);
        }
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::installer::install_config::InstallConfigAsset;

    fn parents() -> Parents {
        let config = InstallConfigAsset::parse(
            "baseDomain: example.com\nmetadata:\n  name: demo\nplatform:\n  none: {}\n",
        )
        .unwrap();
        let id = ClusterId {
            uuid: "2b1c0f0e-0000-4000-8000-000000000000".to_string(),
            infra_id: "demo-abcde".to_string(),
        };
        Parents::new()
            .with(
                AssetKind::from_static(INSTALL_CONFIG),
                AssetContent::from_data(&config).unwrap(),
            )
            .with(
                AssetKind::from_static(CLUSTER_ID),
                AssetContent::from_data(&id).unwrap(),
            )
    }

    #[test]
    fn renders_every_manifest() {
        let content = ManifestsAsset
            .generate(&parents(), &GenerateContext::default())
            .unwrap();
        let index: ManifestIndex = content.data_as().unwrap();

        assert_eq!(index.files.len(), content.files().len());
        assert!(index
            .files
            .contains(&"manifests/cluster-dns-02-config.yaml".to_string()));
    }

    #[test]
    fn infrastructure_manifest_carries_ids() {
        let content = ManifestsAsset
            .generate(&parents(), &GenerateContext::default())
            .unwrap();
        let infra = content
            .files()
            .iter()
            .find(|f| f.path().ends_with("cluster-infrastructure-02-config.yaml"))
            .unwrap();
        let doc: serde_json::Value = serde_yaml_ng::from_slice(infra.contents()).unwrap();

        assert_eq!(doc["status"]["infrastructureName"], "demo-abcde");
        assert_eq!(
            doc["status"]["apiServerURL"],
            "https://api.demo.example.com:6443"
        );
    }

    #[test]
    fn rendering_is_deterministic() {
        let ctx = GenerateContext::default();
        let a = ManifestsAsset.generate(&parents(), &ctx).unwrap();
        let b = ManifestsAsset.generate(&parents(), &ctx).unwrap();
        assert_eq!(a.hash().unwrap(), b.hash().unwrap());
    }

    #[test]
    fn undeclared_parent_is_an_error() {
        let err = ManifestsAsset
            .generate(&Parents::new(), &GenerateContext::default())
            .unwrap_err();
        assert!(matches!(err, GenerateError::UndeclaredDependency { .. }));
    }
}
