//! metadata asset
//!
//! `metadata.json`: what a later teardown needs to find the cluster's
//! resources.

use serde::{Deserialize, Serialize};

use crate::domain::entities::{AssetContent, AssetFile, Parents};
use crate::domain::ports::{Asset, GenerateContext};
use crate::domain::value_objects::AssetKind;
use crate::error::GenerateError;

use super::cluster_id::{ClusterId, CLUSTER_ID};
use super::install_config::{InstallConfig, Platform, INSTALL_CONFIG};

pub const METADATA: &str = "metadata";

pub const METADATA_FILE: &str = "metadata.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterMetadata {
    pub cluster_name: String,
    #[serde(rename = "clusterID")]
    pub cluster_id: String,
    #[serde(rename = "infraID")]
    pub infra_id: String,
    pub platform: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

#[derive(Debug, Default)]
pub struct MetadataAsset;

impl Asset for MetadataAsset {
    fn kind(&self) -> AssetKind {
        AssetKind::from_static(METADATA)
    }

    fn name(&self) -> String {
        "Metadata".to_string()
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
        _ctx: &GenerateContext,
    ) -> Result<AssetContent, GenerateError> {
        let config: InstallConfig = parents.data_as(&AssetKind::from_static(INSTALL_CONFIG))?;
        let id: ClusterId = parents.data_as(&AssetKind::from_static(CLUSTER_ID))?;

        let metadata = ClusterMetadata {
            cluster_name: config.metadata.name.clone(),
            cluster_id: id.uuid,
            infra_id: id.infra_id,
            platform: config.platform.name().to_string(),
            region: match &config.platform {
                Platform::Aws(aws) => Some(aws.region.clone()),
                Platform::Unmanaged {} => None,
            },
        };

        let mut bytes = serde_json::to_vec_pretty(&metadata)?;
        bytes.push(b'\n');
        Ok(AssetContent::from_data(&metadata)?.with_file(AssetFile::new(METADATA_FILE, bytes)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::installer::install_config::InstallConfigAsset;

    #[test]
    fn metadata_file_matches_payload() {
        let config = InstallConfigAsset::parse(
            "baseDomain: example.com\nmetadata:\n  name: demo\nplatform:\n  aws:\n    region: eu-west-1\n",
        )
        .unwrap();
        let id = ClusterId {
            uuid: "u-1".to_string(),
            infra_id: "demo-xyz12".to_string(),
        };
        let parents = Parents::new()
            .with(
                AssetKind::from_static(INSTALL_CONFIG),
                AssetContent::from_data(&config).unwrap(),
            )
            .with(
                AssetKind::from_static(CLUSTER_ID),
                AssetContent::from_data(&id).unwrap(),
            );

        let content = MetadataAsset
            .generate(&parents, &GenerateContext::default())
            .unwrap();

        let from_file: ClusterMetadata =
            serde_json::from_slice(content.files()[0].contents()).unwrap();
        let from_data: ClusterMetadata = content.data_as().unwrap();
        assert_eq!(from_file, from_data);
        assert_eq!(from_data.region.as_deref(), Some("eu-west-1"));

        let raw: serde_json::Value = serde_json::from_slice(content.files()[0].contents()).unwrap();
        assert_eq!(raw["infraID"], "demo-xyz12");
        assert_eq!(raw["clusterName"], "demo");
    }
}
