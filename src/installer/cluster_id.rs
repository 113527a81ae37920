//! cluster-id asset
//!
//! A random UUID plus the infrastructure id used to name cloud resources.
//! Generated once and persisted, so re-running an install keeps the ids.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::{AssetContent, Parents};
use crate::domain::ports::{Asset, GenerateContext};
use crate::domain::value_objects::AssetKind;
use crate::error::GenerateError;

use super::install_config::{InstallConfig, INSTALL_CONFIG};

pub const CLUSTER_ID: &str = "cluster-id";

/// Cloud resource names leave room for suffixes
const MAX_INFRA_BASE_LEN: usize = 27;
const INFRA_SUFFIX_LEN: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterId {
    pub uuid: String,
    #[serde(rename = "infraID")]
    pub infra_id: String,
}

/// `<truncated cluster name>-<5 random chars>`
pub fn infra_id(cluster_name: &str, random: &str) -> String {
    let base: String = cluster_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .take(MAX_INFRA_BASE_LEN)
        .collect();
    let base = base.trim_end_matches('-');
    let suffix: String = random.chars().take(INFRA_SUFFIX_LEN).collect();
    format!("{base}-{suffix}")
}

#[derive(Debug, Default)]
pub struct ClusterIdAsset;

impl Asset for ClusterIdAsset {
    fn kind(&self) -> AssetKind {
        AssetKind::from_static(CLUSTER_ID)
    }

    fn name(&self) -> String {
        "Cluster ID".to_string()
    }

    fn dependencies(&self) -> Vec<AssetKind> {
        vec![AssetKind::from_static(INSTALL_CONFIG)]
    }

    fn generate(
        &self,
        parents: &Parents,
        _ctx: &GenerateContext,
    ) -> Result<AssetContent, GenerateError> {
        let config: InstallConfig = parents.data_as(&AssetKind::from_static(INSTALL_CONFIG))?;
        let uuid = Uuid::new_v4();
        let random = Uuid::new_v4().simple().to_string();
        let id = ClusterId {
            uuid: uuid.to_string(),
            infra_id: infra_id(&config.metadata.name, &random),
        };
        Ok(AssetContent::from_data(&id)?)
    }
}
