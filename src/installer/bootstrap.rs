//! bootstrap-payload asset
//!
//! The machine config handed to the bootstrap node: the rendered manifests,
//! the one-time join token and SSH access, as a single JSON document.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{AssetContent, AssetFile, Parents};
use crate::domain::ports::{Asset, GenerateContext};
use crate::domain::value_objects::AssetKind;
use crate::error::GenerateError;

use super::bootstrap_token::{BootstrapToken, BOOTSTRAP_TOKEN};
use super::install_config::{InstallConfig, INSTALL_CONFIG};
use super::manifests::MANIFESTS;

pub const BOOTSTRAP_PAYLOAD: &str = "bootstrap-payload";

pub const PAYLOAD_FILE: &str = "bootstrap.json";

/// Manifests are placed here on the bootstrap node
const REMOTE_ROOT: &str = "/opt/assetforge";

const PAYLOAD_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapPayload {
    pub version: u32,
    pub cluster_domain: String,
    pub token: String,
    #[serde(default)]
    pub ssh_authorized_keys: Vec<String>,
    pub files: Vec<RemoteFile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFile {
    pub path: String,
    pub mode: u32,
    /// `data:;base64,<contents>`
    pub contents: String,
}

/// Payload of the asset itself (the token secret stays in the file only)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapSummary {
    pub token_id: String,
    pub file_count: usize,
}

#[derive(Debug, Default)]
pub struct BootstrapPayloadAsset;

impl Asset for BootstrapPayloadAsset {
    fn kind(&self) -> AssetKind {
        AssetKind::from_static(BOOTSTRAP_PAYLOAD)
    }

    fn name(&self) -> String {
        "Bootstrap Payload".to_string()
    }

    fn dependencies(&self) -> Vec<AssetKind> {
        vec![
            AssetKind::from_static(INSTALL_CONFIG),
            AssetKind::from_static(MANIFESTS),
            AssetKind::from_static(BOOTSTRAP_TOKEN),
        ]
    }

    fn generate(
        &self,
        parents: &Parents,
        _ctx: &GenerateContext,
    ) -> Result<AssetContent, GenerateError> {
        let config: InstallConfig = parents.data_as(&AssetKind::from_static(INSTALL_CONFIG))?;
        let token: BootstrapToken = parents.data_as(&AssetKind::from_static(BOOTSTRAP_TOKEN))?;
        let manifests = parents.get(&AssetKind::from_static(MANIFESTS))?;

        let files: Vec<RemoteFile> = manifests
            .files()
            .iter()
            .map(|file| RemoteFile {
                path: format!("{REMOTE_ROOT}/{}", file.path().to_string_lossy()),
                mode: file.mode().unwrap_or(0o644),
                contents: format!("data:;base64,{}", STANDARD.encode(file.contents())),
            })
            .collect();

        let payload = BootstrapPayload {
            version: PAYLOAD_VERSION,
            cluster_domain: config.cluster_domain(),
            token: token.token(),
            ssh_authorized_keys: config.ssh_key.iter().cloned().collect(),
            files,
        };
        let summary = BootstrapSummary {
            token_id: token.id.clone(),
            file_count: payload.files.len(),
        };

        let bytes = serde_json::to_vec_pretty(&payload)?;
        Ok(AssetContent::from_data(&summary)?
            .with_file(AssetFile::new(PAYLOAD_FILE, bytes).with_mode(0o600)))
    }
}
