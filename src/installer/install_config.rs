//! install-config asset
//!
//! The user-provided `install-config.yaml` is the root of every other asset.
//! It is read from the install directory, parsed, defaulted and validated;
//! the typed config becomes this asset's payload.

use std::net::IpAddr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::entities::{AssetContent, Parents};
use crate::domain::ports::{ensure_valid, Asset, GenerateContext, Validator};
use crate::domain::value_objects::AssetKind;
use crate::error::GenerateError;

use super::validation::InstallConfigValidator;

pub const INSTALL_CONFIG: &str = "install-config";

/// Input file looked up in the install directory
pub const INSTALL_CONFIG_FILE: &str = "install-config.yaml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallConfig {
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default)]
    pub base_domain: String,
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default = "MachinePool::control_plane")]
    pub control_plane: MachinePool,
    #[serde(default = "default_compute")]
    pub compute: Vec<MachinePool>,
    #[serde(default)]
    pub networking: Networking,
    pub platform: Platform,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_key: Option<String>,
}

fn default_api_version() -> String {
    "v1".to_string()
}

fn default_compute() -> Vec<MachinePool> {
    vec![MachinePool::worker()]
}

impl InstallConfig {
    /// `<name>.<baseDomain>`
    pub fn cluster_domain(&self) -> String {
        format!("{}.{}", self.metadata.name, self.base_domain)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMeta {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachinePool {
    pub name: String,
    #[serde(default = "default_replicas")]
    pub replicas: u32,
    #[serde(default = "default_architecture")]
    pub architecture: String,
}

fn default_replicas() -> u32 {
    3
}

fn default_architecture() -> String {
    "amd64".to_string()
}

impl MachinePool {
    fn control_plane() -> Self {
        Self {
            name: "master".to_string(),
            replicas: default_replicas(),
            architecture: default_architecture(),
        }
    }

    fn worker() -> Self {
        Self {
            name: "worker".to_string(),
            ..Self::control_plane()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Networking {
    #[serde(default = "default_machine_network")]
    pub machine_network: Vec<MachineNetworkEntry>,
    #[serde(default = "default_cluster_network")]
    pub cluster_network: Vec<ClusterNetworkEntry>,
    #[serde(default = "default_service_network")]
    pub service_network: Vec<String>,
}

impl Default for Networking {
    fn default() -> Self {
        Self {
            machine_network: default_machine_network(),
            cluster_network: default_cluster_network(),
            service_network: default_service_network(),
        }
    }
}

fn default_machine_network() -> Vec<MachineNetworkEntry> {
    vec![MachineNetworkEntry {
        cidr: "10.0.0.0/16".to_string(),
    }]
}

fn default_cluster_network() -> Vec<ClusterNetworkEntry> {
    vec![ClusterNetworkEntry {
        cidr: "10.128.0.0/14".to_string(),
        host_prefix: 23,
    }]
}

fn default_service_network() -> Vec<String> {
    vec!["172.30.0.0/16".to_string()]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineNetworkEntry {
    pub cidr: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterNetworkEntry {
    pub cidr: String,
    pub host_prefix: u8,
}

/// Exactly one platform section must be present
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Aws(AwsPlatform),
    /// User-provisioned infrastructure
    #[serde(rename = "none")]
    Unmanaged {},
}

impl Platform {
    pub fn name(&self) -> &'static str {
        match self {
            Platform::Aws(_) => "aws",
            Platform::Unmanaged {} => "none",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwsPlatform {
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub vpc: AwsVpc,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwsVpc {
    #[serde(default)]
    pub subnets: Vec<AwsSubnet>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwsSubnet {
    pub id: String,
}

/// Parsed `a.b.c.d/n` or IPv6 equivalent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cidr {
    pub addr: IpAddr,
    pub prefix: u8,
}

impl Cidr {
    pub fn parse(s: &str) -> Result<Self, String> {
        let (addr, prefix) = s
            .split_once('/')
            .ok_or_else(|| "missing prefix length".to_string())?;
        let addr: IpAddr = addr
            .parse()
            .map_err(|_| format!("invalid IP address '{addr}'"))?;
        let prefix: u8 = prefix
            .parse()
            .map_err(|_| format!("invalid prefix length '{prefix}'"))?;
        let max = if addr.is_ipv4() { 32 } else { 128 };
        if prefix > max {
            return Err(format!("prefix length {prefix} exceeds {max}"));
        }
        Ok(Self { addr, prefix })
    }
}

/// Reads, defaults and validates `install-config.yaml`
pub struct InstallConfigAsset {
    validator: Arc<dyn Validator<InstallConfig>>,
}

impl InstallConfigAsset {
    pub fn new(validator: Arc<dyn Validator<InstallConfig>>) -> Self {
        Self { validator }
    }

    pub fn parse(yaml: &str) -> Result<InstallConfig, GenerateError> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }
}

impl Default for InstallConfigAsset {
    fn default() -> Self {
        Self::new(Arc::new(InstallConfigValidator))
    }
}

impl Asset for InstallConfigAsset {
    fn kind(&self) -> AssetKind {
        AssetKind::from_static(INSTALL_CONFIG)
    }

    fn name(&self) -> String {
        "Install Config".to_string()
    }

    fn generate(
        &self,
        _parents: &Parents,
        ctx: &GenerateContext,
    ) -> Result<AssetContent, GenerateError> {
        let path = ctx.workdir().join(INSTALL_CONFIG_FILE);
        let yaml = std::fs::read_to_string(&path)
            .map_err(|error| GenerateError::Input { path, error })?;
        let config = Self::parse(&yaml)?;
        ensure_valid(self.validator.as_ref(), &config)?;
        tracing::debug!(
            cluster = %config.metadata.name,
            platform = config.platform.name(),
            "install config accepted"
        );
        Ok(AssetContent::from_data(&config)?)
    }
}
