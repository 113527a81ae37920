//! Common test utilities for assetforge integration tests.
//!
//! - `Node`: a configurable synthetic asset that counts its generations
//! - `Counter`: shared generation tally keyed by kind
//! - Install-config fixtures and an install directory helper
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use assetforge::{Asset, AssetContent, AssetFile, AssetKind, GenerateContext, GenerateError, Parents};

pub fn k(name: &str) -> AssetKind {
    AssetKind::new(name.to_string()).unwrap()
}

/// Generation counts shared between assets and the test body
#[derive(Debug, Clone, Default)]
pub struct Counter(Arc<Mutex<BTreeMap<AssetKind, usize>>>);

impl Counter {
    pub fn bump(&self, kind: &AssetKind) {
        *self.0.lock().unwrap().entry(kind.clone()).or_default() += 1;
    }

    pub fn get(&self, kind: &AssetKind) -> usize {
        self.0.lock().unwrap().get(kind).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.0.lock().unwrap().values().sum()
    }

    pub fn snapshot(&self) -> BTreeMap<AssetKind, usize> {
        self.0.lock().unwrap().clone()
    }
}

/// Synthetic asset: data is its kind plus the data of each parent, and it
/// writes one file named after its kind.
pub struct Node {
    pub kind: AssetKind,
    pub deps: Vec<AssetKind>,
    pub transient: bool,
    pub fail: bool,
    pub delay: Option<Duration>,
    pub mode: Option<u32>,
    pub counter: Counter,
}

impl Node {
    pub fn new(kind: &str, deps: &[&str], counter: &Counter) -> Self {
        Self {
            kind: k(kind),
            deps: deps.iter().map(|d| k(d)).collect(),
            transient: false,
            fail: false,
            delay: None,
            mode: None,
            counter: counter.clone(),
        }
    }

    pub fn transient(mut self) -> Self {
        self.transient = true;
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn slow(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Unix mode for the written file
    pub fn moded(mut self, mode: u32) -> Self {
        self.mode = Some(mode);
        self
    }
}

impl Asset for Node {
    fn kind(&self) -> AssetKind {
        self.kind.clone()
    }

    fn dependencies(&self) -> Vec<AssetKind> {
        self.deps.clone()
    }

    fn generate(&self, parents: &Parents, _ctx: &GenerateContext) -> Result<AssetContent, GenerateError> {
        self.counter.bump(&self.kind);
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        if self.fail {
            return Err(GenerateError::Other(format!("{} refused", self.kind)));
        }

        let mut inputs = Vec::new();
        for dep in &self.deps {
            inputs.push(parents.get(dep)?.data().clone());
        }
        let data = serde_json::json!({ "kind": self.kind, "inputs": inputs });
        let mut file = AssetFile::new(format!("out/{}.json", self.kind), data.to_string());
        if let Some(mode) = self.mode {
            file = file.with_mode(mode);
        }
        Ok(AssetContent::from_data(&data)?.with_file(file))
    }

    fn is_transient(&self) -> bool {
        self.transient
    }
}

/// Smallest install-config the validator accepts
pub const MINIMAL_INSTALL_CONFIG: &str = r#"
apiVersion: v1
baseDomain: example.com
metadata:
  name: demo
platform:
  none: {}
"#;

/// Install config on AWS with two subnets and an SSH key
pub const AWS_INSTALL_CONFIG: &str = r#"
apiVersion: v1
baseDomain: example.com
metadata:
  name: prod-east
sshKey: ssh-ed25519 AAAAC3Nza ops@example
platform:
  aws:
    region: us-east-1
    vpc:
      subnets:
        - id: subnet-a
        - id: subnet-b
"#;

/// Install config with several independent field errors
pub const INVALID_INSTALL_CONFIG: &str = r#"
apiVersion: v1
metadata:
  name: Bad_Name
networking:
  machineNetwork:
    - cidr: 10.0.0.0/99
platform:
  none: {}
"#;

pub fn write_install_config(dir: &Path, contents: &str) {
    std::fs::write(dir.join("install-config.yaml"), contents).unwrap();
}
