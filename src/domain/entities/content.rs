//! Asset content entity - what a `generate` call produces
//!
//! Content is a typed JSON payload plus zero or more file blobs destined for
//! the output directory. It is the unit persisted in the state store.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::ContentHash;

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}

/// A file blob produced by an asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetFile {
    /// Path relative to the output directory
    path: PathBuf,
    #[serde(with = "base64_bytes")]
    contents: Vec<u8>,
    /// Unix permission bits applied on materialization
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mode: Option<u32>,
}

impl AssetFile {
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
            mode: None,
        }
    }

    pub fn with_mode(mut self, mode: u32) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn contents(&self) -> &[u8] {
        &self.contents
    }

    pub fn mode(&self) -> Option<u32> {
        self.mode
    }

    pub fn hash(&self) -> ContentHash {
        ContentHash::from_bytes(&self.contents)
    }
}

/// Generated content of one asset kind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetContent {
    #[serde(default)]
    data: serde_json::Value,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    files: Vec<AssetFile>,
}

impl AssetContent {
    /// Content with no payload and no files
    pub fn empty() -> Self {
        Self::default()
    }

    /// Content carrying a typed payload
    pub fn from_data<T: Serialize>(data: &T) -> Result<Self, serde_json::Error> {
        Ok(Self {
            data: serde_json::to_value(data)?,
            files: Vec::new(),
        })
    }

    pub fn with_file(mut self, file: AssetFile) -> Self {
        self.files.push(file);
        self
    }

    pub fn data(&self) -> &serde_json::Value {
        &self.data
    }

    /// Deserialize the payload into its concrete type
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.data)
    }

    pub fn files(&self) -> &[AssetFile] {
        &self.files
    }

    /// Canonical serialized form (object keys sorted)
    pub fn to_canonical_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Integrity hash over the canonical serialized form
    pub fn hash(&self) -> Result<ContentHash, serde_json::Error> {
        Ok(ContentHash::from_bytes(&self.to_canonical_bytes()?))
    }
}
