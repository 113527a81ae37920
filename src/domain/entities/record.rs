//! State record entity - one persisted asset
//!
//! A record is a pure data structure; reading and writing it is handled by a
//! `StateStore` implementation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::AssetContent;
use crate::domain::value_objects::{AssetKind, ContentHash};

/// Current on-disk record format
pub const RECORD_FORMAT_VERSION: u32 = 1;

/// Persisted content of one asset kind plus its integrity marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateRecord {
    version: u32,
    kind: AssetKind,
    hash: ContentHash,
    generated_at: DateTime<Utc>,
    content: AssetContent,
}

impl StateRecord {
    /// Wrap freshly generated content, stamping hash and time
    pub fn new(kind: AssetKind, content: AssetContent) -> Result<Self, serde_json::Error> {
        let hash = content.hash()?;
        Ok(Self {
            version: RECORD_FORMAT_VERSION,
            kind,
            hash,
            generated_at: Utc::now(),
            content,
        })
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn kind(&self) -> &AssetKind {
        &self.kind
    }

    pub fn hash(&self) -> &ContentHash {
        &self.hash
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    pub fn content(&self) -> &AssetContent {
        &self.content
    }

    pub fn into_content(self) -> AssetContent {
        self.content
    }

    /// Recompute the content hash and compare it with the stored marker
    pub fn verify(&self) -> bool {
        matches!(self.content.hash(), Ok(actual) if actual == self.hash)
    }
}
