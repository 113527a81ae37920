//! Asset Kind Value Object
//!
//! The stable identity of an asset. At most one live instance of each kind
//! exists per resolution session, and the kind doubles as the state record
//! file stem, so the accepted alphabet is deliberately narrow.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Maximum length of a kind identifier
pub const MAX_KIND_LEN: usize = 128;

/// Rejected kind identifier
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid asset kind '{kind}': {reason}")]
pub struct InvalidKind {
    pub kind: String,
    pub reason: &'static str,
}

/// Stable asset identity (`[a-z0-9._-]`, not starting with `.`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct AssetKind(String);

impl AssetKind {
    /// Parse and validate a kind identifier
    pub fn new(kind: impl Into<String>) -> Result<Self, InvalidKind> {
        let kind = kind.into();
        let reason = if kind.is_empty() {
            Some("must not be empty")
        } else if kind.len() > MAX_KIND_LEN {
            Some("longer than 128 characters")
        } else if kind.starts_with('.') {
            Some("must not start with '.'")
        } else if !kind
            .chars()
            .all(|c| matches!(c, 'a'..='z' | '0'..='9' | '.' | '_' | '-'))
        {
            Some("only lowercase letters, digits, '.', '_' and '-' are allowed")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(InvalidKind { kind, reason }),
            None => Ok(Self(kind)),
        }
    }

    /// Kind for compile-time constants.
    ///
    /// Panics on an invalid identifier; only meant for literals.
    pub fn from_static(kind: &'static str) -> Self {
        match Self::new(kind) {
            Ok(kind) => kind,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AssetKind {
    type Err = InvalidKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for AssetKind {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for AssetKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        AssetKind::new(raw).map_err(serde::de::Error::custom)
    }
}
