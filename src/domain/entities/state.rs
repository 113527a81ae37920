//! Per-session lifecycle of an asset kind

use std::fmt;

/// Where a session's copy of an asset's content came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    /// `generate` ran in this session
    Generated,
    /// Adopted from the state store without generating
    Loaded,
}

/// Lifecycle state of one asset kind within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetState {
    Unresolved,
    Generating,
    Generated,
    Failed,
    Purged,
}

impl fmt::Display for AssetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AssetState::Unresolved => "unresolved",
            AssetState::Generating => "generating",
            AssetState::Generated => "generated",
            AssetState::Failed => "failed",
            AssetState::Purged => "purged",
        };
        f.write_str(s)
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Generated => f.write_str("generated"),
            Origin::Loaded => f.write_str("loaded"),
        }
    }
}
