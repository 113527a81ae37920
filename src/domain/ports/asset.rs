//! Asset port - the plugin interface every installation artifact implements
//!
//! The resolver only ever sees `dyn Asset`; it never knows concrete kinds.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::domain::entities::{AssetContent, Parents};
use crate::domain::value_objects::AssetKind;
use crate::error::GenerateError;

/// Cooperative cancellation flag shared between the caller and `generate`
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// `Err(Cancelled)` once the token has fired
    pub fn check(&self) -> Result<(), GenerateError> {
        if self.is_cancelled() {
            Err(GenerateError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Ambient inputs available to every `generate` call
#[derive(Debug, Clone)]
pub struct GenerateContext {
    workdir: PathBuf,
    cancellation: CancellationToken,
}

impl GenerateContext {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Directory user-provided inputs are read from
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }
}

impl Default for GenerateContext {
    fn default() -> Self {
        Self::new(".")
    }
}

/// A unit of generated installation content with declared dependencies
pub trait Asset: Send + Sync {
    /// Stable identity of this asset
    fn kind(&self) -> AssetKind;

    /// Human readable name (defaults to the kind)
    fn name(&self) -> String {
        self.kind().to_string()
    }

    /// Kinds that must be generated before this one.
    ///
    /// The list must be complete: `parents` passed to `generate` contains
    /// exactly these kinds.
    fn dependencies(&self) -> Vec<AssetKind> {
        Vec::new()
    }

    /// Produce this asset's content from its generated dependencies.
    ///
    /// Called at most once per session for a kind. Invalid input is
    /// reported as an error, never a panic.
    fn generate(
        &self,
        parents: &Parents,
        ctx: &GenerateContext,
    ) -> Result<AssetContent, GenerateError>;

    /// Whether content must be purged once every dependent has consumed it
    fn is_transient(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancellation_is_shared_between_clones() {
        let token = CancellationToken::new();
        let ctx = GenerateContext::new("/tmp").with_cancellation(token.clone());
        assert!(ctx.cancellation().check().is_ok());

        token.cancel();
        assert!(matches!(
            ctx.cancellation().check(),
            Err(GenerateError::Cancelled)
        ));
    }
}
