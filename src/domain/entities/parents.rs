//! Parents - the generated dependencies handed to `generate`

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::domain::entities::AssetContent;
use crate::domain::value_objects::AssetKind;
use crate::error::GenerateError;

/// Generated content of an asset's declared dependencies
///
/// The resolver fills this with exactly the declared dependency kinds.
/// Asking for anything else is a programming error in the asset and is
/// reported as `GenerateError::UndeclaredDependency`.
#[derive(Debug, Clone, Default)]
pub struct Parents {
    entries: BTreeMap<AssetKind, Arc<AssetContent>>,
}

impl Parents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy when exercising an asset on its own
    pub fn with(mut self, kind: AssetKind, content: AssetContent) -> Self {
        self.entries.insert(kind, Arc::new(content));
        self
    }

    pub(crate) fn insert(&mut self, kind: AssetKind, content: Arc<AssetContent>) {
        self.entries.insert(kind, content);
    }

    pub fn get(&self, kind: &AssetKind) -> Result<&AssetContent, GenerateError> {
        self.entries
            .get(kind)
            .map(|c| c.as_ref())
            .ok_or_else(|| GenerateError::UndeclaredDependency { kind: kind.clone() })
    }

    /// Typed payload of a dependency
    pub fn data_as<T: DeserializeOwned>(&self, kind: &AssetKind) -> Result<T, GenerateError> {
        Ok(self.get(kind)?.data_as()?)
    }

    pub fn kinds(&self) -> impl Iterator<Item = &AssetKind> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
