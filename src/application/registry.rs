//! Asset Registry
//!
//! Holds every known asset implementation keyed by kind, together with the
//! validated dependency graph. Building the registry is where duplicate
//! kinds, dangling dependencies and cycles are rejected.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::domain::ports::Asset;
use crate::domain::services::DependencyGraph;
use crate::domain::value_objects::AssetKind;
use crate::error::GraphError;

/// Immutable set of asset implementations plus their dependency graph
pub struct AssetRegistry {
    assets: BTreeMap<AssetKind, Arc<dyn Asset>>,
    graph: DependencyGraph,
}

impl AssetRegistry {
    pub fn builder() -> AssetRegistryBuilder {
        AssetRegistryBuilder::default()
    }

    pub fn get(&self, kind: &AssetKind) -> Option<Arc<dyn Asset>> {
        self.assets.get(kind).cloned()
    }

    pub fn contains(&self, kind: &AssetKind) -> bool {
        self.assets.contains_key(kind)
    }

    /// Registered kinds in lexical order
    pub fn kinds(&self) -> impl Iterator<Item = &AssetKind> {
        self.assets.keys()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn is_transient(&self, kind: &AssetKind) -> bool {
        self.assets
            .get(kind)
            .map(|asset| asset.is_transient())
            .unwrap_or(false)
    }
}

impl fmt::Debug for AssetRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetRegistry")
            .field("kinds", &self.assets.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Collects asset implementations before validating the graph
#[derive(Default)]
pub struct AssetRegistryBuilder {
    assets: Vec<Arc<dyn Asset>>,
}

impl AssetRegistryBuilder {
    pub fn register<A: Asset + 'static>(self, asset: A) -> Self {
        self.register_shared(Arc::new(asset))
    }

    pub fn register_shared(mut self, asset: Arc<dyn Asset>) -> Self {
        self.assets.push(asset);
        self
    }

    /// Validate and freeze the registry
    pub fn build(self) -> Result<AssetRegistry, GraphError> {
        let mut assets: BTreeMap<AssetKind, Arc<dyn Asset>> = BTreeMap::new();
        let mut edges = BTreeMap::new();

        for asset in self.assets {
            let kind = asset.kind();
            if assets.contains_key(&kind) {
                return Err(GraphError::DuplicateKind { kind });
            }
            edges.insert(kind.clone(), asset.dependencies());
            assets.insert(kind, asset);
        }

        let graph = DependencyGraph::build(edges)?;
        tracing::debug!(assets = assets.len(), "asset registry built");

        Ok(AssetRegistry { assets, graph })
    }
}
