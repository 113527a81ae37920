//! Dependency Graph Service
//!
//! Static view of the asset graph, built once from every registered asset's
//! declared dependencies. Construction fails fast on unknown references and
//! cycles, so a misdeclared graph never reaches the resolver.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::value_objects::AssetKind;
use crate::error::GraphError;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Directed acyclic graph over asset kinds
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    dependencies: BTreeMap<AssetKind, Vec<AssetKind>>,
    dependents: BTreeMap<AssetKind, BTreeSet<AssetKind>>,
    /// Dependencies always precede their dependents
    order: Vec<AssetKind>,
}

impl DependencyGraph {
    /// Build and validate the graph from `kind -> declared dependencies`
    pub fn build(edges: BTreeMap<AssetKind, Vec<AssetKind>>) -> Result<Self, GraphError> {
        let mut dependencies = BTreeMap::new();
        for (kind, deps) in edges {
            let mut seen = BTreeSet::new();
            let deps: Vec<AssetKind> = deps.into_iter().filter(|d| seen.insert(d.clone())).collect();
            dependencies.insert(kind, deps);
        }

        for (kind, deps) in &dependencies {
            if let Some(missing) = deps.iter().find(|d| !dependencies.contains_key(*d)) {
                return Err(GraphError::UnknownDependency {
                    kind: kind.clone(),
                    dependency: missing.clone(),
                });
            }
        }

        let mut marks = BTreeMap::new();
        let mut path = Vec::new();
        let mut order = Vec::with_capacity(dependencies.len());
        for kind in dependencies.keys() {
            visit(kind, &dependencies, &mut marks, &mut path, &mut order)?;
        }

        let mut dependents: BTreeMap<AssetKind, BTreeSet<AssetKind>> = dependencies
            .keys()
            .map(|k| (k.clone(), BTreeSet::new()))
            .collect();
        for (kind, deps) in &dependencies {
            for dep in deps {
                if let Some(set) = dependents.get_mut(dep) {
                    set.insert(kind.clone());
                }
            }
        }

        Ok(Self {
            dependencies,
            dependents,
            order,
        })
    }

    pub fn contains(&self, kind: &AssetKind) -> bool {
        self.dependencies.contains_key(kind)
    }

    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }

    /// Declared dependencies of `kind` (empty for unknown kinds)
    pub fn dependencies(&self, kind: &AssetKind) -> &[AssetKind] {
        self.dependencies
            .get(kind)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Kinds that declare `kind` as a dependency
    pub fn dependents(&self, kind: &AssetKind) -> impl Iterator<Item = &AssetKind> {
        self.dependents.get(kind).into_iter().flatten()
    }

    /// Every kind, dependencies first
    pub fn topological_order(&self) -> &[AssetKind] {
        &self.order
    }

    /// `roots` plus everything they transitively depend on
    pub fn closure(&self, roots: &[AssetKind]) -> BTreeSet<AssetKind> {
        let mut seen = BTreeSet::new();
        let mut stack: Vec<&AssetKind> = roots.iter().collect();
        while let Some(kind) = stack.pop() {
            if seen.insert(kind.clone()) {
                stack.extend(self.dependencies(kind));
            }
        }
        seen
    }
}

fn visit<'a>(
    kind: &'a AssetKind,
    edges: &'a BTreeMap<AssetKind, Vec<AssetKind>>,
    marks: &mut BTreeMap<&'a AssetKind, Mark>,
    path: &mut Vec<&'a AssetKind>,
    order: &mut Vec<AssetKind>,
) -> Result<(), GraphError> {
    match marks.get(kind) {
        Some(Mark::Done) => return Ok(()),
        Some(Mark::Visiting) => {
            let start = path.iter().position(|k| *k == kind).unwrap_or(0);
            let mut members: Vec<AssetKind> = path[start..].iter().map(|k| (*k).clone()).collect();
            members.push(kind.clone());
            return Err(GraphError::Cycle { members });
        }
        None => {}
    }

    marks.insert(kind, Mark::Visiting);
    path.push(kind);
    for dep in edges.get(kind).map(Vec::as_slice).unwrap_or_default() {
        visit(dep, edges, marks, path, order)?;
    }
    path.pop();
    marks.insert(kind, Mark::Done);
    order.push(kind.clone());
    Ok(())
}
