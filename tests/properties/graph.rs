//! Property tests for resolution over random DAGs.

use std::sync::Arc;

use proptest::prelude::*;
use proptest::sample::Index;

use assetforge::infrastructure::MemoryStateStore;
use assetforge::{AssetKind, AssetRegistry, Session};

use crate::common::{k, Counter, Node};

/// Node `i` may only depend on nodes `< i`, so the graph is acyclic
fn random_dag() -> impl Strategy<Value = Vec<Vec<usize>>> {
    proptest::collection::vec(proptest::collection::vec(any::<Index>(), 0..4), 1..12).prop_map(
        |nodes| {
            nodes
                .into_iter()
                .enumerate()
                .map(|(i, picks)| {
                    if i == 0 {
                        return Vec::new();
                    }
                    let mut deps: Vec<usize> = picks.iter().map(|p| p.index(i)).collect();
                    deps.sort_unstable();
                    deps.dedup();
                    deps
                })
                .collect()
        },
    )
}

fn name(i: usize) -> String {
    format!("n{i}")
}

fn build(dag: &[Vec<usize>], counter: &Counter) -> AssetRegistry {
    let mut builder = AssetRegistry::builder();
    for (i, deps) in dag.iter().enumerate() {
        let dep_names: Vec<String> = deps.iter().map(|d| name(*d)).collect();
        let dep_refs: Vec<&str> = dep_names.iter().map(String::as_str).collect();
        builder = builder.register(Node::new(&name(i), &dep_refs, counter));
    }
    builder.build().unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: resolving any roots generates exactly their closure, once each.
    #[test]
    fn property_closure_is_generated_exactly_once(
        dag in random_dag(),
        root_picks in proptest::collection::vec(any::<Index>(), 1..4),
        parallel in any::<bool>(),
    ) {
        let counter = Counter::default();
        let registry = Arc::new(build(&dag, &counter));
        let roots: Vec<AssetKind> = root_picks.iter().map(|p| k(&name(p.index(dag.len())))).collect();
        let closure = registry.graph().closure(&roots);

        let session = Session::new(registry.clone(), Arc::new(MemoryStateStore::new()))
            .with_parallel(parallel);
        let resolved = session.fetch_all(&roots).unwrap();

        prop_assert_eq!(resolved.len(), {
            let mut distinct = roots.clone();
            distinct.sort();
            distinct.dedup();
            distinct.len()
        });
        let counts = counter.snapshot();
        prop_assert_eq!(counts.len(), closure.len());
        for kind in &closure {
            prop_assert_eq!(counts.get(kind).copied(), Some(1), "kind {}", kind);
        }
    }

    /// PROPERTY: a second session over the same store generates nothing.
    #[test]
    fn property_persisted_graph_is_reused(dag in random_dag()) {
        let counter = Counter::default();
        let registry = Arc::new(build(&dag, &counter));
        let store = Arc::new(MemoryStateStore::new());
        let roots: Vec<AssetKind> = registry.kinds().cloned().collect();

        Session::new(registry.clone(), store.clone()).fetch_all(&roots).unwrap();
        let generated = counter.total();
        Session::new(registry, store).fetch_all(&roots).unwrap();

        prop_assert_eq!(generated, dag.len());
        prop_assert_eq!(counter.total(), generated);
    }
}
