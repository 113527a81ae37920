//! Resolution Session
//!
//! A session resolves asset kinds to generated content. It is an explicit
//! object: everything cached in memory lives here and is dropped with it.
//!
//! Resolving a kind:
//! 1. Serve it from memory if this session already produced it
//! 2. Otherwise adopt a stored record (its subtree is never visited)
//! 3. Otherwise resolve dependencies, call `generate`, persist, publish
//!
//! Each kind has its own gate (`Mutex` + `Condvar`). The first caller to
//! reach an unresolved kind owns its generation; concurrent callers wait on
//! the gate and share the outcome, so `generate` runs at most once per kind.
//!
//! Every nested fetch registers a `(dependent, dependency)` edge while it is
//! in flight. Before waiting on a gate, a caller follows those edges from the
//! kind it is about to wait on; reaching its own path means the owner is
//! (transitively) waiting on the caller, and the cycle is reported instead.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use crate::domain::entities::{AssetContent, AssetState, Origin, Parents, StateRecord};
use crate::domain::ports::{
    Asset, GenerateContext, NoopEventSink, ResolveEvent, ResolveEventSink, StateStore,
    StateStoreError,
};
use crate::domain::value_objects::AssetKind;
use crate::error::{GenerateError, RecordedFailure, ResolveError};

use super::registry::AssetRegistry;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// `None` in a slot means nothing has happened to the kind yet
enum SlotState {
    Generating,
    Ready {
        content: Arc<AssetContent>,
        origin: Origin,
    },
    Failed(Arc<RecordedFailure>),
    Purged,
}

#[derive(Default)]
struct Slot {
    state: Mutex<Option<SlotState>>,
    settled: Condvar,
}

/// Ownership of one kind's generation.
///
/// Dropping the gate without settling it (a panicking `generate`) records a
/// failure and wakes waiters instead of leaving them blocked forever.
struct Gate<'a> {
    slot: &'a Slot,
    kind: &'a AssetKind,
    settled: bool,
}

impl Gate<'_> {
    fn settle(mut self, state: SlotState) {
        *lock(&self.slot.state) = Some(state);
        self.slot.settled.notify_all();
        self.settled = true;
    }
}

impl Drop for Gate<'_> {
    fn drop(&mut self) {
        if !self.settled {
            let failure = Arc::new(RecordedFailure::panicked(self.kind));
            *lock(&self.slot.state) = Some(SlotState::Failed(failure));
            self.slot.settled.notify_all();
        }
    }
}

type Edge = (AssetKind, AssetKind);

/// Removes its edge from the in-flight set when the fetch returns
struct InFlight<'a> {
    edges: &'a Mutex<Vec<Edge>>,
    edge: Option<Edge>,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let Some(edge) = self.edge.take() else {
            return;
        };
        let mut edges = lock(self.edges);
        if let Some(pos) = edges.iter().position(|e| *e == edge) {
            edges.swap_remove(pos);
        }
    }
}

/// One resolution run over a registry and a state store
pub struct Session {
    registry: Arc<AssetRegistry>,
    store: Arc<dyn StateStore>,
    events: Arc<dyn ResolveEventSink>,
    context: GenerateContext,
    parallel: bool,
    slots: Mutex<HashMap<AssetKind, Arc<Slot>>>,
    /// Dependency edges of nested fetches that have not returned yet
    in_flight: Mutex<Vec<Edge>>,
    /// Serializes writes into the state store
    persist: Mutex<()>,
    resolved: Mutex<Vec<(AssetKind, Origin)>>,
}

impl Session {
    pub fn new(registry: Arc<AssetRegistry>, store: Arc<dyn StateStore>) -> Self {
        Self {
            registry,
            store,
            events: Arc::new(NoopEventSink),
            context: GenerateContext::default(),
            parallel: true,
            slots: Mutex::new(HashMap::new()),
            in_flight: Mutex::new(Vec::new()),
            persist: Mutex::new(()),
            resolved: Mutex::new(Vec::new()),
        }
    }

    pub fn with_events(mut self, events: Arc<dyn ResolveEventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn with_context(mut self, context: GenerateContext) -> Self {
        self.context = context;
        self
    }

    /// Resolve sibling dependencies on scoped threads (default `true`)
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn registry(&self) -> &Arc<AssetRegistry> {
        &self.registry
    }

    pub fn store(&self) -> &Arc<dyn StateStore> {
        &self.store
    }

    pub fn context(&self) -> &GenerateContext {
        &self.context
    }

    /// Ensure `kind` is generated (or loaded) in this session and return it
    pub fn fetch(&self, kind: &AssetKind) -> Result<Arc<AssetContent>, ResolveError> {
        self.fetch_on_path(kind, &[])
    }

    /// Fetch several roots, aggregating every failure instead of stopping at the first
    pub fn fetch_all(
        &self,
        roots: &[AssetKind],
    ) -> Result<BTreeMap<AssetKind, Arc<AssetContent>>, ResolveError> {
        let outcomes = self.fetch_many(roots, &[]);
        let mut contents = BTreeMap::new();
        let mut errors = Vec::new();
        for (kind, outcome) in roots.iter().zip(outcomes) {
            match outcome {
                Ok(content) => {
                    contents.insert(kind.clone(), content);
                }
                Err(err) => errors.push(err),
            }
        }
        match ResolveError::combine(errors) {
            Some(err) => Err(err),
            None => Ok(contents),
        }
    }

    /// Content already produced in this session, without triggering work
    pub fn get(&self, kind: &AssetKind) -> Option<Arc<AssetContent>> {
        let slot = self.existing_slot(kind)?;
        let state = lock(&slot.state);
        match state.as_ref() {
            Some(SlotState::Ready { content, .. }) => Some(content.clone()),
            _ => None,
        }
    }

    pub fn state(&self, kind: &AssetKind) -> AssetState {
        let Some(slot) = self.existing_slot(kind) else {
            return AssetState::Unresolved;
        };
        let state = lock(&slot.state);
        match state.as_ref() {
            None => AssetState::Unresolved,
            Some(SlotState::Generating) => AssetState::Generating,
            Some(SlotState::Ready { .. }) => AssetState::Generated,
            Some(SlotState::Failed(_)) => AssetState::Failed,
            Some(SlotState::Purged) => AssetState::Purged,
        }
    }

    /// Whether the content was generated or adopted from the store
    pub fn origin(&self, kind: &AssetKind) -> Option<Origin> {
        let slot = self.existing_slot(kind)?;
        let state = lock(&slot.state);
        match state.as_ref() {
            Some(SlotState::Ready { origin, .. }) => Some(*origin),
            _ => None,
        }
    }

    /// Every kind that became available in this session, in completion order
    pub fn resolved(&self) -> Vec<(AssetKind, Origin)> {
        lock(&self.resolved).clone()
    }

    /// Drop generated content from memory, returning it.
    ///
    /// Only kinds that are currently generated are affected.
    pub(crate) fn evict(&self, kind: &AssetKind) -> Option<Arc<AssetContent>> {
        let slot = self.existing_slot(kind)?;
        let mut state = lock(&slot.state);
        match state.take() {
            Some(SlotState::Ready { content, .. }) => {
                *state = Some(SlotState::Purged);
                Some(content)
            }
            other => {
                *state = other;
                None
            }
        }
    }

    pub(crate) fn emit(&self, event: ResolveEvent) {
        self.events.on_event(event);
    }

    fn emit_detail(&self, event: ResolveEvent) {
        if self.events.wants_detailed_events() {
            self.events.on_event(event);
        }
    }

    fn existing_slot(&self, kind: &AssetKind) -> Option<Arc<Slot>> {
        lock(&self.slots).get(kind).cloned()
    }

    fn slot(&self, kind: &AssetKind) -> Arc<Slot> {
        lock(&self.slots).entry(kind.clone()).or_default().clone()
    }

    fn enter(&self, path: &[AssetKind], kind: &AssetKind) -> InFlight<'_> {
        let edge = path.last().map(|dependent| (dependent.clone(), kind.clone()));
        if let Some(edge) = &edge {
            lock(&self.in_flight).push(edge.clone());
        }
        InFlight {
            edges: &self.in_flight,
            edge,
        }
    }

    /// Follow in-flight edges from `kind`. A route back into `path` means
    /// waiting on `kind` would never return; the cycle is returned in walk
    /// order, first member repeated.
    fn blocking_cycle(&self, kind: &AssetKind, path: &[AssetKind]) -> Option<Vec<AssetKind>> {
        let edges = lock(&self.in_flight);
        let mut previous: HashMap<&AssetKind, &AssetKind> = HashMap::new();
        let mut queue = VecDeque::from([kind]);

        while let Some(current) = queue.pop_front() {
            if let Some(start) = path.iter().position(|k| k == current) {
                let mut route = vec![current.clone()];
                let mut at = current;
                while let Some(prev) = previous.get(at) {
                    route.push((*prev).clone());
                    at = *prev;
                }
                route.reverse();
                let mut members = path[start..].to_vec();
                members.extend(route);
                return Some(members);
            }
            for (from, to) in edges.iter() {
                if from == current && to != kind && !previous.contains_key(to) {
                    previous.insert(to, current);
                    queue.push_back(to);
                }
            }
        }
        None
    }

    /// `path` holds the kinds currently being resolved above this call
    fn fetch_on_path(
        &self,
        kind: &AssetKind,
        path: &[AssetKind],
    ) -> Result<Arc<AssetContent>, ResolveError> {
        if let Some(start) = path.iter().position(|k| k == kind) {
            let mut members = path[start..].to_vec();
            members.push(kind.clone());
            return Err(ResolveError::Cycle { members });
        }

        let asset = self
            .registry
            .get(kind)
            .ok_or_else(|| ResolveError::UnknownKind { kind: kind.clone() })?;

        let _in_flight = self.enter(path, kind);
        let slot = self.slot(kind);
        {
            let mut state = lock(&slot.state);
            loop {
                match state.as_ref() {
                    Some(SlotState::Ready { content, .. }) => {
                        let content = content.clone();
                        drop(state);
                        self.emit_detail(ResolveEvent::CacheHit { kind: kind.clone() });
                        return Ok(content);
                    }
                    Some(SlotState::Failed(failure)) => {
                        return Err(ResolveError::PreviouslyFailed {
                            kind: kind.clone(),
                            failure: failure.clone(),
                        });
                    }
                    Some(SlotState::Generating) => {
                        if let Some(members) = self.blocking_cycle(kind, path) {
                            return Err(ResolveError::Cycle { members });
                        }
                        state = slot
                            .settled
                            .wait(state)
                            .unwrap_or_else(PoisonError::into_inner);
                    }
                    None | Some(SlotState::Purged) => {
                        *state = Some(SlotState::Generating);
                        break;
                    }
                }
            }
        }

        let gate = Gate {
            slot: &slot,
            kind,
            settled: false,
        };

        match self.produce(kind, asset.as_ref(), path) {
            Ok((content, origin)) => {
                lock(&self.resolved).push((kind.clone(), origin));
                gate.settle(SlotState::Ready {
                    content: content.clone(),
                    origin,
                });
                Ok(content)
            }
            Err(err) => {
                self.emit(ResolveEvent::GenerateFailed {
                    kind: kind.clone(),
                    error: err.to_string(),
                });
                gate.settle(SlotState::Failed(Arc::new(RecordedFailure::from_error(&err))));
                Err(err)
            }
        }
    }

    fn produce(
        &self,
        kind: &AssetKind,
        asset: &dyn Asset,
        path: &[AssetKind],
    ) -> Result<(Arc<AssetContent>, Origin), ResolveError> {
        self.emit_detail(ResolveEvent::FetchStarted { kind: kind.clone() });

        match self.store.load(kind) {
            Ok(Some(record)) => {
                tracing::debug!(kind = %kind, hash = %record.hash().short(), "adopted stored record");
                self.emit(ResolveEvent::Loaded {
                    kind: kind.clone(),
                    hash: record.hash().clone(),
                });
                return Ok((Arc::new(record.into_content()), Origin::Loaded));
            }
            Ok(None) => {}
            Err(err) if err.is_corruption() => {
                tracing::warn!(kind = %kind, error = %err, "ignoring unusable state record");
                self.emit(ResolveEvent::CorruptRecord {
                    kind: kind.clone(),
                    message: err.to_string(),
                });
            }
            Err(err) => {
                return Err(ResolveError::Persistence {
                    kind: kind.clone(),
                    error: err,
                })
            }
        }

        let dependencies = asset.dependencies();
        let mut below = path.to_vec();
        below.push(kind.clone());

        let mut parents = Parents::new();
        let mut failures = Vec::new();
        for (dependency, outcome) in dependencies
            .iter()
            .zip(self.fetch_many(&dependencies, &below))
        {
            match outcome {
                Ok(content) => parents.insert(dependency.clone(), content),
                Err(err) => failures.push(err),
            }
        }
        if let Some(err) = ResolveError::combine(failures) {
            return Err(ResolveError::Dependency {
                kind: kind.clone(),
                error: Box::new(err),
            });
        }

        if self.context.cancellation().is_cancelled() {
            return Err(ResolveError::Cancelled { kind: kind.clone() });
        }

        self.emit(ResolveEvent::Generating {
            kind: kind.clone(),
            dependency_count: parents.len(),
        });
        let content = asset
            .generate(&parents, &self.context)
            .map_err(|error| match error {
                GenerateError::Cancelled => ResolveError::Cancelled { kind: kind.clone() },
                error => ResolveError::Generation {
                    kind: kind.clone(),
                    error,
                },
            })?;

        let record =
            StateRecord::new(kind.clone(), content).map_err(|error| ResolveError::Persistence {
                kind: kind.clone(),
                error: StateStoreError::Serialization {
                    kind: kind.clone(),
                    error,
                },
            })?;
        {
            let _guard = lock(&self.persist);
            self.store
                .save(&record)
                .map_err(|error| ResolveError::Persistence {
                    kind: kind.clone(),
                    error,
                })?;
        }

        self.emit(ResolveEvent::Generated {
            kind: kind.clone(),
            hash: record.hash().clone(),
            file_count: record.content().files().len(),
        });
        Ok((Arc::new(record.into_content()), Origin::Generated))
    }

    /// Resolve independent kinds, concurrently when enabled.
    ///
    /// Outcomes line up with `kinds`.
    fn fetch_many(
        &self,
        kinds: &[AssetKind],
        path: &[AssetKind],
    ) -> Vec<Result<Arc<AssetContent>, ResolveError>> {
        if !self.parallel || kinds.len() < 2 {
            return kinds
                .iter()
                .map(|kind| self.fetch_on_path(kind, path))
                .collect();
        }

        std::thread::scope(|scope| {
            let handles: Vec<_> = kinds
                .iter()
                .map(|kind| scope.spawn(move || self.fetch_on_path(kind, path)))
                .collect();
            handles
                .into_iter()
                .zip(kinds)
                .map(|(handle, kind)| {
                    handle.join().unwrap_or_else(|_| {
                        Err(ResolveError::PreviouslyFailed {
                            kind: kind.clone(),
                            failure: Arc::new(RecordedFailure::panicked(kind)),
                        })
                    })
                })
                .collect()
        })
    }
}
