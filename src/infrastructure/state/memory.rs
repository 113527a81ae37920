//! In-memory State Store
//!
//! Keeps serialized records in a map so tests exercise the same
//! serialize/parse path as the filesystem store, and can inject failures.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::domain::entities::StateRecord;
use crate::domain::ports::state_store::{StateStore, StateStoreError, StateStoreResult};
use crate::domain::value_objects::AssetKind;

/// Map-backed state store
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    records: Mutex<BTreeMap<AssetKind, Vec<u8>>>,
    failing_saves: Mutex<BTreeSet<AssetKind>>,
    saves: AtomicUsize,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `save` for `kind` fail with an I/O error
    pub fn fail_saves_for(&self, kind: AssetKind) {
        lock(&self.failing_saves).insert(kind);
    }

    /// Overwrite the raw serialized bytes of a record
    pub fn put_raw(&self, kind: AssetKind, bytes: Vec<u8>) {
        lock(&self.records).insert(kind, bytes);
    }

    /// Number of successful saves so far
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn contains(&self, kind: &AssetKind) -> bool {
        lock(&self.records).contains_key(kind)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl StateStore for MemoryStateStore {
    fn load(&self, kind: &AssetKind) -> StateStoreResult<Option<StateRecord>> {
        let Some(bytes) = lock(&self.records).get(kind).cloned() else {
            return Ok(None);
        };
        let record: StateRecord =
            serde_json::from_slice(&bytes).map_err(|e| StateStoreError::Corrupt {
                kind: kind.clone(),
                message: e.to_string(),
            })?;
        if !record.verify() {
            return Err(StateStoreError::Corrupt {
                kind: kind.clone(),
                message: "content does not match stored hash".to_string(),
            });
        }
        Ok(Some(record))
    }

    fn save(&self, record: &StateRecord) -> StateStoreResult<()> {
        if lock(&self.failing_saves).contains(record.kind()) {
            return Err(StateStoreError::Io {
                path: format!("memory://{}", record.kind()).into(),
                error: std::io::Error::other("disk full"),
            });
        }
        let bytes = serde_json::to_vec(record).map_err(|error| StateStoreError::Serialization {
            kind: record.kind().clone(),
            error,
        })?;
        lock(&self.records).insert(record.kind().clone(), bytes);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn purge(&self, kind: &AssetKind) -> StateStoreResult<()> {
        lock(&self.records).remove(kind);
        Ok(())
    }

    fn kinds(&self) -> StateStoreResult<Vec<AssetKind>> {
        Ok(lock(&self.records).keys().cloned().collect())
    }
}
