//! State Use Case
//!
//! Inspects and resets the state directory of an install directory. Clearing
//! is the supported way to force regeneration after inputs change.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::ports::{StateStore, StateStoreError};
use crate::domain::value_objects::{AssetKind, ContentHash};
use crate::error::{ForgeError, ForgeResult};
use crate::infrastructure::{FsStateStore, StateDirLock};

use super::install::InstallOptions;

/// One stored record as seen by `state list`
#[derive(Debug, Clone, Serialize)]
pub struct StateEntry {
    pub kind: AssetKind,
    #[serde(flatten)]
    pub status: EntryStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EntryStatus {
    Intact {
        hash: ContentHash,
        generated_at: DateTime<Utc>,
        files: usize,
    },
    /// Present on disk but will be ignored (and regenerated) on the next run
    Unusable { reason: String },
}

/// List and clear stored records
pub struct StateUseCase<S: StateStore = FsStateStore> {
    store: S,
}

impl StateUseCase<FsStateStore> {
    /// Operate on the filesystem store described by `options`
    pub fn for_install(options: &InstallOptions) -> Self {
        Self::new(FsStateStore::new(options.records_dir()))
    }
}

impl<S: StateStore> StateUseCase<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn list(&self) -> ForgeResult<Vec<StateEntry>> {
        let mut entries = Vec::new();
        for kind in self.store.kinds()? {
            let status = match self.store.load(&kind) {
                Ok(Some(record)) => EntryStatus::Intact {
                    hash: record.hash().clone(),
                    generated_at: record.generated_at(),
                    files: record.content().files().len(),
                },
                Ok(None) => continue,
                Err(err @ StateStoreError::VersionMismatch { .. }) => EntryStatus::Unusable {
                    reason: err.to_string(),
                },
                Err(err) if err.is_corruption() => EntryStatus::Unusable {
                    reason: err.to_string(),
                },
                Err(err) => return Err(ForgeError::StateStore(err)),
            };
            entries.push(StateEntry { kind, status });
        }
        Ok(entries)
    }

    /// Remove every record, returning how many there were
    pub fn clear(&self) -> ForgeResult<usize> {
        let count = self.store.kinds()?.len();
        self.store.clear()?;
        tracing::info!(records = count, "cleared state");
        Ok(count)
    }
}

/// Clear the filesystem state of an install directory under its lock
pub fn clear_install_state(options: &InstallOptions) -> ForgeResult<usize> {
    let state_root = options.state_root();
    let _lock = StateDirLock::acquire(&state_root).map_err(|error| ForgeError::Locked {
        path: state_root.clone(),
        error,
    })?;
    StateUseCase::for_install(options).clear()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{AssetContent, StateRecord};
    use crate::infrastructure::MemoryStateStore;

    fn k(s: &'static str) -> AssetKind {
        AssetKind::from_static(s)
    }

    fn seeded() -> MemoryStateStore {
        let store = MemoryStateStore::new();
        let record = StateRecord::new(k("metadata"), AssetContent::from_data(&1).unwrap()).unwrap();
        store.save(&record).unwrap();
        store.put_raw(k("manifests"), b"garbage".to_vec());
        store
    }

    #[test]
    fn list_reports_intact_and_unusable_records() {
        let use_case = StateUseCase::new(seeded());

        let entries = use_case.list().unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].kind, k("manifests"));
        assert!(matches!(entries[0].status, EntryStatus::Unusable { .. }));
        assert!(matches!(entries[1].status, EntryStatus::Intact { files: 0, .. }));
    }

    #[test]
    fn clear_removes_everything() {
        let use_case = StateUseCase::new(seeded());

        assert_eq!(use_case.clear().unwrap(), 2);
        assert!(use_case.list().unwrap().is_empty());
    }

    #[test]
    fn entry_serializes_with_status_tag() {
        let entry = StateEntry {
            kind: k("bootstrap-token"),
            status: EntryStatus::Unusable {
                reason: "bad".into(),
            },
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["status"], "unusable");
        assert_eq!(json["kind"], "bootstrap-token");
    }

    #[test]
    fn clear_install_state_on_fresh_dir() {
        let dir = tempfile::tempdir().unwrap();
        let options = InstallOptions::new(dir.path());
        assert_eq!(clear_install_state(&options).unwrap(), 0);
    }
}
