//! Filesystem State Store
//!
//! Implements the StateStore port as one pretty-printed JSON file per asset
//! kind: `<root>/<kind>.json`. Records are replaced by atomic rename, so a
//! reader sees either the previous record or the new one.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::entities::{StateRecord, RECORD_FORMAT_VERSION};
use crate::domain::ports::file_system::FileSystem;
use crate::domain::ports::state_store::{StateStore, StateStoreError, StateStoreResult};
use crate::domain::value_objects::AssetKind;
use crate::infrastructure::fs::LocalFs;

const RECORD_EXTENSION: &str = "json";

/// Records may hold one-time secrets
const RECORD_MODE: u32 = 0o600;

/// JSON file per kind under a state directory
#[derive(Debug, Clone)]
pub struct FsStateStore {
    root: PathBuf,
    fs: LocalFs,
}

/// Just enough of a record to tell format versions apart
#[derive(Deserialize)]
struct VersionHeader {
    version: u32,
}

impl FsStateStore {
    /// Store rooted at `root` (created lazily on first save)
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            fs: LocalFs::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the record file for `kind`
    pub fn record_path(&self, kind: &AssetKind) -> PathBuf {
        self.root.join(format!("{kind}.{RECORD_EXTENSION}"))
    }

    fn parse(&self, kind: &AssetKind, bytes: &[u8]) -> StateStoreResult<StateRecord> {
        let record: StateRecord = match serde_json::from_slice(bytes) {
            Ok(record) => record,
            Err(parse_err) => {
                if let Ok(header) = serde_json::from_slice::<VersionHeader>(bytes) {
                    if header.version != RECORD_FORMAT_VERSION {
                        return Err(StateStoreError::VersionMismatch {
                            kind: kind.clone(),
                            found: header.version,
                            expected: RECORD_FORMAT_VERSION,
                        });
                    }
                }
                return Err(StateStoreError::Corrupt {
                    kind: kind.clone(),
                    message: parse_err.to_string(),
                });
            }
        };

        if record.version() != RECORD_FORMAT_VERSION {
            return Err(StateStoreError::VersionMismatch {
                kind: kind.clone(),
                found: record.version(),
                expected: RECORD_FORMAT_VERSION,
            });
        }
        if record.kind() != kind {
            return Err(StateStoreError::Corrupt {
                kind: kind.clone(),
                message: format!("record belongs to '{}'", record.kind()),
            });
        }
        if !record.verify() {
            return Err(StateStoreError::Corrupt {
                kind: kind.clone(),
                message: format!("content does not match stored hash {}", record.hash()),
            });
        }
        Ok(record)
    }
}

impl StateStore for FsStateStore {
    fn load(&self, kind: &AssetKind) -> StateStoreResult<Option<StateRecord>> {
        let path = self.record_path(kind);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(StateStoreError::Io { path, error }),
        };
        self.parse(kind, &bytes).map(Some)
    }

    fn save(&self, record: &StateRecord) -> StateStoreResult<()> {
        let bytes =
            serde_json::to_vec_pretty(record).map_err(|error| StateStoreError::Serialization {
                kind: record.kind().clone(),
                error,
            })?;
        let path = self.record_path(record.kind());
        self.fs.write_atomic(&path, &bytes, Some(RECORD_MODE))?;
        tracing::debug!(kind = %record.kind(), path = %path.display(), "state record saved");
        Ok(())
    }

    fn purge(&self, kind: &AssetKind) -> StateStoreResult<()> {
        let path = self.record_path(kind);
        match std::fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(kind = %kind, "state record purged");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(StateStoreError::Io { path, error }),
        }
    }

    fn kinds(&self) -> StateStoreResult<Vec<AssetKind>> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => {
                return Err(StateStoreError::Io {
                    path: self.root.clone(),
                    error,
                })
            }
        };

        let mut kinds = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|error| StateStoreError::Io {
                path: self.root.clone(),
                error,
            })?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if let Ok(kind) = AssetKind::new(stem) {
                kinds.push(kind);
            }
        }
        kinds.sort();
        Ok(kinds)
    }
}
