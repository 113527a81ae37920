//! Purge Policy
//!
//! Transient assets (credentials, one-shot tokens) must not outlive their
//! consumers. Once every dependent of a transient asset has been resolved in
//! the session, the asset is dropped from memory, from the state store, and
//! from the output directory if it was ever materialized there.
//!
//! Purging is cleanup: failures are reported, never fatal.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;

use crate::domain::entities::{AssetContent, AssetState};
use crate::domain::ports::{FileSystem, ResolveEvent};
use crate::domain::value_objects::AssetKind;
use crate::infrastructure::LocalFs;

use super::materialize::output_path;
use super::session::Session;

/// A cleanup step that did not succeed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurgeFailure {
    pub kind: AssetKind,
    pub message: String,
}

/// Outcome of a purge pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PurgeReport {
    pub purged: Vec<AssetKind>,
    pub failures: Vec<PurgeFailure>,
}

impl PurgeReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Applies the purge policy to a session
pub struct Purger<FS: FileSystem = LocalFs> {
    output_dir: Option<PathBuf>,
    fs: FS,
}

impl Purger<LocalFs> {
    /// Purge memory and state store only
    pub fn new() -> Self {
        Self {
            output_dir: None,
            fs: LocalFs::new(),
        }
    }
}

impl Default for Purger<LocalFs> {
    fn default() -> Self {
        Self::new()
    }
}

impl<FS: FileSystem> Purger<FS> {
    pub fn with_fs(output_dir: Option<PathBuf>, fs: FS) -> Self {
        Self { output_dir, fs }
    }

    /// Also delete materialized files of purged assets under `dir`
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Transient kinds that are ready to go: resolved here, not a root,
    /// with at least one dependent and every dependent resolved.
    pub fn consumed(&self, session: &Session, roots: &[AssetKind]) -> Vec<AssetKind> {
        let registry = session.registry();
        let graph = registry.graph();
        graph
            .topological_order()
            .iter()
            .filter(|kind| registry.is_transient(kind))
            .filter(|kind| !roots.contains(kind))
            .filter(|kind| session.state(kind) == AssetState::Generated)
            .filter(|kind| {
                let mut dependents = graph.dependents(kind).peekable();
                dependents.peek().is_some()
                    && dependents.all(|d| session.state(d) == AssetState::Generated)
            })
            .cloned()
            .collect()
    }

    /// Purge every consumed transient asset
    pub fn purge_consumed(&self, session: &Session, roots: &[AssetKind]) -> PurgeReport {
        let mut report = PurgeReport::default();
        for kind in self.consumed(session, roots) {
            self.purge_into(session, &kind, &mut report);
        }
        report
    }

    /// Purge one kind unconditionally. Purging an absent kind is a no-op.
    pub fn purge(&self, session: &Session, kind: &AssetKind) -> PurgeReport {
        let mut report = PurgeReport::default();
        self.purge_into(session, kind, &mut report);
        report
    }

    fn purge_into(&self, session: &Session, kind: &AssetKind, report: &mut PurgeReport) {
        let mut failures = Vec::new();

        let content: Option<Arc<AssetContent>> = match session.evict(kind) {
            Some(content) => Some(content),
            None => match session.store().load(kind) {
                Ok(record) => record.map(|r| Arc::new(r.into_content())),
                Err(err) => {
                    failures.push(format!("state store: {err}"));
                    None
                }
            },
        };

        if let Err(err) = session.store().purge(kind) {
            failures.push(format!("state store: {err}"));
        }

        if let (Some(dir), Some(content)) = (&self.output_dir, &content) {
            for file in content.files() {
                let Some(path) = output_path(dir, file.path()) else {
                    continue;
                };
                if !self.fs.exists(&path) {
                    continue;
                }
                if let Err(err) = self.fs.remove(&path) {
                    failures.push(err.to_string());
                }
            }
        }

        if failures.is_empty() {
            tracing::info!(kind = %kind, "purged transient asset");
            session.emit(ResolveEvent::Purged { kind: kind.clone() });
            report.purged.push(kind.clone());
        } else {
            let message = failures.join("; ");
            tracing::warn!(kind = %kind, error = %message, "purge incomplete");
            session.emit(ResolveEvent::PurgeFailed {
                kind: kind.clone(),
                error: message.clone(),
            });
            report.failures.push(PurgeFailure {
                kind: kind.clone(),
                message,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{AssetRegistry, Materializer};
    use crate::domain::entities::{AssetFile, Parents};
    use crate::domain::ports::{Asset, GenerateContext, StateStore};
    use crate::error::GenerateError;
    use crate::infrastructure::MemoryStateStore;
    use tempfile::tempdir;

    fn k(s: &'static str) -> AssetKind {
        AssetKind::from_static(s)
    }

    struct Token;

    impl Asset for Token {
        fn kind(&self) -> AssetKind {
            k("token")
        }

        fn generate(&self, _: &Parents, _: &GenerateContext) -> Result<AssetContent, GenerateError> {
            Ok(AssetContent::from_data(&"s3cret")?
                .with_file(AssetFile::new("auth/token", "s3cret").with_mode(0o600)))
        }

        fn is_transient(&self) -> bool {
            true
        }
    }

    struct Consumer(&'static str);

    impl Asset for Consumer {
        fn kind(&self) -> AssetKind {
            k(self.0)
        }

        fn dependencies(&self) -> Vec<AssetKind> {
            vec![k("token")]
        }

        fn generate(&self, parents: &Parents, _: &GenerateContext) -> Result<AssetContent, GenerateError> {
            let token: String = parents.data_as(&k("token"))?;
            Ok(AssetContent::from_data(&token.len())?)
        }
    }

    fn session() -> (Session, Arc<MemoryStateStore>) {
        let registry = AssetRegistry::builder()
            .register(Token)
            .register(Consumer("one"))
            .register(Consumer("two"))
            .build()
            .unwrap();
        let store = Arc::new(MemoryStateStore::new());
        (Session::new(Arc::new(registry), store.clone()), store)
    }

    #[test]
    fn purges_once_every_dependent_is_resolved() {
        let (session, store) = session();
        session.fetch(&k("one")).unwrap();

        let partial = Purger::new().purge_consumed(&session, &[k("one")]);
        assert!(partial.purged.is_empty());
        assert!(store.contains(&k("token")));

        session.fetch(&k("two")).unwrap();
        let report = Purger::new().purge_consumed(&session, &[k("one"), k("two")]);

        assert_eq!(report.purged, vec![k("token")]);
        assert!(report.is_clean());
        assert_eq!(session.state(&k("token")), AssetState::Purged);
        assert!(session.get(&k("token")).is_none());
        assert!(!store.contains(&k("token")));
    }

    #[test]
    fn requested_root_is_never_purged() {
        let (session, _) = session();
        session.fetch_all(&[k("token"), k("one"), k("two")]).unwrap();

        let report = Purger::new().purge_consumed(&session, &[k("token"), k("one"), k("two")]);

        assert!(report.purged.is_empty());
        assert_eq!(session.state(&k("token")), AssetState::Generated);
    }

    #[test]
    fn purge_is_idempotent() {
        let (session, _) = session();
        session.fetch_all(&[k("one"), k("two")]).unwrap();
        let purger = Purger::new();

        let first = purger.purge_consumed(&session, &[k("one"), k("two")]);
        let second = purger.purge_consumed(&session, &[k("one"), k("two")]);
        let explicit = purger.purge(&session, &k("token"));

        assert_eq!(first.purged.len(), 1);
        assert!(second.purged.is_empty());
        assert!(explicit.is_clean());
    }

    #[test]
    fn purge_removes_materialized_files() {
        let dir = tempdir().unwrap();
        let (session, _) = session();
        session.fetch(&k("token")).unwrap();
        Materializer::new(dir.path()).write(&session, &k("token")).unwrap();
        session.fetch_all(&[k("one"), k("two")]).unwrap();
        assert!(dir.path().join("auth/token").exists());

        let report = Purger::new()
            .with_output_dir(dir.path())
            .purge_consumed(&session, &[k("one"), k("two")]);

        assert_eq!(report.purged, vec![k("token")]);
        assert!(!dir.path().join("auth/token").exists());
    }

    #[test]
    fn unreadable_record_is_reported_not_skipped() {
        let (session, store) = session();
        store.put_raw(k("token"), b"{ not a record".to_vec());

        let report = Purger::new().purge(&session, &k("token"));

        assert!(report.purged.is_empty());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].kind, k("token"));
        assert!(report.failures[0].message.starts_with("state store: "));
    }

    #[test]
    fn refetch_after_purge_generates_again() {
        let (session, store) = session();
        session.fetch_all(&[k("one"), k("two")]).unwrap();
        Purger::new().purge_consumed(&session, &[k("one"), k("two")]);
        let saves = store.save_count();

        session.fetch(&k("token")).unwrap();

        assert_eq!(store.save_count(), saves + 1);
        assert!(store.load(&k("token")).unwrap().is_some());
    }
}
