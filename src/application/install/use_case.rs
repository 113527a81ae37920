//! Install Use Case
//!
//! Orchestrates one invocation:
//! 1. Lock the state directory
//! 2. Resolve the target's roots (stored records are adopted, the rest generated)
//! 3. Materialize every root into the install directory
//! 4. Purge transient assets whose dependents are all resolved
//!
//! Resolution failures abort before anything is written. Purge failures are
//! reported in the result.

use std::sync::Arc;

use crate::application::{AssetRegistry, Materializer, Purger, Session};
use crate::domain::entities::Origin;
use crate::domain::ports::{GenerateContext, NoopEventSink, ResolveEventSink, StateStore};
use crate::error::{ForgeError, ForgeResult};
use crate::infrastructure::{FsStateStore, StateDirLock};

use super::options::{InstallOptions, InstallTarget};
use super::result::InstallResult;

/// Install use case - resolves, writes and cleans up one target
pub struct InstallUseCase {
    registry: Arc<AssetRegistry>,
    events: Arc<dyn ResolveEventSink>,
}

impl InstallUseCase {
    pub fn new(registry: Arc<AssetRegistry>) -> Self {
        Self {
            registry,
            events: Arc::new(NoopEventSink),
        }
    }

    pub fn with_events(mut self, events: Arc<dyn ResolveEventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn registry(&self) -> &Arc<AssetRegistry> {
        &self.registry
    }

    /// Execute against the filesystem state store in `options.dir`
    pub fn execute(
        &self,
        target: &InstallTarget,
        options: &InstallOptions,
    ) -> ForgeResult<InstallResult> {
        let state_root = options.state_root();
        let _lock = StateDirLock::acquire(&state_root).map_err(|error| ForgeError::Locked {
            path: state_root.clone(),
            error,
        })?;

        let store: Arc<dyn StateStore> = Arc::new(FsStateStore::new(options.records_dir()));
        self.execute_with_store(target, options, store)
    }

    /// Execute against any state store. The caller is responsible for locking.
    pub fn execute_with_store(
        &self,
        target: &InstallTarget,
        options: &InstallOptions,
        store: Arc<dyn StateStore>,
    ) -> ForgeResult<InstallResult> {
        let context =
            GenerateContext::new(&options.dir).with_cancellation(options.cancellation.clone());
        let session = Session::new(self.registry.clone(), store)
            .with_events(self.events.clone())
            .with_context(context)
            .with_parallel(options.parallel);

        tracing::info!(name = %target.name, roots = target.roots.len(), "resolving target");
        session.fetch_all(&target.roots)?;

        let mut result = InstallResult::new(&target.name);
        for (kind, origin) in session.resolved() {
            match origin {
                Origin::Generated => result.generated.push(kind),
                Origin::Loaded => result.loaded.push(kind),
            }
        }

        let materializer = Materializer::new(&options.dir);
        for root in &target.roots {
            result.written.extend(materializer.write(&session, root)?);
        }

        if options.purge_transient {
            let report = Purger::new()
                .with_output_dir(&options.dir)
                .purge_consumed(&session, &target.roots);
            result.purged = report.purged;
            result.purge_failures = report.failures;
        }

        tracing::info!(
            name = %target.name,
            generated = result.generated.len(),
            loaded = result.loaded.len(),
            written = result.written.len(),
            "target complete"
        );
        Ok(result)
    }
}
