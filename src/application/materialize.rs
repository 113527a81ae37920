//! Target Materializer
//!
//! Writes a generated asset's files under an output directory. Each file is
//! written atomically with its declared permissions; repeating a write with
//! unchanged content leaves the directory byte-identical.

use std::path::{Component, Path, PathBuf};

use thiserror::Error;

use crate::domain::entities::AssetContent;
use crate::domain::ports::{FileSystem, FsError, ResolveEvent};
use crate::domain::value_objects::AssetKind;
use crate::infrastructure::LocalFs;

use super::session::Session;

/// Materialization failures
#[derive(Error, Debug)]
pub enum MaterializeError {
    #[error("asset '{kind}' has not been generated in this session")]
    NotGenerated { kind: AssetKind },

    #[error("asset '{kind}' declares file path '{}' outside the output directory", path.display())]
    PathEscape { kind: AssetKind, path: PathBuf },

    #[error("failed to write files of '{kind}': {error}")]
    Fs { kind: AssetKind, error: FsError },
}

/// Join a declared relative path onto `root`, rejecting anything that could
/// land outside it.
pub(crate) fn output_path(root: &Path, relative: &Path) -> Option<PathBuf> {
    let mut joined = root.to_path_buf();
    let mut depth = 0usize;
    for component in relative.components() {
        match component {
            Component::Normal(part) => {
                joined.push(part);
                depth += 1;
            }
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    (depth > 0).then_some(joined)
}

/// Writes generated files into an output directory
pub struct Materializer<FS: FileSystem = LocalFs> {
    output_dir: PathBuf,
    fs: FS,
}

impl Materializer<LocalFs> {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self::with_fs(output_dir, LocalFs::new())
    }
}

impl<FS: FileSystem> Materializer<FS> {
    pub fn with_fs(output_dir: impl Into<PathBuf>, fs: FS) -> Self {
        Self {
            output_dir: output_dir.into(),
            fs,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write the files of a kind generated (or loaded) in `session`
    pub fn write(
        &self,
        session: &Session,
        kind: &AssetKind,
    ) -> Result<Vec<PathBuf>, MaterializeError> {
        let content = session
            .get(kind)
            .ok_or_else(|| MaterializeError::NotGenerated { kind: kind.clone() })?;
        let written = self.write_content(kind, &content)?;
        for path in &written {
            session.emit(ResolveEvent::Materialized {
                kind: kind.clone(),
                path: path.clone(),
            });
        }
        Ok(written)
    }

    /// Write already-resolved content. Paths are checked before anything is written.
    pub fn write_content(
        &self,
        kind: &AssetKind,
        content: &AssetContent,
    ) -> Result<Vec<PathBuf>, MaterializeError> {
        let targets = content
            .files()
            .iter()
            .map(|file| {
                output_path(&self.output_dir, file.path())
                    .map(|path| (path, file))
                    .ok_or_else(|| MaterializeError::PathEscape {
                        kind: kind.clone(),
                        path: file.path().to_path_buf(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut written = Vec::with_capacity(targets.len());
        for (path, file) in targets {
            self.fs
                .write_atomic(&path, file.contents(), file.mode())
                .map_err(|error| MaterializeError::Fs {
                    kind: kind.clone(),
                    error,
                })?;
            tracing::debug!(kind = %kind, path = %path.display(), "wrote file");
            written.push(path);
        }
        Ok(written)
    }
}
