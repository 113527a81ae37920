//! Local File System Implementation
//!
//! Implements the FileSystem port for local disk operations.

use std::io::Write;
use std::path::Path;

use crate::domain::ports::file_system::{FileSystem, FsError, FsResult};

/// Mode applied to materialized files that do not declare one
pub const DEFAULT_FILE_MODE: u32 = 0o644;

/// Local file system implementation
///
/// Writes go through a sibling temp file that is renamed into place, so a
/// crash never leaves a half-written file at the target path.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl LocalFs {
    /// Create a new LocalFs instance
    pub fn new() -> Self {
        Self
    }
}

#[cfg(unix)]
fn apply_mode(file: &std::fs::File, mode: u32) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(std::fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn apply_mode(_file: &std::fs::File, _mode: u32) -> std::io::Result<()> {
    Ok(())
}

impl FileSystem for LocalFs {
    fn read(&self, path: &Path) -> FsResult<Vec<u8>> {
        std::fs::read(path).map_err(|e| FsError::at(path, e))
    }

    fn write_atomic(&self, path: &Path, contents: &[u8], mode: Option<u32>) -> FsResult<()> {
        let parent = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent).map_err(|e| FsError::at(parent, e))?;

        let mut tmp = tempfile::Builder::new()
            .prefix(".tmp-")
            .tempfile_in(parent)
            .map_err(|e| FsError::at(parent, e))?;
        tmp.write_all(contents)
            .and_then(|_| apply_mode(tmp.as_file(), mode.unwrap_or(DEFAULT_FILE_MODE)))
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| FsError::at(tmp.path(), e))?;

        // Dropping `tmp` on any earlier error removes the temp file.
        tmp.persist(path).map_err(|e| FsError::at(path, e.error))?;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn remove(&self, path: &Path) -> FsResult<()> {
        std::fs::remove_file(path).map_err(|e| FsError::at(path, e))
    }

    fn create_dir_all(&self, path: &Path) -> FsResult<()> {
        std::fs::create_dir_all(path).map_err(|e| FsError::at(path, e))
    }

    #[cfg(unix)]
    fn mode(&self, path: &Path) -> FsResult<Option<u32>> {
        use std::os::unix::fs::PermissionsExt;
        let meta = std::fs::metadata(path).map_err(|e| FsError::at(path, e))?;
        Ok(Some(meta.permissions().mode() & 0o7777))
    }

    #[cfg(not(unix))]
    fn mode(&self, path: &Path) -> FsResult<Option<u32>> {
        std::fs::metadata(path).map_err(|e| FsError::at(path, e))?;
        Ok(None)
    }
}
