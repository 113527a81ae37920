//! FileSystem port - abstraction over output directory I/O
//!
//! The materializer and purge policy write and remove files through this
//! trait so tests can observe or fake the disk.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type for file system operations
pub type FsResult<T> = Result<T, FsError>;

/// File system operation errors
#[derive(Error, Debug)]
pub enum FsError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    #[error("I/O error on {}: {error}", path.display())]
    Io {
        path: PathBuf,
        error: std::io::Error,
    },
}

impl FsError {
    /// Attach the path an I/O error happened on
    pub fn at(path: &Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => FsError::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => FsError::PermissionDenied(path.to_path_buf()),
            _ => FsError::Io {
                path: path.to_path_buf(),
                error: err,
            },
        }
    }
}

/// Abstract file system interface
pub trait FileSystem: Send + Sync {
    /// Read raw bytes
    fn read(&self, path: &Path) -> FsResult<Vec<u8>>;

    /// Write bytes atomically (temp file + rename), creating parents.
    /// `mode` is applied before the file becomes visible.
    fn write_atomic(&self, path: &Path, contents: &[u8], mode: Option<u32>) -> FsResult<()>;

    fn exists(&self, path: &Path) -> bool;

    /// Remove a file
    fn remove(&self, path: &Path) -> FsResult<()>;

    /// Create directory and parents
    fn create_dir_all(&self, path: &Path) -> FsResult<()>;

    /// Unix permission bits, if the platform has them
    fn mode(&self, path: &Path) -> FsResult<Option<u32>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_error_keeps_path() {
        let err = FsError::at(
            Path::new("out/a.txt"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, FsError::NotFound(_)));
        assert!(err.to_string().contains("out/a.txt"));
    }
}
