//! Advisory lock on a state directory
//!
//! Two installer processes sharing one directory is unsupported; the lock
//! turns that mistake into an immediate error instead of interleaved writes.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use fs2::FileExt;

const LOCK_FILE: &str = "lock";

/// Exclusive lock held for the guard's lifetime
#[derive(Debug)]
pub struct StateDirLock {
    file: File,
    path: PathBuf,
}

impl StateDirLock {
    /// Take the lock without blocking
    pub fn acquire(dir: &Path) -> std::io::Result<Self> {
        fs::create_dir_all(dir)?;
        let path = dir.join(LOCK_FILE);
        let file = File::create(&path)?;
        file.try_lock_exclusive()?;
        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StateDirLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}
