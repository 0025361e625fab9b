// Copyright (c) Contributors to the forge project.
// SPDX-License-Identifier: Apache-2.0
//! The single root-wide exclusive lock (spec.md §4.10/§5 "Outer locking"):
//! every write-path command holds this for its whole duration; read-only
//! commands never acquire it.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::error::{Error, Result};

/// An acquired exclusive lock on a root directory's `.lock` file. Released
/// when dropped — `fs2`'s advisory lock is tied to the file descriptor, so
/// closing it (via `Drop`) is sufficient; there is no lock file to clean up
/// the way `pwinckles-rocfl`'s hash-named lock files are.
pub struct RootLock {
    _file: File,
    path: PathBuf,
}

impl RootLock {
    /// Blocks until the lock is acquired. `dir` must already exist.
    pub fn acquire(dir: &Path) -> Result<Self> {
        let path = dir.join(".lock");
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .open(&path)
            .map_err(|e| Error::LockFailed(path.clone(), e))?;
        file.lock_exclusive()
            .map_err(|e| Error::LockFailed(path.clone(), e))?;
        Ok(Self { _file: file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RootLock {
    fn drop(&mut self) {
        let _ = fs2::FileExt::unlock(&self._file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn second_acquire_on_same_thread_blocks_until_drop() {
        let dir = tempdir().unwrap();
        let lock = RootLock::acquire(dir.path()).unwrap();
        // fs2's exclusive lock is per-file-description, not per-process, so
        // reopening and try_locking from the same process still reports busy.
        let probe = OpenOptions::new()
            .write(true)
            .create(true)
            .open(dir.path().join(".lock"))
            .unwrap();
        assert!(probe.try_lock_exclusive().is_err());
        drop(lock);
        assert!(probe.try_lock_exclusive().is_ok());
    }
}
