//! # Data Directory Locking
//!
//! Prevents two vault processes from appending to the same user logs.
//!
//! Uses `fs2` for cross-platform file locking (flock on Unix, LockFile on
//! Windows). The lock is released on drop.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use thiserror::Error;

/// Errors from data directory locking.
#[derive(Debug, Error)]
pub enum LockError {
    /// Lock file could not be created.
    #[error("failed to create lock file: {0}")]
    CreateFailed(#[source] io::Error),

    /// Another process holds the lock.
    #[error(
        "data directory already in use{}: {}",
        .pid.map(|p| format!(" by process {p}")).unwrap_or_default(),
        .path.display()
    )]
    AlreadyLocked {
        /// PID recorded by the holder, if readable.
        pid: Option<u32>,
        /// Lock file.
        path: PathBuf,
    },

    /// Failed to record our PID.
    #[error("failed to write PID to lock file: {0}")]
    WriteFailed(#[source] io::Error),
}

/// Exclusive lock on a data directory.
///
/// ```ignore
/// let lock = DataDirLock::acquire(Path::new("./data"))?;
/// // held until `lock` is dropped
/// ```
pub struct DataDirLock {
    file: File,
    path: PathBuf,
    pid: u32,
}

impl DataDirLock {
    /// Lock file name inside the data directory.
    pub const LOCK_FILE: &'static str = "LOCK";

    /// Acquire the lock without blocking.
    ///
    /// # Errors
    ///
    /// Returns [`LockError::AlreadyLocked`] if another process holds it.
    pub fn acquire(data_dir: &Path) -> Result<Self, LockError> {
        let path = data_dir.join(Self::LOCK_FILE);

        // not truncated before locking: the holder's PID stays readable
        let mut file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&path)
            .map_err(LockError::CreateFailed)?;

        if file.try_lock_exclusive().is_err() {
            return Err(LockError::AlreadyLocked {
                pid: Self::read_existing_pid(&path),
                path,
            });
        }

        let pid = std::process::id();
        file.set_len(0).map_err(LockError::WriteFailed)?;
        writeln!(file, "{pid}").map_err(LockError::WriteFailed)?;
        file.sync_all().map_err(LockError::WriteFailed)?;

        tracing::info!(path = %path.display(), pid, "[kf-03] data directory locked");

        Ok(Self { file, path, pid })
    }

    /// PID of the holder (this process).
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Lock file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_existing_pid(path: &Path) -> Option<u32> {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|s| s.trim().parse().ok())
    }
}

impl Drop for DataDirLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
        let _ = std::fs::remove_file(&self.path);
    }
}
