//! Per-user log files in one data directory.

use std::fs;
use std::path::{Path, PathBuf};

use kf_03_event_log::{FileLogStore, LogStoreError};
use shared_types::UserId;
use tracing::debug;

use crate::ports::LogProvider;

/// Extension of user log files.
pub const LOG_EXTENSION: &str = "log";

/// [`LogProvider`] keeping `<data_dir>/<user-id>.log` files.
#[derive(Debug, Clone)]
pub struct DirectoryLogProvider {
    dir: PathBuf,
}

impl DirectoryLogProvider {
    /// Provider over `dir`, created if missing.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, LogStoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// The data directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Log file of `user`.
    pub fn path_of(&self, user: &UserId) -> PathBuf {
        self.dir.join(format!("{user}.{LOG_EXTENSION}"))
    }
}

impl LogProvider for DirectoryLogProvider {
    type Store = FileLogStore;

    fn existing_users(&self) -> Result<Vec<UserId>, LogStoreError> {
        let mut users = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(LOG_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                users.push(UserId::new(stem));
            }
        }
        users.sort();

        debug!(dir = %self.dir.display(), users = users.len(), "[kf-06] scanned data directory");
        Ok(users)
    }

    fn open(&self, user: &UserId) -> Result<FileLogStore, LogStoreError> {
        FileLogStore::open(self.path_of(user))
    }
}
