//! # File Log Store
//!
//! One append-only UTF-8 file per user. Each batch is a single `write_all`
//! followed by `sync_data`; if either fails the file is truncated back to
//! its length before the batch.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, error};

use crate::domain::LogStoreError;
use crate::ports::LogStore;

/// File-backed [`LogStore`].
pub struct FileLogStore {
    file: File,
    path: PathBuf,
    /// Length of the durable content.
    len: u64,
}

impl FileLogStore {
    /// Open (or create) the log file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LogStoreError> {
        let path = path.as_ref().to_path_buf();

        let file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&path)?;
        let len = file.metadata()?.len();

        debug!(path = %path.display(), bytes = len, "[kf-03] opened log file");

        Ok(Self { file, path, len })
    }

    /// Location of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bytes of durable content.
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Whether nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn write_durably(&mut self, data: &[u8]) -> io::Result<()> {
        self.file.write_all(data)?;
        self.file.sync_data()
    }
}

impl LogStore for FileLogStore {
    fn read_all(&mut self) -> Result<String, LogStoreError> {
        self.file.seek(SeekFrom::Start(0))?;

        let mut raw = Vec::with_capacity(self.len as usize);
        self.file.read_to_end(&mut raw)?;

        String::from_utf8(raw).map_err(|_| LogStoreError::InvalidUtf8)
    }

    fn append(&mut self, data: &[u8]) -> Result<(), LogStoreError> {
        if let Err(e) = self.write_durably(data) {
            error!(
                path = %self.path.display(),
                error = %e,
                "[kf-03] append failed, rolling back"
            );

            if let Err(rollback) = self.file.set_len(self.len) {
                error!(
                    path = %self.path.display(),
                    error = %rollback,
                    "[kf-03] rollback truncate failed"
                );
            }

            return Err(e.into());
        }

        self.len += data.len() as u64;
        Ok(())
    }
}
