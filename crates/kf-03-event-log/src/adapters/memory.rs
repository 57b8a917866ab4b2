//! In-memory [`LogStore`] for tests.

use crate::domain::LogStoreError;
use crate::ports::LogStore;

/// Log content held in a `String`.
///
/// `reject_appends` simulates a failing disk.
#[derive(Debug, Default, Clone)]
pub struct InMemoryLogStore {
    contents: String,
    reject_appends: bool,
    appends: usize,
}

impl InMemoryLogStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-loaded with existing log content.
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: contents.into(),
            ..Self::default()
        }
    }

    /// Make subsequent appends fail (or succeed again).
    pub fn set_reject_appends(&mut self, reject: bool) {
        self.reject_appends = reject;
    }

    /// Stored content.
    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// Number of successful appends.
    pub fn appends(&self) -> usize {
        self.appends
    }
}

impl LogStore for InMemoryLogStore {
    fn read_all(&mut self) -> Result<String, LogStoreError> {
        Ok(self.contents.clone())
    }

    fn append(&mut self, data: &[u8]) -> Result<(), LogStoreError> {
        if self.reject_appends {
            return Err(LogStoreError::Rejected);
        }

        let text = std::str::from_utf8(data).map_err(|_| LogStoreError::InvalidUtf8)?;
        self.contents.push_str(text);
        self.appends += 1;
        Ok(())
    }
}
