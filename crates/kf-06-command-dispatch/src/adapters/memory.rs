//! In-memory [`LogProvider`] for tests.

use std::collections::BTreeMap;

use kf_03_event_log::{InMemoryLogStore, LogStoreError};
use shared_types::UserId;

use crate::ports::LogProvider;

/// Hands out [`InMemoryLogStore`]s, pre-loaded with seeded content.
///
/// Every `open` returns a fresh copy of the seed; nothing written to a store
/// comes back on the next `open`.
#[derive(Debug, Default, Clone)]
pub struct MemoryLogProvider {
    seeded: BTreeMap<UserId, String>,
    reject_appends: bool,
}

impl MemoryLogProvider {
    /// Provider without users.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user whose log starts with `contents`.
    pub fn with_user(mut self, user: impl Into<UserId>, contents: impl Into<String>) -> Self {
        self.seeded.insert(user.into(), contents.into());
        self
    }

    /// Make every store refuse appends.
    pub fn rejecting_appends(mut self) -> Self {
        self.reject_appends = true;
        self
    }
}

impl LogProvider for MemoryLogProvider {
    type Store = InMemoryLogStore;

    fn existing_users(&self) -> Result<Vec<UserId>, LogStoreError> {
        Ok(self.seeded.keys().cloned().collect())
    }

    fn open(&self, user: &UserId) -> Result<InMemoryLogStore, LogStoreError> {
        let mut store = self
            .seeded
            .get(user)
            .map(|contents| InMemoryLogStore::with_contents(contents.as_str()))
            .unwrap_or_default();
        store.set_reject_appends(self.reject_appends);
        Ok(store)
    }
}
