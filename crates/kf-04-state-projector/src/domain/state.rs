//! # User State
//!
//! Everything known about one user, rebuilt from that user's log.

use std::collections::{BTreeMap, VecDeque};

use kf_05_key_material::KeyMaterial;
use shared_types::{AccountId, FolderId, Timestamp, ROOT_FOLDER_NAME};

use super::entities::{Account, AuditEntry, Folder, U2fToken, User};

/// Audit entries kept; older ones are evicted.
pub const AUDIT_LOG_CAPACITY: usize = 30;

/// Projected state of one user.
///
/// Starts with only the root folder. Apply events through
/// [`Projector::apply`](kf_03_event_log::Projector::apply).
#[derive(Debug, Clone, PartialEq)]
pub struct UserState {
    pub(crate) user: Option<User>,
    pub(crate) folders: BTreeMap<FolderId, Folder>,
    pub(crate) accounts: BTreeMap<AccountId, Account>,
    pub(crate) u2f_tokens: Vec<U2fToken>,
    /// Newest first.
    pub(crate) audit_log: VecDeque<AuditEntry>,
    pub(crate) key_material: Option<KeyMaterial>,
}

impl Default for UserState {
    fn default() -> Self {
        let root = Folder {
            id: FolderId::root(),
            parent_id: None,
            name: ROOT_FOLDER_NAME.to_string(),
        };

        Self {
            user: None,
            folders: BTreeMap::from([(root.id.clone(), root)]),
            accounts: BTreeMap::new(),
            u2f_tokens: Vec::new(),
            audit_log: VecDeque::with_capacity(AUDIT_LOG_CAPACITY),
            key_material: None,
        }
    }
}

impl UserState {
    /// Empty state: no user, only the root folder.
    pub fn new() -> Self {
        Self::default()
    }

    /// The user's key material, once a `MasterPasswordChanged` was applied.
    pub fn key_material(&self) -> Option<&KeyMaterial> {
        self.key_material.as_ref()
    }

    /// Mutable key material, for unlocking and sealing. The lock state is
    /// never logged.
    pub fn key_material_mut(&mut self) -> Option<&mut KeyMaterial> {
        self.key_material.as_mut()
    }

    /// Key for short export MACs, derived from the sealed private key.
    pub fn mac_key(&self) -> Option<[u8; 32]> {
        self.key_material.as_ref().map(|km| km.sealed().mac_key())
    }

    pub(crate) fn audit(&mut self, timestamp: Timestamp, message: String) {
        self.audit_log.push_front(AuditEntry { timestamp, message });
        self.audit_log.truncate(AUDIT_LOG_CAPACITY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn test_new_state_has_only_root() {
        let state = UserState::new();

        assert_eq!(state.folders.len(), 1);
        let root = &state.folders[&FolderId::root()];
        assert_eq!(root.name, "root");
        assert!(root.parent_id.is_none());
        assert!(state.user.is_none());
        assert!(state.mac_key().is_none());
    }

    #[test]
    fn test_audit_log_is_bounded_newest_first() {
        let mut state = UserState::new();
        let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();

        for i in 0..(AUDIT_LOG_CAPACITY + 5) {
            state.audit(start + Duration::seconds(i as i64), format!("entry {i}"));
        }

        assert_eq!(state.audit_log.len(), AUDIT_LOG_CAPACITY);
        assert_eq!(state.audit_log[0].message, "entry 34");
        assert_eq!(state.audit_log[AUDIT_LOG_CAPACITY - 1].message, "entry 5");
    }
}
