//! # User Storage
//!
//! One user's event log and projected state behind one mutex. Every command
//! for the user holds it from invoke through projection, and readers take it
//! too, so nobody sees a half-applied batch. Storages of different users
//! share nothing.

use kf_03_event_log::{EventLog, EventLogError, LogStore};
use kf_04_state_projector::UserState;
use parking_lot::{Mutex, MutexGuard};
use shared_types::UserId;
use tracing::info;

/// Event log and state of one user.
pub struct UserStorage<S: LogStore> {
    user: UserId,
    log: Mutex<EventLog<S, UserState>>,
}

impl<S: LogStore> UserStorage<S> {
    /// Replay `store` into a fresh state.
    ///
    /// # Errors
    ///
    /// Any replay failure; the user must not be served from a partial log.
    pub fn open(user: UserId, store: S) -> Result<Self, EventLogError> {
        let log = EventLog::open(store, UserState::new())?;

        info!(user = %user, entries = log.len(), "[kf-06] user storage opened");

        Ok(Self {
            user,
            log: Mutex::new(log),
        })
    }

    /// Owner of this storage.
    pub fn user(&self) -> &UserId {
        &self.user
    }

    /// Username, once `UserCreated` is in the log.
    pub fn username(&self) -> Option<String> {
        self.read(|state| state.user().map(|u| u.username.clone()))
    }

    /// Run `f` on the current state.
    pub fn read<R>(&self, f: impl FnOnce(&UserState) -> R) -> R {
        f(self.log.lock().state())
    }

    /// Number of log entries.
    pub fn len(&self) -> usize {
        self.log.lock().len()
    }

    /// Whether the log has no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, EventLog<S, UserState>> {
        self.log.lock()
    }
}
