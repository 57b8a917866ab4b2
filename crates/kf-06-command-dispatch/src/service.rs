//! # Vault Service
//!
//! Owns every user's storage and runs commands against them.
//!
//! ## Dispatch flow
//!
//! ```text
//! name, JSON ──► registry lookup ──► decode ──► validate
//!                                                  │
//!            ┌─────────────────────────────────────┘
//!            ▼
//!   scope User      → storage of the signed-in user
//!   scope SignIn    → storage of the named user (failure: delay after unlock)
//!   scope Register  → new storage under the next numeric id
//!            │
//!            ▼   (user mutex held from here)
//!         invoke ──► append batch ──► project ──► outcome
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

use kf_02_event_model::{Event, EventKind, EventMeta};
use kf_04_state_projector::UserState;
use parking_lot::{Mutex, RwLock};
use shared_types::{TimeSource, UserId};
use tracing::{debug, info, warn};

use crate::commands::{get_command_info, session, Command, CommandScope};
use crate::domain::{CommandError, Ctx, DispatchConfig, DispatchError, RequestMeta};
use crate::ports::{LogProvider, SecondFactorVerifier};
use crate::storage::UserStorage;

/// Result of a successful command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// User the command ran as.
    pub user: UserId,
    /// Kinds of the appended events, in order.
    pub events: Vec<EventKind>,
}

/// Per-user storages plus the command pipeline.
pub struct Vault<P: LogProvider, V: SecondFactorVerifier, T: TimeSource> {
    provider: P,
    pub(crate) verifier: V,
    pub(crate) clock: T,
    config: DispatchConfig,
    users: RwLock<HashMap<UserId, Arc<UserStorage<P::Store>>>>,
    registration: Mutex<()>,
}

impl<P: LogProvider, V: SecondFactorVerifier, T: TimeSource> Vault<P, V, T> {
    /// Replay every user's log.
    ///
    /// # Errors
    ///
    /// Fails if any log cannot be opened or replayed. Serving some users
    /// from a damaged data directory is not an option.
    pub fn open(
        provider: P,
        verifier: V,
        clock: T,
        config: DispatchConfig,
    ) -> Result<Self, DispatchError> {
        let mut users = HashMap::new();
        for user in provider.existing_users()? {
            let store = provider.open(&user)?;
            let storage = UserStorage::open(user.clone(), store)?;
            // Left behind by a registration whose first append failed.
            if storage.is_empty() {
                debug!(user = %user, "[kf-06] skipping empty log");
                continue;
            }
            users.insert(user, Arc::new(storage));
        }

        info!(users = users.len(), "[kf-06] vault opened");

        Ok(Self {
            provider,
            verifier,
            clock,
            config,
            users: RwLock::new(users),
            registration: Mutex::new(()),
        })
    }

    /// Dispatch configuration.
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// All users, sorted by id.
    pub fn users(&self) -> Vec<UserId> {
        let mut users: Vec<_> = self.users.read().keys().cloned().collect();
        users.sort();
        users
    }

    /// Id of the user with `username`.
    pub fn user_by_username(&self, username: &str) -> Option<UserId> {
        self.storage_by_username(username)
            .map(|storage| storage.user().clone())
    }

    /// Run `f` on a user's current state.
    pub fn query<R>(
        &self,
        user: &UserId,
        f: impl FnOnce(&UserState) -> R,
    ) -> Result<R, DispatchError> {
        Ok(self.storage(user)?.read(f))
    }

    /// Number of log entries of a user.
    pub fn log_len(&self, user: &UserId) -> Result<usize, DispatchError> {
        Ok(self.storage(user)?.len())
    }

    /// Drop a user's unlocked private key from memory.
    pub fn seal_decryption_key(&self, user: &UserId) -> Result<(), DispatchError> {
        let storage = self.storage(user)?;
        let mut log = storage.lock();
        if let Some(key_material) = log.state_mut().key_material_mut() {
            key_material.seal();
            info!(user = %user, "[kf-06] decryption key sealed");
        }
        Ok(())
    }

    /// Decode, validate and run the command `name`.
    ///
    /// `actor` is the signed-in user; commands of scope
    /// [`CommandScope::User`] refuse to run without one.
    pub fn dispatch(
        &self,
        actor: Option<&UserId>,
        name: &str,
        input: serde_json::Value,
        request: &RequestMeta,
    ) -> Result<DispatchOutcome, DispatchError> {
        let info =
            get_command_info(name).ok_or_else(|| DispatchError::UnknownCommand(name.to_string()))?;

        let command = info.decode(input).map_err(|source| DispatchError::Decode {
            command: info.name,
            source,
        })?;

        let result = command
            .validate()
            .map_err(DispatchError::from)
            .and_then(|()| match info.scope {
                CommandScope::User => {
                    let user = actor.ok_or(DispatchError::Unauthenticated(info.name))?;
                    let storage = self.storage(user)?;
                    self.execute(&storage, command.as_ref(), request)
                }
                CommandScope::SignIn => self.sign_in(command.as_ref(), request),
                CommandScope::Register => self.register(command.as_ref(), request),
            });

        match &result {
            Ok(outcome) => info!(
                command = info.name,
                user = %outcome.user,
                events = outcome.events.len(),
                "[kf-06] command dispatched"
            ),
            Err(err) => warn!(command = info.name, error = %err, "[kf-06] command rejected"),
        }

        result
    }

    fn sign_in(
        &self,
        command: &dyn Command,
        request: &RequestMeta,
    ) -> Result<DispatchOutcome, DispatchError> {
        let username = command.username().unwrap_or_default();
        let result = match self.storage_by_username(username) {
            Some(storage) => self.execute(&storage, command, request),
            None => {
                session::verify_for_unknown_user(command.password().unwrap_or_default());
                Err(CommandError::BadCredentials.into())
            }
        };

        // the user's lock is released by now
        if matches!(result, Err(DispatchError::Command(CommandError::BadCredentials))) {
            thread::sleep(self.config.signin_failure_delay);
        }
        result
    }

    fn register(
        &self,
        command: &dyn Command,
        request: &RequestMeta,
    ) -> Result<DispatchOutcome, DispatchError> {
        // one registration at a time keeps usernames and ids unique
        let _registration = self.registration.lock();

        let username = command.username().unwrap_or_default();
        if self.storage_by_username(username).is_some() {
            return Err(CommandError::UsernameTaken(username.to_string()).into());
        }

        let user = self.next_user_id();
        let storage = UserStorage::open(user.clone(), self.provider.open(&user)?)?;
        let outcome = self.execute(&storage, command, request)?;

        self.users.write().insert(user.clone(), Arc::new(storage));
        info!(user = %user, "[kf-06] user registered");

        Ok(outcome)
    }

    /// Invoke, append and project under the user's lock.
    fn execute(
        &self,
        storage: &UserStorage<P::Store>,
        command: &dyn Command,
        request: &RequestMeta,
    ) -> Result<DispatchOutcome, DispatchError> {
        let mut log = storage.lock();

        let meta = EventMeta::new(self.clock.now(), storage.user().clone());
        let mut ctx = Ctx::new(log.state(), meta, request, &self.config);
        command.invoke(&mut ctx)?;
        let (events, unlocked) = ctx.finish();

        log.append(&events)?;

        if let Some(private_key) = unlocked {
            if let Some(key_material) = log.state_mut().key_material_mut() {
                key_material
                    .unlock_with(private_key)
                    .map_err(CommandError::Unlock)?;
                info!(user = %storage.user(), "[kf-06] decryption key unlocked");
            }
        }

        debug!(user = %storage.user(), entries = log.len(), "[kf-06] batch projected");

        Ok(DispatchOutcome {
            user: storage.user().clone(),
            events: events.iter().map(Event::kind).collect(),
        })
    }

    pub(crate) fn storage(&self, user: &UserId) -> Result<Arc<UserStorage<P::Store>>, DispatchError> {
        self.users
            .read()
            .get(user)
            .cloned()
            .ok_or_else(|| DispatchError::UnknownUser(user.clone()))
    }

    fn storage_by_username(&self, username: &str) -> Option<Arc<UserStorage<P::Store>>> {
        if username.is_empty() {
            return None;
        }
        self.users
            .read()
            .values()
            .find(|storage| storage.username().as_deref() == Some(username))
            .cloned()
    }

    fn next_user_id(&self) -> UserId {
        let highest = self
            .users
            .read()
            .keys()
            .filter_map(|id| id.as_str().parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        UserId::new((highest + 1).to_string())
    }
}
