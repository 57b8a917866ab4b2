//! # Command Context
//!
//! What a command sees while it runs: the current projected state (read
//! only), the metadata its events will carry, and a sink for the events it
//! raises. Raised events go nowhere until the command returns `Ok`.

use kf_02_event_model::{Event, EventMeta, EventPayload};
use kf_04_state_projector::{Account, Folder, UserState};
use kf_05_key_material::KeyMaterial;
use shared_crypto::RsaPrivateKey;
use shared_types::{AccountId, FolderId};

use super::config::DispatchConfig;
use super::errors::CommandError;

/// Transport details of the request that carried a command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestMeta {
    /// Caller address as seen by the transport.
    pub remote_addr: String,
    /// Caller `User-Agent`.
    pub user_agent: String,
}

impl RequestMeta {
    /// Request metadata from its parts.
    pub fn new(remote_addr: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            remote_addr: remote_addr.into(),
            user_agent: user_agent.into(),
        }
    }
}

/// Invocation context of one command.
pub struct Ctx<'a> {
    state: &'a UserState,
    meta: EventMeta,
    request: &'a RequestMeta,
    config: &'a DispatchConfig,
    raised: Vec<Event>,
    unlocked: Option<RsaPrivateKey>,
}

impl<'a> Ctx<'a> {
    pub(crate) fn new(
        state: &'a UserState,
        meta: EventMeta,
        request: &'a RequestMeta,
        config: &'a DispatchConfig,
    ) -> Self {
        Self {
            state,
            meta,
            request,
            config,
            raised: Vec::new(),
            unlocked: None,
        }
    }

    /// Queue an event, stamped with this command's metadata.
    pub fn raise_event(&mut self, payload: impl Into<EventPayload>) {
        self.raised.push(Event::new(self.meta.clone(), payload));
    }

    /// State before this command.
    pub fn state(&self) -> &'a UserState {
        self.state
    }

    /// Metadata stamped on raised events.
    pub fn meta(&self) -> &EventMeta {
        &self.meta
    }

    /// Request transport details.
    pub fn request(&self) -> &RequestMeta {
        self.request
    }

    /// Dispatch configuration.
    pub fn config(&self) -> &DispatchConfig {
        self.config
    }

    /// Account by id.
    pub fn account(&self, id: &AccountId) -> Result<&'a Account, CommandError> {
        self.state.account(id).ok_or(CommandError::AccountNotFound)
    }

    /// Folder by id.
    pub fn folder(&self, id: &FolderId) -> Result<&'a Folder, CommandError> {
        self.state.folder(id).ok_or(CommandError::FolderNotFound)
    }

    /// The user's key material.
    pub fn key_material(&self) -> Result<&'a KeyMaterial, CommandError> {
        self.state.key_material().ok_or(CommandError::NoKeyMaterial)
    }

    /// Seal `plaintext` into an envelope for the user's key.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CommandError> {
        Ok(self.key_material()?.encrypt(plaintext)?)
    }

    /// Keep `private_key` in memory once the raised events are durable.
    pub(crate) fn keep_unlocked(&mut self, private_key: RsaPrivateKey) {
        self.unlocked = Some(private_key);
    }

    pub(crate) fn finish(self) -> (Vec<Event>, Option<RsaPrivateKey>) {
        (self.raised, self.unlocked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use kf_02_event_model::{EventKind, FolderRenamed};

    #[test]
    fn test_raised_events_carry_meta() {
        let state = UserState::new();
        let request = RequestMeta::default();
        let config = DispatchConfig::default();
        let at = Utc.with_ymd_and_hms(2020, 2, 20, 14, 2, 0).unwrap();
        let mut ctx = Ctx::new(&state, EventMeta::new(at, "7"), &request, &config);

        ctx.raise_event(FolderRenamed {
            id: FolderId::root(),
            name: "x".into(),
        });
        let (events, unlocked) = ctx.finish();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind(), EventKind::FolderRenamed);
        assert_eq!(events[0].meta.user_id.as_str(), "7");
        assert_eq!(events[0].meta.timestamp, at);
        assert!(unlocked.is_none());
    }

    #[test]
    fn test_lookups_report_missing_entities() {
        let state = UserState::new();
        let request = RequestMeta::default();
        let config = DispatchConfig::default();
        let ctx = Ctx::new(&state, EventMeta::system(Utc::now()), &request, &config);

        assert!(ctx.folder(&FolderId::root()).is_ok());
        assert!(matches!(
            ctx.folder(&FolderId::new("nope")),
            Err(CommandError::FolderNotFound)
        ));
        assert!(matches!(
            ctx.account(&AccountId::new("nope")),
            Err(CommandError::AccountNotFound)
        ));
        assert!(matches!(
            ctx.encrypt(b"x"),
            Err(CommandError::NoKeyMaterial)
        ));
    }
}
