//! # Events
//!
//! [`EventKind`] and [`EventPayload`] are generated from one list, so a kind
//! cannot exist without a payload type and a decoder.

use std::fmt;
use std::str::FromStr;

use shared_types::{Timestamp, UserId};

use super::errors::EventCodecError;
use super::payloads::*;

/// Who raised an event, and when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventMeta {
    /// Moment the event was raised.
    pub timestamp: Timestamp,
    /// Acting user. Empty for system-originated events.
    pub user_id: UserId,
}

impl EventMeta {
    /// Meta for an event raised on behalf of `user_id`.
    pub fn new(timestamp: Timestamp, user_id: impl Into<UserId>) -> Self {
        Self {
            timestamp,
            user_id: user_id.into(),
        }
    }

    /// Meta for a system-originated event (empty user id).
    pub fn system(timestamp: Timestamp) -> Self {
        Self::new(timestamp, "")
    }

    /// Whether no user raised this event.
    pub fn is_system(&self) -> bool {
        self.user_id.as_str().is_empty()
    }
}

/// An immutable domain event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Common header.
    pub meta: EventMeta,
    /// Kind-specific fields.
    pub payload: EventPayload,
}

impl Event {
    /// Build an event from any payload struct.
    pub fn new(meta: EventMeta, payload: impl Into<EventPayload>) -> Self {
        Self {
            meta,
            payload: payload.into(),
        }
    }

    /// The event's kind tag.
    pub fn kind(&self) -> EventKind {
        self.payload.kind()
    }
}

macro_rules! event_kinds {
    ($($variant:ident),+ $(,)?) => {
        /// Tag of an event; written as the first field of a log line.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum EventKind {
            $(
                #[doc = concat!("`", stringify!($variant), "`")]
                $variant,
            )+
        }

        impl EventKind {
            /// Every kind, in declaration order.
            pub const ALL: &'static [EventKind] = &[$(EventKind::$variant),+];

            /// Wire spelling.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(EventKind::$variant => stringify!($variant),)+
                }
            }
        }

        impl FromStr for EventKind {
            type Err = EventCodecError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $(stringify!($variant) => Ok(EventKind::$variant),)+
                    _ => Err(EventCodecError::UnknownEventKind(s.to_string())),
                }
            }
        }

        /// Kind-specific fields of an event. Closed: one variant per kind.
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum EventPayload {
            $(
                #[doc = concat!("See [`", stringify!($variant), "`].")]
                $variant($variant),
            )+
        }

        impl EventPayload {
            /// Tag of this payload.
            pub fn kind(&self) -> EventKind {
                match self {
                    $(EventPayload::$variant(_) => EventKind::$variant,)+
                }
            }

            /// Encode the payload as compact JSON.
            pub fn to_json(&self) -> Result<String, EventCodecError> {
                let kind = self.kind().as_str();
                match self {
                    $(EventPayload::$variant(payload) => serde_json::to_string(payload),)+
                }
                .map_err(|source| EventCodecError::PayloadEncodeError { kind, source })
            }

            /// Decode the JSON payload of a line tagged `kind`.
            pub fn from_json(kind: EventKind, json: &str) -> Result<Self, EventCodecError> {
                match kind {
                    $(EventKind::$variant => serde_json::from_str(json).map(EventPayload::$variant),)+
                }
                .map_err(|source| EventCodecError::PayloadDecodeError {
                    kind: kind.as_str(),
                    source,
                })
            }
        }

        $(
            impl From<$variant> for EventPayload {
                fn from(payload: $variant) -> Self {
                    EventPayload::$variant(payload)
                }
            }
        )+
    };
}

event_kinds!(
    // user
    UserCreated,
    UserPasswordUpdated,
    UserAccessTokenAdded,
    UserU2fTokenRegistered,
    UserU2fTokenUsed,
    // keys & sessions
    MasterPasswordChanged,
    DatabaseUnsealed,
    SessionSignedIn,
    // folders
    FolderCreated,
    FolderMoved,
    FolderRenamed,
    FolderDeleted,
    // accounts
    AccountCreated,
    AccountRenamed,
    AccountUsernameChanged,
    AccountUrlChanged,
    AccountDescriptionChanged,
    AccountMoved,
    AccountDeleted,
    // secrets
    PasswordAdded,
    SecretNoteAdded,
    OtpTokenAdded,
    KeylistAdded,
    SshKeyAdded,
    ExternalTokenAdded,
    SecretDeleted,
    SecretUsed,
);

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
