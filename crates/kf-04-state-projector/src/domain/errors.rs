//! Projection errors.
//!
//! Every variant means the log and the projector disagree. Command dispatch
//! validates before raising events, so none of these occur on a healthy log.

use kf_02_event_model::EventKind;
use kf_05_key_material::KeyMaterialError;
use shared_types::{AccountId, FolderId, SecretId};
use thiserror::Error;

/// An event could not be applied to the state.
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// A user-scoped event arrived before `UserCreated`.
    #[error("{kind}: user not created")]
    UserMissing {
        /// Offending event kind.
        kind: EventKind,
    },

    /// `UserCreated` for a user that already exists.
    #[error("{kind}: user already created")]
    UserExists {
        /// Offending event kind.
        kind: EventKind,
    },

    /// Referenced account does not exist.
    #[error("{kind}: account {id} not found")]
    AccountNotFound {
        /// Offending event kind.
        kind: EventKind,
        /// Missing account.
        id: AccountId,
    },

    /// Account id already in use.
    #[error("{kind}: account {id} already exists")]
    AccountExists {
        /// Offending event kind.
        kind: EventKind,
        /// Duplicate id.
        id: AccountId,
    },

    /// Referenced folder does not exist.
    #[error("{kind}: folder {id} not found")]
    FolderNotFound {
        /// Offending event kind.
        kind: EventKind,
        /// Missing folder.
        id: FolderId,
    },

    /// Folder id already in use.
    #[error("{kind}: folder {id} already exists")]
    FolderExists {
        /// Offending event kind.
        kind: EventKind,
        /// Duplicate id.
        id: FolderId,
    },

    /// The root folder cannot be moved or deleted.
    #[error("{kind}: root folder is immutable")]
    RootFolder {
        /// Offending event kind.
        kind: EventKind,
    },

    /// Referenced secret does not exist on the account.
    #[error("{kind}: secret {secret} of account {account} not found")]
    SecretNotFound {
        /// Offending event kind.
        kind: EventKind,
        /// Owning account.
        account: AccountId,
        /// Missing secret.
        secret: SecretId,
    },

    /// Secret id already in use on the account.
    #[error("{kind}: secret {secret} of account {account} already exists")]
    SecretExists {
        /// Offending event kind.
        kind: EventKind,
        /// Owning account.
        account: AccountId,
        /// Duplicate id.
        secret: SecretId,
    },

    /// Referenced U2F token is not registered.
    #[error("{kind}: U2F token {key_handle} not registered")]
    U2fTokenNotFound {
        /// Offending event kind.
        kind: EventKind,
        /// Unknown key handle.
        key_handle: String,
    },

    /// Key material in the event is unusable.
    #[error("{kind}: {source}")]
    KeyMaterial {
        /// Offending event kind.
        kind: EventKind,
        /// Underlying failure.
        #[source]
        source: KeyMaterialError,
    },
}
