//! # Dispatch Errors
//!
//! [`CommandError`] messages are shown to the user as they are, so their
//! wording is part of the interface.

use kf_03_event_log::{EventLogError, LogStoreError};
use kf_05_key_material::KeyMaterialError;
use shared_crypto::CryptoError;
use shared_types::{SecretKind, UserId};
use thiserror::Error;

/// A command or query was refused. Nothing was written.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Referenced account does not exist.
    #[error("Account not found")]
    AccountNotFound,

    /// Referenced folder does not exist.
    #[error("Folder not found")]
    FolderNotFound,

    /// Referenced secret does not exist in the account.
    #[error("Secret not found")]
    SecretNotFound,

    /// Folder still has subfolders or accounts.
    #[error("folder not empty")]
    FolderNotEmpty,

    /// The root folder is permanent.
    #[error("cannot delete root folder")]
    DeleteRootFolder,

    /// The root folder has no parent to change.
    #[error("cannot move root folder")]
    MoveRootFolder,

    /// Target parent is the folder itself or one of its descendants.
    #[error("cannot move folder inside itself")]
    FolderCycle,

    /// `account.Create` needs something to call the account.
    #[error("you must specify at least Title or the Url")]
    TitleOrUrlRequired,

    /// A mandatory field is empty.
    #[error("{0} is required")]
    Required(&'static str),

    /// Password confirmation differs.
    #[error("password and repeated password different")]
    PasswordsDiffer,

    /// URL does not parse.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// No alphanumeric tokens in the keylist text.
    #[error("unable to parse keylist")]
    KeylistUnparseable,

    /// Token count is not twice the declared key count.
    #[error("ExpectedKeyCount does not match with parsed keylist")]
    KeylistCountMismatch,

    /// A key has the wrong length.
    #[error("invalid length for key: {0}")]
    KeylistKeyLength(String),

    /// A value has the wrong length.
    #[error("invalid length for value: {0}")]
    KeylistValueLength(String),

    /// Keylist content could not be encoded or decoded.
    #[error("keylist content unreadable: {0}")]
    KeylistContent(#[source] serde_json::Error),

    /// Requested keylist key is not in the list.
    #[error("key not found from keylist")]
    KeylistKeyNotFound,

    /// Input is not a PEM block.
    #[error("Failed to parse PEM block")]
    PemUnparseable,

    /// Something follows the END line.
    #[error("Extra data included in PEM content")]
    PemExtraData,

    /// PEM label is not `RSA PRIVATE KEY`.
    #[error("Currently we only support RSA format keys")]
    PemNotRsa,

    /// PEM block is password protected.
    #[error("We do not support encypted PEM blocks yet")]
    PemEncrypted,

    /// OTP URL does not parse or cannot produce a code.
    #[error("invalid OtpProvisioningUrl: {0}")]
    InvalidOtpUrl(String),

    /// User already has an access token.
    #[error("multiple access tokens not currently supported")]
    AccessTokenExists,

    /// U2F key handle already registered.
    #[error("U2F token already registered")]
    U2fTokenExists,

    /// Sign-in failed. Unknown user and wrong password are not told apart.
    #[error("bad username or password")]
    BadCredentials,

    /// Username belongs to another user.
    #[error("username {0} already taken")]
    UsernameTaken(String),

    /// The user has no key material yet.
    #[error("no decryption key")]
    NoKeyMaterial,

    /// `user.UnlockDecryptionKey` failed.
    #[error("UnlockDecryptionKey: {0}")]
    Unlock(#[source] KeyMaterialError),

    /// Second factor proof refused.
    #[error("second factor verification failed: {0}")]
    SecondFactor(String),

    /// Secret exists but is of another kind.
    #[error("secret is not of kind {0}")]
    WrongSecretKind(SecretKind),

    /// Locked key, undecryptable envelope and similar.
    #[error(transparent)]
    KeyMaterial(#[from] KeyMaterialError),

    /// Primitive failures (key generation, PEM parsing, MAC mismatch).
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

/// Dispatch failures, wrapping [`CommandError`] with lookup and storage
/// failures.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No command registered under this name.
    #[error("unsupported command: {0}")]
    UnknownCommand(String),

    /// Input does not match the command's fields.
    #[error("invalid input for {command}: {source}")]
    Decode {
        /// Command name.
        command: &'static str,
        /// Decoder error.
        source: serde_json::Error,
    },

    /// The command refused.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// No storage for this user.
    #[error("user {0} not found")]
    UnknownUser(UserId),

    /// A user-scoped command arrived without a user.
    #[error("{0} requires a signed-in user")]
    Unauthenticated(&'static str),

    /// Appending or replaying the log failed.
    #[error(transparent)]
    Log(#[from] EventLogError),

    /// Opening a user's log failed.
    #[error(transparent)]
    Store(#[from] LogStoreError),
}

impl DispatchError {
    /// Whether the caller made a mistake, as opposed to the server.
    pub fn is_client_error(&self) -> bool {
        match self {
            DispatchError::UnknownCommand(_)
            | DispatchError::Decode { .. }
            | DispatchError::Command(_)
            | DispatchError::UnknownUser(_)
            | DispatchError::Unauthenticated(_) => true,
            DispatchError::Log(_) | DispatchError::Store(_) => false,
        }
    }
}
