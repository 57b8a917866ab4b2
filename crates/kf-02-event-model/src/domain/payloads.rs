//! # Event Payloads
//!
//! One struct per event kind. Field names are the JSON keys written to the
//! log, so renaming a field is a log format change.
//!
//! Envelope-carrying fields hold the marshaled envelope bytes and appear as
//! standard base64 strings in JSON.

use serde::{Deserialize, Serialize};
use serde_with::base64::Base64;
use serde_with::serde_as;
use shared_types::{AccountId, ExternalTokenKind, FolderId, SecretId, SecretUsedType, UserId};

// =============================================================================
// USER
// =============================================================================

/// A user (tenant) was created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCreated {
    /// New user's id.
    pub id: UserId,
    /// Sign-in name.
    pub username: String,
}

/// The user's sign-in password hash changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPasswordUpdated {
    /// Affected user.
    pub user: UserId,
    /// Stored password hash (`$pbkdf2-sha256-100k$...`).
    pub password: String,
    /// Re-hash by the system rather than a change by the user.
    pub automatic_upgrade: bool,
}

/// An API access token was issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccessTokenAdded {
    /// Affected user.
    pub user: UserId,
    /// Token's own id.
    pub token_id: String,
    /// The bearer token.
    pub token: String,
    /// Free text, e.g. the device it was issued for.
    pub description: String,
}

/// A U2F token was enrolled (registration already verified by the caller).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserU2fTokenRegistered {
    /// Display name.
    pub name: String,
    /// Key handle, unique per token.
    pub key_handle: String,
    /// Raw registration data.
    pub registration_data: String,
    /// Raw client data.
    pub client_data: String,
    /// U2F protocol version.
    pub version: String,
}

/// A U2F token signed a challenge; carries its new counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserU2fTokenUsed {
    /// Token that was used.
    pub key_handle: String,
    /// Counter reported by the token.
    pub counter: u32,
}

// =============================================================================
// KEYS & SESSIONS
// =============================================================================

/// The user's decryption key pair was installed or re-sealed under a new password.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterPasswordChanged {
    /// PKCS#1 PEM public key.
    pub public_key: String,
    /// Password-sealed PKCS#1 PEM private key.
    #[serde_as(as = "Base64")]
    pub private_key_encrypted: Vec<u8>,
}

/// The decryption key was unlocked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseUnsealed {}

/// A session was opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSignedIn {
    /// Caller's address.
    pub ip_address: String,
    /// Caller's user agent.
    pub user_agent: String,
}

// =============================================================================
// FOLDERS
// =============================================================================

/// A folder was created under `parent_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderCreated {
    /// New folder.
    pub id: FolderId,
    /// Parent folder.
    pub parent_id: FolderId,
    /// Display name.
    pub name: String,
}

/// A folder got a new parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderMoved {
    /// Moved folder.
    pub id: FolderId,
    /// New parent.
    pub parent_id: FolderId,
}

/// A folder was renamed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderRenamed {
    /// Renamed folder.
    pub id: FolderId,
    /// New name.
    pub name: String,
}

/// An empty folder was deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderDeleted {
    /// Deleted folder.
    pub id: FolderId,
}

// =============================================================================
// ACCOUNTS
// =============================================================================

/// An account was created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountCreated {
    /// New account.
    pub id: AccountId,
    /// Containing folder.
    pub folder_id: FolderId,
    /// Display title.
    pub title: String,
}

/// An account was renamed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRenamed {
    /// Account.
    pub id: AccountId,
    /// New title.
    pub title: String,
}

/// An account's username changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountUsernameChanged {
    /// Account.
    pub id: AccountId,
    /// New username.
    pub username: String,
}

/// An account's URL changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountUrlChanged {
    /// Account.
    pub id: AccountId,
    /// New URL (may be empty).
    pub url: String,
}

/// An account's description changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountDescriptionChanged {
    /// Account.
    pub id: AccountId,
    /// New description.
    pub description: String,
}

/// An account moved to another folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountMoved {
    /// Account.
    pub id: AccountId,
    /// Destination folder.
    pub new_parent_folder: FolderId,
}

/// An account and all its secrets were deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountDeleted {
    /// Account.
    pub id: AccountId,
}

// =============================================================================
// SECRETS
// =============================================================================

/// A password secret was added.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordAdded {
    /// Owning account.
    pub account: AccountId,
    /// New secret.
    pub id: SecretId,
    /// Envelope over the password.
    #[serde_as(as = "Base64")]
    pub password: Vec<u8>,
}

/// A free-text secret note was added.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretNoteAdded {
    /// Owning account.
    pub account: AccountId,
    /// New secret.
    pub id: SecretId,
    /// Display title.
    pub title: String,
    /// Envelope over the note.
    #[serde_as(as = "Base64")]
    pub note: Vec<u8>,
}

/// A TOTP seed was added.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpTokenAdded {
    /// Owning account.
    pub account: AccountId,
    /// New secret.
    pub id: SecretId,
    /// Envelope over the `otpauth://` provisioning URL.
    #[serde_as(as = "Base64")]
    pub otp_provisioning_url: Vec<u8>,
}

/// One key/value pair of a keylist (e.g. a bank's numbered one-time codes).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeylistItem {
    /// Lookup key printed on the list.
    pub key: String,
    /// Code for that key.
    pub value: String,
}

/// A keylist was added.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeylistAdded {
    /// Owning account.
    pub account: AccountId,
    /// New secret.
    pub id: SecretId,
    /// Display title.
    pub title: String,
    /// First key of the list, shown so the user can recognise it.
    pub key_example: String,
    /// Envelope over the JSON array of [`KeylistItem`]s.
    #[serde_as(as = "Base64")]
    pub keys: Vec<u8>,
}

/// An SSH private key was added.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SshKeyAdded {
    /// Owning account.
    pub account: AccountId,
    /// New secret.
    pub id: SecretId,
    /// Envelope over the PKCS#1 PEM private key.
    #[serde_as(as = "Base64")]
    pub ssh_private_key: Vec<u8>,
    /// Public half in `authorized_keys` format, stored in the clear.
    pub ssh_public_key_authorized: String,
}

/// A reference to a secret held by an external device was added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalTokenAdded {
    /// Owning account.
    pub account: AccountId,
    /// New secret.
    pub id: SecretId,
    /// Device family.
    pub kind: ExternalTokenKind,
    /// Display title.
    pub description: String,
}

/// One secret was removed from an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretDeleted {
    /// Owning account.
    pub account: AccountId,
    /// Removed secret.
    pub secret: SecretId,
}

/// Secrets were decrypted for use. Audit only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretUsed {
    /// Owning account.
    pub account: AccountId,
    /// Secrets that were used.
    pub secrets: Vec<SecretId>,
    /// How they were used.
    #[serde(rename = "type")]
    pub used_type: SecretUsedType,
    /// Exposed keylist key, empty for other usage types.
    #[serde(default)]
    pub keylist_key: String,
}
