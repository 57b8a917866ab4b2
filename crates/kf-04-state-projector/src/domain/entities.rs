//! # Projected Entities
//!
//! Everything here is derived from the event log and can be rebuilt by
//! replaying it.

use shared_types::{
    AccountId, ExternalTokenKind, FolderId, SecretId, SecretKind, Timestamp, UserId,
};

/// The vault's owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// User id.
    pub id: UserId,
    /// Sign-in name.
    pub username: String,
    /// When the user was created.
    pub created: Timestamp,
    /// Stored password hash (`$pbkdf2-sha256-100k$...`).
    pub password_hash: String,
    /// Last user-initiated password change. Automatic hash upgrades do not
    /// count.
    pub password_last_changed: Option<Timestamp>,
    /// Latest access token. Only one is supported.
    pub access_token: Option<AccessToken>,
}

/// A bearer token for non-interactive clients.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    /// Token id.
    pub id: String,
    /// The token itself.
    pub token: String,
    /// Free-text label.
    pub description: String,
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("id", &self.id)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// A registered U2F security key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct U2fToken {
    /// Display name.
    pub name: String,
    /// Registration time.
    pub enrolled_at: Timestamp,
    /// Key handle, unique per token.
    pub key_handle: String,
    /// Registration response data.
    pub registration_data: String,
    /// Client data of the registration.
    pub client_data: String,
    /// U2F protocol version.
    pub version: String,
    /// Last seen signature counter.
    pub counter: u32,
}

/// A node of the folder tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    /// Folder id.
    pub id: FolderId,
    /// Parent folder. `None` only for the root.
    pub parent_id: Option<FolderId>,
    /// Display name.
    pub name: String,
}

/// Account metadata plus its secrets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Account id.
    pub id: AccountId,
    /// Containing folder.
    pub folder_id: FolderId,
    /// Display title.
    pub title: String,
    /// Login name, possibly empty.
    pub username: String,
    /// Login URL, possibly empty.
    pub url: String,
    /// Free-text description, possibly empty.
    pub description: String,
    /// Creation time.
    pub created: Timestamp,
    /// Secrets in the order they were added.
    pub secrets: Vec<Secret>,
}

impl Account {
    /// Secret by id.
    pub fn secret(&self, id: &SecretId) -> Option<&Secret> {
        self.secrets.iter().find(|s| &s.id == id)
    }

    /// Whether any secret is an SSH key.
    pub fn has_ssh_key(&self) -> bool {
        self.secrets
            .iter()
            .any(|s| s.kind() == SecretKind::SshKey)
    }
}

/// One secret of an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Secret {
    /// Secret id.
    pub id: SecretId,
    /// Creation time.
    pub created: Timestamp,
    /// Display title; empty for kinds without one.
    pub title: String,
    /// Kind-specific content.
    pub payload: SecretPayload,
}

impl Secret {
    /// Kind tag of the payload.
    pub fn kind(&self) -> SecretKind {
        self.payload.kind()
    }
}

/// Kind-specific secret content. Byte fields are marshaled envelopes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretPayload {
    /// A password.
    Password {
        /// Envelope of the password.
        password: Vec<u8>,
    },
    /// A free-text note.
    Note {
        /// Envelope of the note.
        note: Vec<u8>,
    },
    /// A TOTP seed.
    OtpToken {
        /// Envelope of the `otpauth://` URL.
        otp_provisioning_url: Vec<u8>,
    },
    /// An SSH private key.
    SshKey {
        /// Envelope of the private key PEM.
        ssh_private_key: Vec<u8>,
        /// Public half as an `authorized_keys` line.
        ssh_public_key_authorized: String,
    },
    /// A key/value code sheet.
    Keylist {
        /// First key, shown as a hint of the key format.
        key_example: String,
        /// Envelope of the JSON item list.
        keys: Vec<u8>,
    },
    /// A factor held outside the vault; carries no secret.
    ExternalToken {
        /// Which kind of token.
        kind: ExternalTokenKind,
    },
}

impl SecretPayload {
    /// Kind tag.
    pub fn kind(&self) -> SecretKind {
        match self {
            SecretPayload::Password { .. } => SecretKind::Password,
            SecretPayload::Note { .. } => SecretKind::Note,
            SecretPayload::OtpToken { .. } => SecretKind::OtpToken,
            SecretPayload::SshKey { .. } => SecretKind::SshKey,
            SecretPayload::Keylist { .. } => SecretKind::Keylist,
            SecretPayload::ExternalToken { .. } => SecretKind::ExternalToken,
        }
    }
}

/// One human-readable audit record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntry {
    /// When the audited event happened.
    pub timestamp: Timestamp,
    /// What happened.
    pub message: String,
}

/// A folder with everything needed to render it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderView {
    /// The folder itself.
    pub folder: Folder,
    /// Ancestors, root first, excluding the folder itself.
    pub parents: Vec<Folder>,
    /// Direct children.
    pub subfolders: Vec<Folder>,
    /// Accounts directly inside, without their secrets.
    pub accounts: Vec<AccountSummary>,
}

/// Account metadata without secrets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSummary {
    /// Account id.
    pub id: AccountId,
    /// Containing folder.
    pub folder_id: FolderId,
    /// Display title.
    pub title: String,
    /// Login name.
    pub username: String,
    /// Login URL.
    pub url: String,
    /// Description.
    pub description: String,
    /// Creation time.
    pub created: Timestamp,
}

impl From<&Account> for AccountSummary {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.clone(),
            folder_id: account.folder_id.clone(),
            title: account.title.clone(),
            username: account.username.clone(),
            url: account.url.clone(),
            description: account.description.clone(),
            created: account.created,
        }
    }
}
