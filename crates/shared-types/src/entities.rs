//! # Core Domain Vocabulary
//!
//! Opaque identifiers and closed enums shared across the vault.
//!
//! ## Identifier format
//!
//! Fresh ids are 4 random bytes, hex encoded (`"3f9a0c1e"`). Ids read back
//! from the log are accepted verbatim; the only reserved id is the root
//! folder's, [`ROOT_FOLDER_ID`].

use std::fmt;
use std::str::FromStr;

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::errors::ParseKindError;

/// Id of the implicit ancestor of every folder.
pub const ROOT_FOLDER_ID: &str = "root";

/// Display name of the root folder.
pub const ROOT_FOLDER_NAME: &str = "root";

/// Generate a short random id (4 random bytes, hex).
pub fn random_id() -> String {
    let mut bytes = [0u8; 4];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

macro_rules! opaque_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an existing id.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generate a fresh random id.
            pub fn random() -> Self {
                Self(random_id())
            }

            /// Borrow the raw id.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

opaque_id!(
    /// Identifies an account (a website or service the user holds credentials for).
    AccountId
);
opaque_id!(
    /// Identifies a folder in a user's folder tree.
    FolderId
);
opaque_id!(
    /// Identifies a secret owned by an account.
    SecretId
);
opaque_id!(
    /// Identifies a user (tenant). One event log exists per user.
    UserId
);

impl FolderId {
    /// The root folder's id.
    pub fn root() -> Self {
        Self(ROOT_FOLDER_ID.to_string())
    }

    /// Whether this is the root folder.
    pub fn is_root(&self) -> bool {
        self.0 == ROOT_FOLDER_ID
    }
}

macro_rules! closed_enum {
    (
        $(#[$doc:meta])*
        $name:ident, $label:literal {
            $($(#[$vdoc:meta])* $variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vdoc])*
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Wire spelling.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseKindError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    _ => Err(ParseKindError::new($label, s)),
                }
            }
        }
    };
}

closed_enum!(
    /// What a secret holds. Every secret has exactly one kind.
    SecretKind, "secret kind" {
        /// Password bytes.
        Password => "password",
        /// PEM-encoded RSA private key plus its authorized-keys public half.
        SshKey => "ssh_key",
        /// OTP provisioning URL (`otpauth://...`).
        OtpToken => "otp_token",
        /// Serialized key/value list (e.g. bank one-time code sheet).
        Keylist => "keylist",
        /// Free-text note.
        Note => "note",
        /// Marker for a factor held outside the vault.
        ExternalToken => "external_token",
    }
);

closed_enum!(
    /// Kind of hardware/external factor an external-token secret refers to.
    ExternalTokenKind, "external token kind" {
        /// FIDO U2F security key.
        U2f => "u2f",
        /// Yubico OTP.
        YubicoOtp => "yubico_otp",
    }
);

closed_enum!(
    /// Why a secret was used; recorded in the audit log.
    SecretUsedType, "secret used type" {
        /// Account secrets were decrypted for display.
        PasswordExposed => "password_exposed",
        /// A single keylist entry was looked up.
        KeylistKeyExposed => "keylist_key_exposed",
        /// An SSH private key was released for signing.
        SshSigning => "ssh_signing",
    }
);
