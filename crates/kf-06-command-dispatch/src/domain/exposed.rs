//! Query results that carry decrypted material, and the second-factor
//! types guarding them.

use std::fmt;

use serde::Deserialize;
use shared_types::{ExternalTokenKind, SecretId, SecretKind, Timestamp};

/// Second-factor proof sent along with an exposure request.
///
/// Opaque to this crate; a [`SecondFactorVerifier`](crate::SecondFactorVerifier)
/// interprets it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SecondFactorProof {
    /// Key handle the client signed with.
    pub key_handle: String,
    /// Client data as sent by the authenticator.
    pub client_data: String,
    /// Signature data as sent by the authenticator.
    pub signature_data: String,
}

/// A successful token use, recorded as `UserU2fTokenUsed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedUse {
    /// Token that signed.
    pub key_handle: String,
    /// Counter reported by the token.
    pub counter: u32,
}

/// One secret of an account, decrypted where its kind allows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExposedSecret {
    /// Secret id.
    pub id: SecretId,
    /// Secret kind.
    pub kind: SecretKind,
    /// When it was added.
    pub created: Timestamp,
    /// Title, empty for kinds without one.
    pub title: String,
    /// Kind-specific content.
    pub content: ExposedContent,
}

/// Kind-specific part of an [`ExposedSecret`].
///
/// SSH private keys and keylist values are never part of a bulk exposure;
/// they have their own queries.
#[derive(Clone, PartialEq, Eq)]
pub enum ExposedContent {
    /// Decrypted password.
    Password(String),
    /// Decrypted note.
    Note(String),
    /// Current OTP code, and the MAC authorizing export of the
    /// provisioning URL.
    OtpToken {
        /// Code for the exposure time.
        proof_code: String,
        /// Short MAC over the secret id.
        export_mac: String,
    },
    /// Authorized-keys line of the public half.
    SshKey {
        /// `ssh-rsa AAAA...`
        public_key_authorized: String,
    },
    /// Example key of the list.
    Keylist {
        /// First key, for the user to recognize the list by.
        key_example: String,
    },
    /// Token living outside the vault.
    ExternalToken {
        /// Token type.
        kind: ExternalTokenKind,
    },
}

impl fmt::Debug for ExposedContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExposedContent::Password(_) => f.write_str("Password(..)"),
            ExposedContent::Note(_) => f.write_str("Note(..)"),
            ExposedContent::OtpToken { .. } => f.write_str("OtpToken(..)"),
            ExposedContent::SshKey {
                public_key_authorized,
            } => f
                .debug_struct("SshKey")
                .field("public_key_authorized", public_key_authorized)
                .finish(),
            ExposedContent::Keylist { key_example } => f
                .debug_struct("Keylist")
                .field("key_example", key_example)
                .finish(),
            ExposedContent::ExternalToken { kind } => f
                .debug_struct("ExternalToken")
                .field("kind", kind)
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_plaintext() {
        let content = ExposedContent::Password("hunter2".into());
        assert!(!format!("{content:?}").contains("hunter2"));

        let content = ExposedContent::OtpToken {
            proof_code: "123456".into(),
            export_mac: "abc".into(),
        };
        assert!(!format!("{content:?}").contains("123456"));
    }

    #[test]
    fn test_proof_fields_default_to_empty() {
        let proof: SecondFactorProof = serde_json::from_str("{}").unwrap();
        assert_eq!(proof, SecondFactorProof::default());
    }
}
