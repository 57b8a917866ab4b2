//! # Secret Commands
//!
//! Add secrets to an account and delete them. Secret content is sealed into
//! an envelope for the user's public key before it is raised, so adding
//! works while the decryption key is locked.

use chrono::{DateTime, Utc};
use kf_02_event_model::{
    ExternalTokenAdded, KeylistAdded, KeylistItem, OtpTokenAdded, PasswordAdded, SecretDeleted,
    SecretNoteAdded, SshKeyAdded,
};
use serde::Deserialize;
use shared_crypto::random::{self, GENERATED_PASSWORD_LEN};
use shared_crypto::rsa_keys::{
    private_key_from_der, private_key_to_pem, ssh_authorized_key, PEM_RSA_PRIVATE_KEY,
};
use shared_crypto::{CryptoError, OtpKey, PemBlock};
use shared_types::{AccountId, ExternalTokenKind, SecretId};

use super::Command;
use crate::domain::{CommandError, Ctx};

/// Password value that asks for a generated password.
pub const AUTO_PASSWORD: &str = "_auto";

/// `account.AddPassword`
#[derive(Deserialize)]
pub struct AddPassword {
    pub account: AccountId,
    pub password: String,
    #[serde(default)]
    pub password_repeat: String,
}

impl Command for AddPassword {
    fn validate(&self) -> Result<(), CommandError> {
        if self.password.is_empty() {
            return Err(CommandError::Required("password"));
        }
        if self.password != self.password_repeat {
            return Err(CommandError::PasswordsDiffer);
        }
        Ok(())
    }

    fn invoke(&self, ctx: &mut Ctx<'_>) -> Result<(), CommandError> {
        ctx.account(&self.account)?;

        let password = if self.password == AUTO_PASSWORD {
            ctx.encrypt(random::password(GENERATED_PASSWORD_LEN).as_bytes())?
        } else {
            ctx.encrypt(self.password.as_bytes())?
        };

        ctx.raise_event(PasswordAdded {
            account: self.account.clone(),
            id: SecretId::random(),
            password,
        });
        Ok(())
    }
}

/// `account.AddSecretNote`
#[derive(Deserialize)]
pub struct AddSecretNote {
    pub account: AccountId,
    #[serde(default)]
    pub title: String,
    pub note: String,
}

impl Command for AddSecretNote {
    fn invoke(&self, ctx: &mut Ctx<'_>) -> Result<(), CommandError> {
        ctx.account(&self.account)?;
        let note = ctx.encrypt(self.note.as_bytes())?;
        ctx.raise_event(SecretNoteAdded {
            account: self.account.clone(),
            id: SecretId::random(),
            title: self.title.clone(),
            note,
        });
        Ok(())
    }
}

/// `account.AddOtpToken`
#[derive(Deserialize)]
pub struct AddOtpToken {
    pub account: AccountId,
    pub otp_provisioning_url: String,
}

impl Command for AddOtpToken {
    fn validate(&self) -> Result<(), CommandError> {
        // a URL can parse and still be unable to produce a code
        OtpKey::from_url(&self.otp_provisioning_url)
            .and_then(|key| key.generate_code(DateTime::<Utc>::UNIX_EPOCH))
            .map_err(|err| match err {
                CryptoError::InvalidOtpUrl(reason) => CommandError::InvalidOtpUrl(reason),
                other => CommandError::InvalidOtpUrl(other.to_string()),
            })?;
        Ok(())
    }

    fn invoke(&self, ctx: &mut Ctx<'_>) -> Result<(), CommandError> {
        ctx.account(&self.account)?;
        let otp_provisioning_url = ctx.encrypt(self.otp_provisioning_url.as_bytes())?;
        ctx.raise_event(OtpTokenAdded {
            account: self.account.clone(),
            id: SecretId::random(),
            otp_provisioning_url,
        });
        Ok(())
    }
}

/// `account.AddKeylist`
///
/// `keylist` is free text; every run of ASCII letters and digits is a
/// token and tokens pair up as key, value, key, value, ...
#[derive(Deserialize)]
pub struct AddKeylist {
    pub account: AccountId,
    #[serde(default)]
    pub title: String,
    pub keylist: String,
    pub expected_key_count: usize,
    /// Required key length, 0 for any.
    #[serde(default)]
    pub length_of_keys: usize,
    /// Required value length, 0 for any.
    #[serde(default)]
    pub length_of_values: usize,
}

impl AddKeylist {
    fn parse(&self) -> Result<Vec<KeylistItem>, CommandError> {
        let tokens: Vec<&str> = self
            .keylist
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|token| !token.is_empty())
            .collect();

        if tokens.is_empty() {
            return Err(CommandError::KeylistUnparseable);
        }
        if self.expected_key_count == 0 || self.expected_key_count * 2 != tokens.len() {
            return Err(CommandError::KeylistCountMismatch);
        }

        tokens
            .chunks_exact(2)
            .map(|pair| {
                let (key, value) = (pair[0], pair[1]);
                if self.length_of_keys != 0 && key.len() != self.length_of_keys {
                    return Err(CommandError::KeylistKeyLength(key.to_string()));
                }
                if self.length_of_values != 0 && value.len() != self.length_of_values {
                    return Err(CommandError::KeylistValueLength(value.to_string()));
                }
                Ok(KeylistItem {
                    key: key.to_string(),
                    value: value.to_string(),
                })
            })
            .collect()
    }
}

impl Command for AddKeylist {
    fn validate(&self) -> Result<(), CommandError> {
        self.parse().map(|_| ())
    }

    fn invoke(&self, ctx: &mut Ctx<'_>) -> Result<(), CommandError> {
        ctx.account(&self.account)?;

        let items = self.parse()?;
        let key_example = items
            .first()
            .map(|item| item.key.clone())
            .unwrap_or_default();
        let json = serde_json::to_vec(&items).map_err(CommandError::KeylistContent)?;
        let keys = ctx.encrypt(&json)?;

        ctx.raise_event(KeylistAdded {
            account: self.account.clone(),
            id: SecretId::random(),
            title: self.title.clone(),
            key_example,
            keys,
        });
        Ok(())
    }
}

/// `account.AddSshKey`
///
/// Accepts exactly one unencrypted PKCS#1 RSA PEM block. The stored key is
/// re-encoded, so line widths and headers of the input do not survive.
#[derive(Deserialize)]
pub struct AddSshKey {
    pub account: AccountId,
    pub ssh_private_key: String,
}

/// Re-encoded PEM and `authorized_keys` line.
struct ParsedSshKey {
    pem: String,
    public_key_authorized: String,
}

impl AddSshKey {
    fn parse(&self) -> Result<ParsedSshKey, CommandError> {
        let (block, rest) =
            PemBlock::decode(&self.ssh_private_key).ok_or(CommandError::PemUnparseable)?;

        if !rest.is_empty() {
            return Err(CommandError::PemExtraData);
        }
        if block.label != PEM_RSA_PRIVATE_KEY {
            return Err(CommandError::PemNotRsa);
        }
        if block.is_encrypted() {
            return Err(CommandError::PemEncrypted);
        }

        let private_key = private_key_from_der(&block.contents)?;
        Ok(ParsedSshKey {
            pem: private_key_to_pem(&private_key)?.to_string(),
            public_key_authorized: ssh_authorized_key(&private_key.to_public_key()),
        })
    }
}

impl Command for AddSshKey {
    fn validate(&self) -> Result<(), CommandError> {
        self.parse().map(|_| ())
    }

    fn invoke(&self, ctx: &mut Ctx<'_>) -> Result<(), CommandError> {
        ctx.account(&self.account)?;

        let parsed = self.parse()?;
        let ssh_private_key = ctx.encrypt(parsed.pem.as_bytes())?;

        ctx.raise_event(SshKeyAdded {
            account: self.account.clone(),
            id: SecretId::random(),
            ssh_private_key,
            ssh_public_key_authorized: parsed.public_key_authorized,
        });
        Ok(())
    }
}

fn add_external_token(
    ctx: &mut Ctx<'_>,
    account: &AccountId,
    kind: ExternalTokenKind,
    description: &str,
) -> Result<(), CommandError> {
    ctx.account(account)?;
    ctx.raise_event(ExternalTokenAdded {
        account: account.clone(),
        id: SecretId::random(),
        kind,
        description: description.to_string(),
    });
    Ok(())
}

/// `account.AddExternalU2FToken`
#[derive(Debug, Deserialize)]
pub struct AddExternalU2fToken {
    pub account: AccountId,
    pub title: String,
}

impl Command for AddExternalU2fToken {
    fn invoke(&self, ctx: &mut Ctx<'_>) -> Result<(), CommandError> {
        add_external_token(ctx, &self.account, ExternalTokenKind::U2f, &self.title)
    }
}

/// `account.AddExternalYubicoOtpToken`
#[derive(Debug, Deserialize)]
pub struct AddExternalYubicoOtpToken {
    pub account: AccountId,
    pub title: String,
}

impl Command for AddExternalYubicoOtpToken {
    fn invoke(&self, ctx: &mut Ctx<'_>) -> Result<(), CommandError> {
        add_external_token(ctx, &self.account, ExternalTokenKind::YubicoOtp, &self.title)
    }
}

/// `account.DeleteSecret`
#[derive(Debug, Deserialize)]
pub struct DeleteSecret {
    pub account: AccountId,
    pub secret: SecretId,
}

impl Command for DeleteSecret {
    fn invoke(&self, ctx: &mut Ctx<'_>) -> Result<(), CommandError> {
        ctx.account(&self.account)?
            .secret(&self.secret)
            .ok_or(CommandError::SecretNotFound)?;

        ctx.raise_event(SecretDeleted {
            account: self.account.clone(),
            secret: self.secret.clone(),
        });
        Ok(())
    }
}
