//! # User Commands
//!
//! Registration, login password, access token, U2F tokens and the
//! decryption key.
//!
//! The login password and the decryption key password start out equal
//! (`user.Create` seals the key with the login password) but change
//! independently afterwards.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use kf_02_event_model::{
    DatabaseUnsealed, UserAccessTokenAdded, UserCreated, UserPasswordUpdated,
    UserU2fTokenRegistered,
};
use kf_05_key_material::{export_private_key_with_password, KeyMaterialError};
use serde::Deserialize;
use shared_crypto::rsa_keys::generate_private_key;
use shared_crypto::{random, StoredPassword};
use shared_types::random_id;
use tracing::info;

use super::Command;
use crate::domain::{CommandError, Ctx};

fn check_new_password(password: &str, repeat: &str) -> Result<(), CommandError> {
    if password.is_empty() {
        return Err(CommandError::Required("password"));
    }
    if password != repeat {
        return Err(CommandError::PasswordsDiffer);
    }
    Ok(())
}

/// `user.Create`. The new user's id is the event metadata's user id.
#[derive(Deserialize)]
pub struct Create {
    pub username: String,
    pub password: String,
    pub password_repeat: String,
}

impl Command for Create {
    fn validate(&self) -> Result<(), CommandError> {
        if self.username.is_empty() {
            return Err(CommandError::Required("username"));
        }
        check_new_password(&self.password, &self.password_repeat)
    }

    fn invoke(&self, ctx: &mut Ctx<'_>) -> Result<(), CommandError> {
        let id = ctx.meta().user_id.clone();
        let password_hash = StoredPassword::hash(&self.password);

        let private_key = generate_private_key(ctx.config().rsa_key_bits)?;
        let key_changed = export_private_key_with_password(&private_key, &self.password)?;

        info!(
            user = %id,
            bits = ctx.config().rsa_key_bits,
            "[kf-06] generated user key pair"
        );

        ctx.raise_event(UserCreated {
            id: id.clone(),
            username: self.username.clone(),
        });
        ctx.raise_event(UserPasswordUpdated {
            user: id,
            password: password_hash.as_str().to_string(),
            automatic_upgrade: false,
        });
        ctx.raise_event(key_changed);
        Ok(())
    }

    fn username(&self) -> Option<&str> {
        Some(&self.username)
    }
}

/// `user.ChangePassword`, the login password only.
#[derive(Deserialize)]
pub struct ChangePassword {
    pub password: String,
    pub password_repeat: String,
}

impl Command for ChangePassword {
    fn validate(&self) -> Result<(), CommandError> {
        check_new_password(&self.password, &self.password_repeat)
    }

    fn invoke(&self, ctx: &mut Ctx<'_>) -> Result<(), CommandError> {
        let user = ctx.meta().user_id.clone();
        ctx.raise_event(UserPasswordUpdated {
            user,
            password: StoredPassword::hash(&self.password).as_str().to_string(),
            automatic_upgrade: false,
        });
        Ok(())
    }
}

/// `user.AddAccessToken`
#[derive(Debug, Deserialize)]
pub struct AddAccessToken {
    #[serde(default)]
    pub description: String,
}

impl Command for AddAccessToken {
    fn invoke(&self, ctx: &mut Ctx<'_>) -> Result<(), CommandError> {
        let has_token = ctx
            .state()
            .user()
            .is_some_and(|user| user.access_token.is_some());
        if has_token {
            return Err(CommandError::AccessTokenExists);
        }

        let user = ctx.meta().user_id.clone();
        ctx.raise_event(UserAccessTokenAdded {
            user,
            token_id: random_id(),
            token: URL_SAFE_NO_PAD.encode(random::bytes::<16>()),
            description: self.description.clone(),
        });
        Ok(())
    }
}

/// `user.RegisterU2fToken`
///
/// Takes a registration the transport already verified against its
/// challenge; this command only records it.
#[derive(Debug, Deserialize)]
pub struct RegisterU2fToken {
    pub name: String,
    pub key_handle: String,
    #[serde(default)]
    pub registration_data: String,
    #[serde(default)]
    pub client_data: String,
    #[serde(default)]
    pub version: String,
}

impl Command for RegisterU2fToken {
    fn validate(&self) -> Result<(), CommandError> {
        if self.name.is_empty() {
            return Err(CommandError::Required("name"));
        }
        if self.key_handle.is_empty() {
            return Err(CommandError::Required("key_handle"));
        }
        Ok(())
    }

    fn invoke(&self, ctx: &mut Ctx<'_>) -> Result<(), CommandError> {
        if ctx.state().u2f_token(&self.key_handle).is_some() {
            return Err(CommandError::U2fTokenExists);
        }

        ctx.raise_event(UserU2fTokenRegistered {
            name: self.name.clone(),
            key_handle: self.key_handle.clone(),
            registration_data: self.registration_data.clone(),
            client_data: self.client_data.clone(),
            version: self.version.clone(),
        });
        Ok(())
    }
}

/// `user.UnlockDecryptionKey`
///
/// The opened private key is handed to the key material only after
/// `DatabaseUnsealed` is durable.
#[derive(Deserialize)]
pub struct UnlockDecryptionKey {
    pub password: String,
}

impl Command for UnlockDecryptionKey {
    fn invoke(&self, ctx: &mut Ctx<'_>) -> Result<(), CommandError> {
        let key_material = ctx.key_material()?;
        if key_material.is_unlocked() {
            return Err(CommandError::Unlock(KeyMaterialError::AlreadyUnlocked));
        }

        let private_key = key_material
            .sealed()
            .open(&self.password)
            .map_err(CommandError::Unlock)?;

        ctx.keep_unlocked(private_key);
        ctx.raise_event(DatabaseUnsealed {});
        Ok(())
    }
}

/// `user.ChangeDecryptionKeyPassword`. Needs the key unlocked.
#[derive(Deserialize)]
pub struct ChangeDecryptionKeyPassword {
    pub new_password: String,
    pub new_password_repeat: String,
}

impl Command for ChangeDecryptionKeyPassword {
    fn validate(&self) -> Result<(), CommandError> {
        check_new_password(&self.new_password, &self.new_password_repeat)
    }

    fn invoke(&self, ctx: &mut Ctx<'_>) -> Result<(), CommandError> {
        let changed = ctx.key_material()?.change_password(&self.new_password)?;
        ctx.raise_event(changed);
        Ok(())
    }
}
