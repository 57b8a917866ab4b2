//! # Private Key Export
//!
//! Produces the payload of a `MasterPasswordChanged` event: the public key
//! in the clear and the private key sealed under a password.

use kf_02_event_model::MasterPasswordChanged;
use shared_crypto::rsa_keys::{private_key_to_pem, public_key_to_pem};
use shared_crypto::{PasswordSealer, RsaPrivateKey};

use crate::domain::KeyMaterialError;

/// Seal `private_key` under `password`.
///
/// # Errors
///
/// Returns [`KeyMaterialError::Crypto`] if PEM encoding or sealing fails.
pub fn export_private_key_with_password(
    private_key: &RsaPrivateKey,
    password: &str,
) -> Result<MasterPasswordChanged, KeyMaterialError> {
    let private_pem = private_key_to_pem(private_key)?;
    let public_key = public_key_to_pem(&private_key.to_public_key())?;

    let private_key_encrypted = PasswordSealer::with_password(password).seal(private_pem.as_bytes())?;

    Ok(MasterPasswordChanged {
        public_key,
        private_key_encrypted,
    })
}
