//! # Key Material
//!
//! [`SealedKey`] is what the event log knows about a user's key pair.
//! [`KeyMaterial`] adds the in-memory unlock state on top of it.

use std::fmt;

use kf_01_envelope::Envelope;
use kf_02_event_model::MasterPasswordChanged;
use shared_crypto::rsa_keys::{private_key_from_pem, public_key_from_pem, sha256_fingerprint};
use shared_crypto::{sha256, PasswordSealer, RsaPrivateKey, RsaPublicKey};
use tracing::{debug, info};

use super::errors::KeyMaterialError;
use crate::algorithms::export_private_key_with_password;

/// Appended to the sealed private key before hashing it into the MAC key.
pub const MAC_KEY_SUFFIX: [u8; 2] = [0xFF, 0x01];

/// A public key plus its password-sealed private key.
#[derive(Clone, PartialEq, Eq)]
pub struct SealedKey {
    public_key: RsaPublicKey,
    public_key_pem: String,
    private_key_encrypted: Vec<u8>,
}

impl SealedKey {
    /// Build from the fields of a `MasterPasswordChanged` event.
    ///
    /// # Errors
    ///
    /// Returns [`KeyMaterialError::Crypto`] if the public key PEM is malformed.
    pub fn from_pem(
        public_key_pem: &str,
        private_key_encrypted: Vec<u8>,
    ) -> Result<Self, KeyMaterialError> {
        Ok(Self {
            public_key: public_key_from_pem(public_key_pem)?,
            public_key_pem: public_key_pem.to_string(),
            private_key_encrypted,
        })
    }

    /// Build from an event payload.
    ///
    /// # Errors
    ///
    /// See [`SealedKey::from_pem`].
    pub fn from_event(event: &MasterPasswordChanged) -> Result<Self, KeyMaterialError> {
        Self::from_pem(&event.public_key, event.private_key_encrypted.clone())
    }

    /// The user's public key.
    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public_key
    }

    /// The public key as stored in the log.
    pub fn public_key_pem(&self) -> &str {
        &self.public_key_pem
    }

    /// Sealed private key bytes.
    pub fn private_key_encrypted(&self) -> &[u8] {
        &self.private_key_encrypted
    }

    /// Fingerprint naming this key in envelope slots.
    pub fn fingerprint(&self) -> String {
        sha256_fingerprint(&self.public_key)
    }

    /// Key for short export MACs: `sha256(private_key_encrypted ‖ FF 01)`.
    ///
    /// Changes whenever the master password changes, which invalidates
    /// every previously issued MAC.
    pub fn mac_key(&self) -> [u8; 32] {
        let mut input = Vec::with_capacity(self.private_key_encrypted.len() + MAC_KEY_SUFFIX.len());
        input.extend_from_slice(&self.private_key_encrypted);
        input.extend_from_slice(&MAC_KEY_SUFFIX);
        sha256(&input)
    }

    /// Open the private key with `password`.
    ///
    /// # Errors
    ///
    /// - `CryptoError::WrongPassword` if the password is wrong
    /// - [`KeyMaterialError::KeyMismatch`] if the sealed key does not belong
    ///   to the public key
    pub fn open(&self, password: &str) -> Result<RsaPrivateKey, KeyMaterialError> {
        let pem = PasswordSealer::with_password(password).open(&self.private_key_encrypted)?;
        let pem = std::str::from_utf8(&pem).map_err(|_| KeyMaterialError::NotUtf8)?;
        let private_key = private_key_from_pem(pem)?;

        if private_key.to_public_key() != self.public_key {
            return Err(KeyMaterialError::KeyMismatch);
        }
        Ok(private_key)
    }
}

impl fmt::Debug for SealedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SealedKey")
            .field("fingerprint", &self.fingerprint())
            .field("private_key_encrypted_len", &self.private_key_encrypted.len())
            .finish()
    }
}

/// A user's key pair, locked or unlocked.
#[derive(Clone)]
pub enum KeyMaterial {
    /// Only the public key is usable.
    Locked(SealedKey),
    /// The private key is held in memory.
    Unlocked {
        /// Persisted form.
        sealed: SealedKey,
        /// Opened private key.
        private_key: RsaPrivateKey,
    },
}

impl KeyMaterial {
    /// Install new sealed material.
    ///
    /// If `previous` is unlocked and holds the same public key (a password
    /// change), the result stays unlocked. Otherwise it starts locked.
    pub fn install(previous: Option<&KeyMaterial>, sealed: SealedKey) -> Self {
        match previous {
            Some(KeyMaterial::Unlocked {
                sealed: old,
                private_key,
            }) if old.public_key == sealed.public_key => {
                debug!("[kf-05] key material re-installed, staying unlocked");
                KeyMaterial::Unlocked {
                    sealed,
                    private_key: private_key.clone(),
                }
            }
            _ => KeyMaterial::Locked(sealed),
        }
    }

    /// Persisted form.
    pub fn sealed(&self) -> &SealedKey {
        match self {
            KeyMaterial::Locked(sealed) | KeyMaterial::Unlocked { sealed, .. } => sealed,
        }
    }

    /// The user's public key.
    pub fn public_key(&self) -> &RsaPublicKey {
        self.sealed().public_key()
    }

    /// Whether the private key is in memory.
    pub fn is_unlocked(&self) -> bool {
        matches!(self, KeyMaterial::Unlocked { .. })
    }

    /// The private key.
    ///
    /// # Errors
    ///
    /// Returns [`KeyMaterialError::Locked`] while locked.
    pub fn private_key(&self) -> Result<&RsaPrivateKey, KeyMaterialError> {
        match self {
            KeyMaterial::Unlocked { private_key, .. } => Ok(private_key),
            KeyMaterial::Locked(_) => Err(KeyMaterialError::Locked),
        }
    }

    /// Open the private key with `password` and keep it in memory.
    ///
    /// # Errors
    ///
    /// - [`KeyMaterialError::AlreadyUnlocked`] if already unlocked
    /// - `CryptoError::WrongPassword` if the password is wrong
    pub fn unlock(&mut self, password: &str) -> Result<(), KeyMaterialError> {
        let KeyMaterial::Locked(sealed) = self else {
            return Err(KeyMaterialError::AlreadyUnlocked);
        };
        let private_key = sealed.open(password)?;
        self.unlock_with(private_key)
    }

    /// Keep an already opened private key in memory.
    ///
    /// # Errors
    ///
    /// - [`KeyMaterialError::AlreadyUnlocked`] if already unlocked
    /// - [`KeyMaterialError::KeyMismatch`] if `private_key` belongs to
    ///   another public key
    pub fn unlock_with(&mut self, private_key: RsaPrivateKey) -> Result<(), KeyMaterialError> {
        let KeyMaterial::Locked(sealed) = self else {
            return Err(KeyMaterialError::AlreadyUnlocked);
        };
        if private_key.to_public_key() != sealed.public_key {
            return Err(KeyMaterialError::KeyMismatch);
        }
        let sealed = sealed.clone();

        info!(fingerprint = %sealed.fingerprint(), "[kf-05] decryption key unlocked");
        *self = KeyMaterial::Unlocked {
            sealed,
            private_key,
        };
        Ok(())
    }

    /// Forget the private key.
    pub fn seal(&mut self) {
        if let KeyMaterial::Unlocked { sealed, .. } = self {
            let sealed = sealed.clone();
            *self = KeyMaterial::Locked(sealed);
            info!("[kf-05] decryption key sealed");
        }
    }

    /// Encrypt `plaintext` for this user; works while locked.
    ///
    /// Returns the marshaled envelope.
    ///
    /// # Errors
    ///
    /// Returns [`KeyMaterialError::Envelope`] if sealing fails.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, KeyMaterialError> {
        let envelope = kf_01_envelope::encrypt(plaintext, std::slice::from_ref(self.public_key()))?;
        Ok(envelope.marshal())
    }

    /// Decrypt a marshaled envelope.
    ///
    /// # Errors
    ///
    /// - [`KeyMaterialError::Locked`] while locked
    /// - [`KeyMaterialError::Envelope`] if the envelope is malformed, of an
    ///   unknown version, or fails authentication
    pub fn decrypt(&self, envelope: &[u8]) -> Result<Vec<u8>, KeyMaterialError> {
        let private_key = self.private_key()?;
        Ok(Envelope::unmarshal(envelope)?.decrypt(private_key)?)
    }

    /// [`KeyMaterial::decrypt`] for text content.
    ///
    /// # Errors
    ///
    /// As `decrypt`, plus [`KeyMaterialError::NotUtf8`].
    pub fn decrypt_string(&self, envelope: &[u8]) -> Result<String, KeyMaterialError> {
        String::from_utf8(self.decrypt(envelope)?).map_err(|_| KeyMaterialError::NotUtf8)
    }

    /// Re-seal the unlocked private key under a new password.
    ///
    /// # Errors
    ///
    /// Returns [`KeyMaterialError::Locked`] while locked.
    pub fn change_password(
        &self,
        new_password: &str,
    ) -> Result<MasterPasswordChanged, KeyMaterialError> {
        export_private_key_with_password(self.private_key()?, new_password)
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("sealed", self.sealed())
            .field("unlocked", &self.is_unlocked())
            .finish()
    }
}

impl PartialEq for KeyMaterial {
    fn eq(&self, other: &Self) -> bool {
        self.sealed() == other.sealed() && self.is_unlocked() == other.is_unlocked()
    }
}
