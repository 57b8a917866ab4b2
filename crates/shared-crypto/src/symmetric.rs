//! # Symmetric Encryption
//!
//! NaCl secretbox (XSalsa20-Poly1305). Output of [`encrypt`] is
//! `tag ‖ ciphertext`, byte-compatible with `crypto_secretbox_easy`, so
//! envelopes written by other secretbox implementations open here.
//!
//! ## Security Properties
//!
//! - 192-bit nonce, safe to draw at random for every message
//! - Poly1305 authenticator verified before any plaintext is released

use crate::CryptoError;
use crypto_secretbox::{
    aead::{Aead, KeyInit},
    Key, XSalsa20Poly1305,
};
use zeroize::Zeroize;

/// Secretbox key length in bytes.
pub const KEY_LEN: usize = 32;

/// Secretbox nonce length in bytes.
pub const NONCE_LEN: usize = 24;

/// Poly1305 tag length in bytes.
pub const TAG_LEN: usize = 16;

/// Secret key (256-bit).
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct SecretKey([u8; KEY_LEN]);

impl SecretKey {
    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Create from a slice of exactly [`KEY_LEN`] bytes.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidKeyLength` on any other length.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let array: [u8; KEY_LEN] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidKeyLength {
                expected: KEY_LEN,
                actual: bytes.len(),
            })?;
        Ok(Self(array))
    }

    /// Generate random key.
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_LEN];
        rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut bytes);
        Self(bytes)
    }

    /// Get inner bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretKey(***)")
    }
}

/// Nonce for encryption.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Nonce([u8; NONCE_LEN]);

impl Nonce {
    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; NONCE_LEN]) -> Self {
        Self(bytes)
    }

    /// Read the nonce prefix of a `nonce ‖ ciphertext` blob.
    ///
    /// Returns the nonce and the remaining ciphertext.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::CiphertextTooShort` if the blob cannot hold a
    /// nonce and a tag.
    pub fn split_prefix(blob: &[u8]) -> Result<(Self, &[u8]), CryptoError> {
        if blob.len() < NONCE_LEN + TAG_LEN {
            return Err(CryptoError::CiphertextTooShort {
                minimum: NONCE_LEN + TAG_LEN,
                actual: blob.len(),
            });
        }
        let (nonce, rest) = blob.split_at(NONCE_LEN);
        let mut bytes = [0u8; NONCE_LEN];
        bytes.copy_from_slice(nonce);
        Ok((Self(bytes), rest))
    }

    /// Generate random nonce.
    pub fn generate() -> Self {
        let mut bytes = [0u8; NONCE_LEN];
        rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut bytes);
        Self(bytes)
    }

    /// Get inner bytes.
    pub fn as_bytes(&self) -> &[u8; NONCE_LEN] {
        &self.0
    }
}

/// Encrypt plaintext under a fresh random nonce.
///
/// Returns (ciphertext, nonce).
///
/// # Errors
///
/// Returns `CryptoError::EncryptionFailed` if encryption fails.
pub fn encrypt(key: &SecretKey, plaintext: &[u8]) -> Result<(Vec<u8>, Nonce), CryptoError> {
    let nonce = Nonce::generate();
    let ciphertext = encrypt_with_nonce(key, &nonce, plaintext)?;
    Ok((ciphertext, nonce))
}

/// Encrypt plaintext under a caller-chosen nonce.
///
/// The nonce must never repeat for the same key.
///
/// # Errors
///
/// Returns `CryptoError::EncryptionFailed` if encryption fails.
pub fn encrypt_with_nonce(
    key: &SecretKey,
    nonce: &Nonce,
    plaintext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let cipher = XSalsa20Poly1305::new(Key::from_slice(key.as_bytes()));

    cipher
        .encrypt(
            crypto_secretbox::Nonce::from_slice(nonce.as_bytes()),
            plaintext,
        )
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))
}

/// Decrypt and authenticate ciphertext.
///
/// # Errors
///
/// Returns `CryptoError::DecryptionFailed` if the key is wrong or the
/// ciphertext was modified.
pub fn decrypt(key: &SecretKey, ciphertext: &[u8], nonce: &Nonce) -> Result<Vec<u8>, CryptoError> {
    let cipher = XSalsa20Poly1305::new(Key::from_slice(key.as_bytes()));

    cipher
        .decrypt(
            crypto_secretbox::Nonce::from_slice(nonce.as_bytes()),
            ciphertext,
        )
        .map_err(|_| CryptoError::DecryptionFailed)
}
