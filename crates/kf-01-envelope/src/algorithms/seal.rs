//! # Envelope Sealing
//!
//! Content is sealed once; the content key is wrapped per recipient with
//! RSA-OAEP-SHA256.

use rsa::Oaep;
use sha2::Sha256;
use shared_crypto::rsa_keys::sha256_fingerprint;
use shared_crypto::symmetric::{self, Nonce, SecretKey};
use shared_crypto::{RsaPrivateKey, RsaPublicKey};
use zeroize::Zeroizing;

use crate::domain::{Envelope, EnvelopeError, KeySlot};

/// Seal `plaintext` for every recipient under a fresh content key and nonce.
///
/// # Errors
///
/// - [`EnvelopeError::NoRecipients`] if `recipients` is empty
/// - [`EnvelopeError::WrapFailed`] if RSA wrapping fails for a recipient
pub fn encrypt(plaintext: &[u8], recipients: &[RsaPublicKey]) -> Result<Envelope, EnvelopeError> {
    encrypt_with(plaintext, recipients, SecretKey::generate(), Nonce::generate())
}

/// Seal with a caller-supplied content key and nonce.
///
/// Deterministic in the content part, which makes known-answer tests possible.
/// The RSA wrapping is still randomized.
pub fn encrypt_with(
    plaintext: &[u8],
    recipients: &[RsaPublicKey],
    dek: SecretKey,
    nonce: Nonce,
) -> Result<Envelope, EnvelopeError> {
    if recipients.is_empty() {
        return Err(EnvelopeError::NoRecipients);
    }

    let sealed = symmetric::encrypt_with_nonce(&dek, &nonce, plaintext)
        .map_err(|e| EnvelopeError::SealFailed(e.to_string()))?;

    let mut encrypted_content = Vec::with_capacity(nonce.as_bytes().len() + sealed.len());
    encrypted_content.extend_from_slice(nonce.as_bytes());
    encrypted_content.extend_from_slice(&sealed);

    let mut rng = rand::thread_rng();
    let key_slots = recipients
        .iter()
        .map(|recipient| {
            let dek_encrypted = recipient
                .encrypt(&mut rng, Oaep::new::<Sha256>(), dek.as_bytes())
                .map_err(|e| EnvelopeError::WrapFailed(e.to_string()))?;

            Ok(KeySlot {
                kek_id: sha256_fingerprint(recipient),
                dek_encrypted,
            })
        })
        .collect::<Result<Vec<_>, EnvelopeError>>()?;

    Ok(Envelope {
        key_slots,
        encrypted_content,
    })
}

impl Envelope {
    /// Open the envelope with one recipient's private key.
    ///
    /// # Errors
    ///
    /// - [`EnvelopeError::NoMatchingSlot`] if no slot is addressed to `key`
    /// - [`EnvelopeError::UnwrapFailed`] / [`EnvelopeError::AuthenticationFailed`]
    ///   on any tampering or key mismatch
    pub fn decrypt(&self, key: &RsaPrivateKey) -> Result<Vec<u8>, EnvelopeError> {
        let kek_id = sha256_fingerprint(&key.to_public_key());

        let slot = self
            .slot_for(&kek_id)
            .ok_or(EnvelopeError::NoMatchingSlot { kek_id })?;

        let dek_bytes = Zeroizing::new(
            key.decrypt(Oaep::new::<Sha256>(), &slot.dek_encrypted)
                .map_err(|_| EnvelopeError::UnwrapFailed)?,
        );
        let dek = SecretKey::from_slice(&dek_bytes).map_err(|_| EnvelopeError::UnwrapFailed)?;

        let (nonce, body) = Nonce::split_prefix(&self.encrypted_content)
            .map_err(|_| EnvelopeError::AuthenticationFailed)?;

        symmetric::decrypt(&dek, body, &nonce).map_err(|_| EnvelopeError::AuthenticationFailed)
    }
}
