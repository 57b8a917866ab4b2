//! Key material errors.

use kf_01_envelope::EnvelopeError;
use shared_crypto::CryptoError;
use thiserror::Error;

/// Errors from key material operations.
#[derive(Debug, Error)]
pub enum KeyMaterialError {
    /// The operation needs the private key and it is not unlocked.
    #[error("decryption key locked")]
    Locked,

    /// `unlock` called on an already unlocked key.
    #[error("already unlocked")]
    AlreadyUnlocked,

    /// The sealed private key opened but belongs to a different public key.
    #[error("private key does not match the installed public key")]
    KeyMismatch,

    /// Decrypted bytes were expected to be text.
    #[error("decrypted content is not valid UTF-8")]
    NotUtf8,

    /// Wrong password, malformed PEM and other primitive failures.
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// Envelope sealing or opening failed.
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),
}
