//! Crypto error types.

use thiserror::Error;

/// Cryptographic operation errors.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Encryption failed
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Authenticated decryption failed. Deliberately carries no detail:
    /// a wrong key and a corrupted ciphertext look the same.
    #[error("Decryption failed")]
    DecryptionFailed,

    /// A password-sealed blob did not open.
    #[error("decryption error. wrong password?")]
    WrongPassword,

    /// Ciphertext shorter than its fixed-size prefix.
    #[error("Ciphertext too short: need at least {minimum} bytes, got {actual}")]
    CiphertextTooShort {
        /// Minimum length in bytes
        minimum: usize,
        /// Actual length in bytes
        actual: usize,
    },

    /// Invalid key length
    #[error("Invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected key length in bytes
        expected: usize,
        /// Actual key length in bytes
        actual: usize,
    },

    /// Invalid public key
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    /// Invalid private key
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// Key generation failed
    #[error("Key generation failed: {0}")]
    KeyGenerationFailed(String),

    /// PEM encoding failed
    #[error("PEM encoding failed: {0}")]
    PemEncoding(String),

    /// OTP provisioning URL unusable
    #[error("invalid OTP provisioning URL: {0}")]
    InvalidOtpUrl(String),

    /// Stored password hash in an unknown format
    #[error("unsupported stored password format")]
    UnsupportedStoredPassword,

    /// Short MAC did not match
    #[error("mac validation failed")]
    MacValidationFailed,

    /// Invalid input for cryptographic operation
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
