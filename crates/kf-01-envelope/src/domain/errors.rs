//! # Envelope Errors
//!
//! Opening failures that involve attacker-controllable bytes
//! ([`EnvelopeError::UnwrapFailed`], [`EnvelopeError::AuthenticationFailed`])
//! render identically, so callers cannot tell which stage rejected the input.

use thiserror::Error;

/// Envelope codec errors.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// `encrypt` was called without any recipient.
    #[error("envelope needs at least one recipient")]
    NoRecipients,

    /// No key slot is addressed to the given private key.
    #[error("no slot found for {kek_id}")]
    NoMatchingSlot {
        /// Fingerprint that was looked up.
        kek_id: String,
    },

    /// RSA-OAEP unwrap of the content key failed.
    #[error("decryption failed")]
    UnwrapFailed,

    /// The secretbox authenticator did not verify.
    #[error("decryption failed")]
    AuthenticationFailed,

    /// Wrapping the content key for a recipient failed.
    #[error("wrapping content key failed: {0}")]
    WrapFailed(String),

    /// Sealing the content failed.
    #[error("sealing content failed: {0}")]
    SealFailed(String),

    /// Marshaled envelope carries an unknown version tag.
    #[error("unsupported envelope version: {0}")]
    UnsupportedVersion(u64),

    /// Marshaled envelope is truncated or otherwise malformed.
    #[error("malformed envelope: {0}")]
    Malformed(&'static str),
}
