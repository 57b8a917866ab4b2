//! # Short Keyed MACs
//!
//! A 64-bit tag (16 hex chars) over `key ‖ ":" ‖ message` with SHA-1, short
//! enough to embed in a URL. Used to authorise exporting an OTP secret.

use crate::CryptoError;
use sha1::{Digest, Sha1};
use subtle::ConstantTimeEq;

/// Hex characters kept from the digest.
const MAC_HEX_LEN: usize = 16;

/// A keyed MAC over one message.
pub struct ShortMac<'a> {
    key: &'a [u8],
    message: &'a str,
}

impl<'a> ShortMac<'a> {
    /// Bind a key to a message.
    pub fn new(key: &'a [u8], message: &'a str) -> Self {
        Self { key, message }
    }

    /// Compute the tag.
    pub fn sign(&self) -> String {
        let mut hasher = Sha1::new();
        hasher.update(self.key);
        hasher.update(b":");
        hasher.update(self.message.as_bytes());
        let mut tag = hex::encode(hasher.finalize());
        tag.truncate(MAC_HEX_LEN);
        tag
    }

    /// Check a tag supplied by a caller.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::MacValidationFailed` if the tag does not match.
    pub fn authenticate(&self, given: &str) -> Result<(), CryptoError> {
        let expected = self.sign();
        if bool::from(expected.as_bytes().ct_eq(given.as_bytes())) {
            Ok(())
        } else {
            Err(CryptoError::MacValidationFailed)
        }
    }
}
