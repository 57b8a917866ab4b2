//! # Password-Based Cryptography
//!
//! Two uses of PBKDF2-SHA256 at 100 000 iterations:
//!
//! - [`PasswordSealer`]: encrypts a blob (the user's private key PEM) under a
//!   password. Layout is `nonce(24) ‖ secretbox(key, nonce, plaintext)` where
//!   `key = PBKDF2(password, salt = nonce)`.
//! - [`StoredPassword`]: one-way login password hashes in the textual form
//!   `$pbkdf2-sha256-100k$<salt>$<hash>` (URL-safe base64, no padding).

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::symmetric::{self, Nonce, SecretKey, KEY_LEN};
use crate::CryptoError;

/// PBKDF2 iteration count for every password-derived key.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

const STORED_PASSWORD_ALGORITHM: &str = "pbkdf2-sha256-100k";
const STORED_PASSWORD_SALT_LEN: usize = 32;

/// Derive a 256-bit key from a password with PBKDF2-SHA256, 100k iterations.
pub fn pbkdf2_sha256_100k(password: &[u8], salt: &[u8]) -> [u8; KEY_LEN] {
    let mut out = [0u8; KEY_LEN];
    pbkdf2::pbkdf2_hmac::<Sha256>(password, salt, PBKDF2_ITERATIONS, &mut out);
    out
}

/// Seals and opens blobs under a password.
pub struct PasswordSealer {
    password: Zeroizing<String>,
}

impl PasswordSealer {
    /// Bind a password.
    pub fn with_password(password: &str) -> Self {
        Self {
            password: Zeroizing::new(password.to_string()),
        }
    }

    /// Encrypt under a fresh random nonce/salt.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::EncryptionFailed` if sealing fails.
    pub fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        self.seal_with_nonce(&Nonce::generate(), plaintext)
    }

    /// Encrypt under a caller-chosen nonce/salt.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::EncryptionFailed` if sealing fails.
    pub fn seal_with_nonce(&self, nonce: &Nonce, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let key = self.derive(nonce);
        let ciphertext = symmetric::encrypt_with_nonce(&key, nonce, plaintext)?;

        let mut sealed = Vec::with_capacity(nonce.as_bytes().len() + ciphertext.len());
        sealed.extend_from_slice(nonce.as_bytes());
        sealed.extend_from_slice(&ciphertext);
        Ok(sealed)
    }

    /// Decrypt a blob produced by [`PasswordSealer::seal`].
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::WrongPassword` if the password is wrong or the
    /// blob is damaged, `CryptoError::CiphertextTooShort` if it is truncated.
    pub fn open(&self, sealed: &[u8]) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
        let (nonce, ciphertext) = Nonce::split_prefix(sealed)?;
        let key = self.derive(&nonce);
        symmetric::decrypt(&key, ciphertext, &nonce)
            .map(Zeroizing::new)
            .map_err(|_| CryptoError::WrongPassword)
    }

    fn derive(&self, nonce: &Nonce) -> SecretKey {
        SecretKey::from_bytes(pbkdf2_sha256_100k(
            self.password.as_bytes(),
            nonce.as_bytes(),
        ))
    }
}

/// A login password hash, safe to persist in the event log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPassword(String);

impl StoredPassword {
    /// Hash a plaintext password under a fresh random salt.
    pub fn hash(password: &str) -> Self {
        let mut salt = [0u8; STORED_PASSWORD_SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        Self::hash_with_salt(password, &salt)
    }

    fn hash_with_salt(password: &str, salt: &[u8]) -> Self {
        let derived = pbkdf2_sha256_100k(password.as_bytes(), salt);
        Self(format!(
            "${}${}${}",
            STORED_PASSWORD_ALGORITHM,
            URL_SAFE_NO_PAD.encode(salt),
            URL_SAFE_NO_PAD.encode(derived)
        ))
    }

    /// Wrap a previously persisted hash.
    pub fn from_stored(stored: impl Into<String>) -> Self {
        Self(stored.into())
    }

    /// Textual form for persistence.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check a plaintext password against this hash in constant time.
    ///
    /// Returns `Ok(false)` on mismatch.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::UnsupportedStoredPassword` if the hash is not in a
    /// recognised format.
    pub fn verify(&self, password: &str) -> Result<bool, CryptoError> {
        let mut parts = self.0.split('$');
        let (Some(""), Some(algorithm), Some(salt), Some(hash), None) = (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        ) else {
            return Err(CryptoError::UnsupportedStoredPassword);
        };
        if algorithm != STORED_PASSWORD_ALGORITHM {
            return Err(CryptoError::UnsupportedStoredPassword);
        }

        let salt = URL_SAFE_NO_PAD
            .decode(salt)
            .map_err(|_| CryptoError::UnsupportedStoredPassword)?;
        let expected = URL_SAFE_NO_PAD
            .decode(hash)
            .map_err(|_| CryptoError::UnsupportedStoredPassword)?;

        let derived = pbkdf2_sha256_100k(password.as_bytes(), &salt);
        Ok(bool::from(derived.as_slice().ct_eq(&expected)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pbkdf2_sha256_100k_derive() {
        assert_eq!(
            hex::encode(pbkdf2_sha256_100k(
                b"hunter2",
                &[0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]
            )),
            "fc970d4cd9541ea4520daaea54dcd0dde0f5c4dcb4f70aabf7625df8e012da79"
        );

        // changing salt changes result
        assert_eq!(
            hex::encode(pbkdf2_sha256_100k(
                b"hunter2",
                &[0xAB, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]
            )),
            "f0196fb714d753071904eb4128c59704b631e8e00f7f1799ca454ac7c4a34437"
        );

        // changing password changes result
        assert_eq!(
            hex::encode(pbkdf2_sha256_100k(
                b"hunter1",
                &[0xAB, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]
            )),
            "3876c39131f03ab1dfdc0b3f3af06a3477436a65cd2b7e8cc6d396b9ee0e33cb"
        );
    }

    #[test]
    fn test_seal_and_open() {
        let nonce = Nonce::from_bytes([
            0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D,
            0x0E, 0x0F, 0x10, 0x11, 0x12, 0x13, 0x24, 0x25, 0x26, 0x27,
        ]);
        let sealed = PasswordSealer::with_password("hunter2")
            .seal_with_nonce(&nonce, b"the germans are coming")
            .unwrap();

        assert_eq!(&sealed[..24], nonce.as_bytes());

        let err = PasswordSealer::with_password("incorrect")
            .open(&sealed)
            .unwrap_err();
        assert_eq!(err.to_string(), "decryption error. wrong password?");

        let plaintext = PasswordSealer::with_password("hunter2")
            .open(&sealed)
            .unwrap();
        assert_eq!(plaintext.as_slice(), b"the germans are coming");
    }

    #[test]
    fn test_open_truncated() {
        let result = PasswordSealer::with_password("x").open(&[0u8; 10]);
        assert!(matches!(result, Err(CryptoError::CiphertextTooShort { .. })));
    }

    #[test]
    fn test_stored_password_verify() {
        let stored = StoredPassword::hash("myMasterPassword");
        assert!(stored.as_str().starts_with("$pbkdf2-sha256-100k$"));

        let reloaded = StoredPassword::from_stored(stored.as_str());
        assert!(reloaded.verify("myMasterPassword").unwrap());
        assert!(!reloaded.verify("myMasterPassword2").unwrap());
    }

    #[test]
    fn test_stored_password_salted() {
        assert_ne!(StoredPassword::hash("same"), StoredPassword::hash("same"));
    }

    #[test]
    fn test_stored_password_known_salt() {
        let stored = StoredPassword::hash_with_salt("hunter2", &[0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]);
        assert_eq!(
            stored.as_str(),
            format!(
                "$pbkdf2-sha256-100k$qrvM3e7_${}",
                URL_SAFE_NO_PAD.encode(
                    hex::decode("fc970d4cd9541ea4520daaea54dcd0dde0f5c4dcb4f70aabf7625df8e012da79")
                        .unwrap()
                )
            )
        );
    }

    #[test]
    fn test_stored_password_existing_hash() {
        let stored = StoredPassword::from_stored(
            "$pbkdf2-sha256-100k$_Ui6aWQtIAzyqL0nhzxZktjIpKh4KzuM4EzDRV8Ew-s$u1Yv0UYexUqpn6MtiZ_Obv7foqayElMc4_lWXX2DhV8",
        );

        assert!(stored.verify("nimda").unwrap());
        assert!(!stored.verify("admin").unwrap());
    }

    #[test]
    fn test_stored_password_unknown_format() {
        for bad in ["", "plaintext", "$md5$abc$def", "$pbkdf2-sha256-100k$!!$??"] {
            assert!(matches!(
                StoredPassword::from_stored(bad).verify("x"),
                Err(CryptoError::UnsupportedStoredPassword)
            ));
        }
    }
}
