//! # Shared Crypto - Vault Cryptographic Primitives
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `symmetric` | XSalsa20-Poly1305 (NaCl secretbox) | Content encryption |
//! | `hashing` | SHA-256, HMAC-SHA256 | Digests, MAC key derivation |
//! | `password` | PBKDF2-SHA256 (100k rounds) | Password-sealed blobs, stored password hashes |
//! | `pem` | RFC 1421 framing | Lenient PEM block decoding |
//! | `rsa_keys` | RSA, PKCS#1 PEM | Per-user key pairs, SSH public keys, fingerprints |
//! | `otp` | TOTP (RFC 6238) | OTP provisioning URL validation and proof codes |
//! | `mac` | SHA-1 keyed digest | Short URL-safe export MACs |
//! | `random` | OS CSPRNG | Generated passwords and key material |
//!
//! ## Security Properties
//!
//! - **secretbox**: 192-bit random nonce, authenticated; tag precedes ciphertext
//! - **PBKDF2**: 100 000 iterations; the nonce doubles as salt
//! - **Stored passwords**: compared in constant time
//! - **Key material**: symmetric keys zeroize on drop

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod hashing;
pub mod mac;
pub mod otp;
pub mod password;
pub mod pem;
pub mod random;
pub mod rsa_keys;
pub mod symmetric;

#[cfg(any(test, feature = "test-vectors"))]
pub mod test_vectors;

// Re-exports
pub use errors::CryptoError;
pub use hashing::{hmac_sha256, sha256};
pub use mac::ShortMac;
pub use otp::{OtpAlgorithm, OtpKey};
pub use password::{pbkdf2_sha256_100k, PasswordSealer, StoredPassword};
pub use pem::PemBlock;
pub use rsa_keys::{RsaPrivateKey, RsaPublicKey};
pub use symmetric::{decrypt, encrypt, encrypt_with_nonce, Nonce, SecretKey};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}
