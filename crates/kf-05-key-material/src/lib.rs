//! # KF-05 Key Material
//!
//! Holds one user's asymmetric key pair and its lock state.
//!
//! **Subsystem ID:** 05
//!
//! ## States
//!
//! ```text
//!              MasterPasswordChanged
//!                      │
//!                      ▼
//!   ┌────────┐  unlock(password)  ┌──────────┐
//!   │ Locked │ ─────────────────► │ Unlocked │
//!   └────────┘ ◄───────────────── └──────────┘
//!                    seal()
//! ```
//!
//! The public key is always available, so anything can be *encrypted* for
//! the user at any time. Decryption needs the private key, which only exists
//! in memory after a successful unlock and is never written anywhere.
//!
//! ## Private key at rest
//!
//! | Part | Value |
//! |------|-------|
//! | Plaintext | PKCS#1 PEM of the private key |
//! | Sealing | `nonce(24) ‖ secretbox(PBKDF2-SHA256(password, nonce, 100 000))` |
//! | Wrong password | `decryption error. wrong password?` |
//!
//! ## Module Structure
//!
//! ```text
//! kf-05-key-material/
//! ├── domain/
//! │   ├── entities.rs   # SealedKey, KeyMaterial
//! │   └── errors.rs     # KeyMaterialError
//! └── algorithms/
//!     └── export.rs     # export_private_key_with_password
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithms;
pub mod domain;

// Re-exports
pub use algorithms::export_private_key_with_password;
pub use domain::{KeyMaterial, KeyMaterialError, SealedKey, MAC_KEY_SUFFIX};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
