//! # KF-01 Envelope Codec
//!
//! Multi-recipient envelope encryption for secret payloads at rest.
//!
//! **Subsystem ID:** 01
//! **Architecture:** Hexagonal (domain + algorithms)
//!
//! ## Purpose
//!
//! Every secret payload in the event log is sealed once under a random
//! 256-bit content key (the DEK). The DEK is then wrapped separately for each
//! recipient RSA public key (the KEKs). Any one recipient's private key is
//! enough to open the envelope.
//!
//! ## Algorithms
//!
//! | Step | Algorithm |
//! |------|-----------|
//! | Content sealing | XSalsa20-Poly1305 secretbox, 192-bit random nonce |
//! | Key wrapping | RSA-OAEP with SHA-256, no label |
//! | Slot naming | OpenSSH `SHA256:` fingerprint of the recipient public key |
//!
//! ## Wire Format
//!
//! ```text
//! uvarint(version = 1)
//! uvarint(len(content)) content            content = nonce ‖ secretbox
//! uvarint(slot_count)
//! { uvarint(len(kek_id)) kek_id uvarint(len(dek_encrypted)) dek_encrypted }*
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! kf-01-envelope/
//! ├── domain/          # Envelope, KeySlot, errors
//! └── algorithms/      # sealing/opening, binary marshal
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithms;
pub mod domain;

// Re-exports
pub use algorithms::{encrypt, encrypt_with};
pub use domain::{Envelope, EnvelopeError, KeySlot, ENVELOPE_VERSION};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
