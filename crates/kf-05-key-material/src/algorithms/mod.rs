//! # Algorithms
//!
//! - [`export`]: sealing a private key under a password

pub mod export;

pub use export::export_private_key_with_password;
