//! # Domain Module
//!
//! Event types and codec errors.

pub mod errors;
pub mod events;
pub mod payloads;

pub use errors::*;
pub use events::*;
pub use payloads::*;
