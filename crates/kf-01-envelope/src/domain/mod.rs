//! # Domain Module
//!
//! Envelope data types and errors.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
