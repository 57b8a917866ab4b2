//! # Domain Module
//!
//! Key material states and errors.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
