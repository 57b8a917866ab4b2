//! # Algorithms
//!
//! - [`seal`]: envelope encryption and opening
//! - [`marshal`]: binary wire format

pub mod marshal;
pub mod seal;

pub use seal::{encrypt, encrypt_with};
