//! # Domain Module
//!
//! Projected entities, the per-user state and projection errors.

pub mod entities;
pub mod errors;
pub mod state;

pub use entities::*;
pub use errors::*;
pub use state::*;
