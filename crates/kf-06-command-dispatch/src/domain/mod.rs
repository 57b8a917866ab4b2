//! Domain layer for command dispatch.

pub mod config;
pub mod context;
pub mod errors;
pub mod exposed;

pub use config::*;
pub use context::*;
pub use errors::*;
pub use exposed::*;
