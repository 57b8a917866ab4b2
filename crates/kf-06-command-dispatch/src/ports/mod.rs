//! Ports layer for command dispatch.

pub mod outbound;

pub use outbound::*;
