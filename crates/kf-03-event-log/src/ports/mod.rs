//! # Ports
//!
//! The event log drives two dependencies: where bytes are stored and what
//! the events are folded into.

pub mod outbound;

pub use outbound::{LogStore, Projector};
