//! # Codec
//!
//! Text form of events in the log.

pub mod line;

pub use line::{deserialize, serialize};
