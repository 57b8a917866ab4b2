//! # Shared Types Crate
//!
//! Identifiers, closed domain enums and the time port used by every Keyfold
//! component.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: every id and enum that appears inside a
//!   persisted event is defined here, so the event model, the projector and
//!   command dispatch agree on one spelling.
//! - **Opaque Ids**: ids are strings on the wire. Newtypes keep an account id
//!   from being passed where a folder id is expected.
//! - **Closed Enums**: secret kinds, external token kinds and secret usage
//!   types are exhaustive; unknown wire values fail to parse.

pub mod entities;
pub mod errors;
pub mod time;

pub use entities::*;
pub use errors::*;
pub use time::{FixedTimeSource, SystemTimeSource, TimeSource, Timestamp};
