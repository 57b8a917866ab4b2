//! # KF-04 State Projector
//!
//! Folds a user's ordered events into [`UserState`] and answers read-only
//! queries over it.
//!
//! **Subsystem ID:** 04
//!
//! ## Rules
//!
//! | Events | Effect |
//! |--------|--------|
//! | `User*` | user record, password hash, access token, U2F tokens |
//! | `MasterPasswordChanged` | installs key material, derives the MAC key, audits |
//! | `DatabaseUnsealed`, `SessionSignedIn`, `SecretUsed` | audit only |
//! | `Folder*` | folder tree; no cascading delete |
//! | `Account*` | account map |
//! | `*Added` | appends one secret to the owning account |
//! | `SecretDeleted` | removes exactly one secret |
//!
//! A reference to a missing entity is a [`ProjectionError`]. The event log
//! treats it as fatal: the log and the projector disagree, and running on
//! would mean running on wrong state.
//!
//! The audit log keeps the newest [`AUDIT_LOG_CAPACITY`] entries, newest
//! first.
//!
//! ## Module Structure
//!
//! ```text
//! kf-04-state-projector/
//! ├── domain/
//! │   ├── entities.rs   # User, Folder, Account, Secret, SecretPayload, ...
//! │   ├── errors.rs     # ProjectionError
//! │   └── state.rs      # UserState
//! ├── projection.rs     # impl Projector for UserState
//! └── queries.rs        # folder views, search, listings
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod domain;
pub mod projection;
pub mod queries;

#[cfg(test)]
mod fixtures;

// Re-exports
pub use domain::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
