//! # KF-06 Command Dispatch
//!
//! Turns named JSON commands into validated event batches, and serves the
//! queries that decrypt secrets.
//!
//! **Subsystem ID:** 06
//!
//! ## Request Lifecycle
//!
//! ```text
//! Decode ──► Validate ──► Invoke ──► Append ──► Project
//!  serde      pure,        reads      one        state swap
//!  JSON       no state     state,     batch,     after the
//!                          raises     durable    write
//!                          events
//! ```
//!
//! A failure at any step leaves the log and the state untouched. Nothing is
//! reported as done before the batch is on disk.
//!
//! ## Scopes
//!
//! | Scope | Runs against | Example |
//! |-------|--------------|---------|
//! | [`CommandScope::User`] | the signed-in user | `account.AddPassword` |
//! | [`CommandScope::SignIn`] | the user named in the input | `session.SignIn` |
//! | [`CommandScope::Register`] | a new user | `user.Create` |
//!
//! ## Module Structure
//!
//! ```text
//! kf-06-command-dispatch/
//! ├── adapters/         # directory and in-memory log providers, verifier
//! ├── commands/         # Command trait, COMMAND_REGISTRY, handlers
//! ├── domain/           # Ctx, errors, config, exposed secrets
//! ├── ports/            # LogProvider, SecondFactorVerifier
//! ├── queries.rs        # secret exposure
//! ├── service.rs        # Vault
//! └── storage.rs        # UserStorage
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod commands;
pub mod domain;
pub mod ports;
pub mod queries;
pub mod service;
pub mod storage;

// Re-exports
pub use adapters::{DirectoryLogProvider, MemoryLogProvider, NoTokensVerifier};
pub use commands::{
    get_command_info, get_commands_by_scope, is_command_supported, Command, CommandInfo,
    CommandScope, COMMAND_REGISTRY,
};
pub use domain::*;
pub use ports::{LogProvider, SecondFactorVerifier};
pub use service::{DispatchOutcome, Vault};
pub use storage::UserStorage;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
