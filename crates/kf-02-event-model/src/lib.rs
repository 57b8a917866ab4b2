//! # KF-02 Event Model
//!
//! The closed set of domain events a user's vault is built from, and the
//! one-line text form they take in the event log.
//!
//! **Subsystem ID:** 02
//!
//! ## Event Families
//!
//! | Family | Kinds |
//! |--------|-------|
//! | User | `UserCreated`, `UserPasswordUpdated`, `UserAccessTokenAdded`, `UserU2fTokenRegistered`, `UserU2fTokenUsed` |
//! | Keys & sessions | `MasterPasswordChanged`, `DatabaseUnsealed`, `SessionSignedIn` |
//! | Folders | `FolderCreated`, `FolderMoved`, `FolderRenamed`, `FolderDeleted` |
//! | Accounts | `AccountCreated`, `AccountRenamed`, `AccountUsernameChanged`, `AccountUrlChanged`, `AccountDescriptionChanged`, `AccountMoved`, `AccountDeleted` |
//! | Secrets | `PasswordAdded`, `SecretNoteAdded`, `OtpTokenAdded`, `KeylistAdded`, `SshKeyAdded`, `ExternalTokenAdded`, `SecretDeleted`, `SecretUsed` |
//!
//! ## Log Line
//!
//! ```text
//! <kind> <RFC 3339 timestamp> <user id, may be empty> <JSON payload>
//! ```
//!
//! [`EventPayload`] is a plain Rust enum, so every `match` over it (the
//! projector, the serializer) is checked for exhaustiveness by the compiler.
//!
//! ## Module Structure
//!
//! ```text
//! kf-02-event-model/
//! ├── domain/
//! │   ├── events.rs    # Event, EventMeta, EventPayload, EventKind
//! │   ├── payloads.rs  # one struct per event kind
//! │   └── errors.rs    # EventCodecError
//! └── codec/
//!     └── line.rs      # serialize / deserialize
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod domain;

pub use codec::{deserialize, serialize};
pub use domain::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
