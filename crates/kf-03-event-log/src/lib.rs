//! # KF-03 Event Log
//!
//! Append-only, per-user log of serialized events. The log is the only
//! durable state: all in-memory state is rebuilt by replaying it on open.
//!
//! **Subsystem ID:** 03
//! **Architecture:** Hexagonal (ports + adapters)
//!
//! ## Guarantees
//!
//! | Guarantee | How |
//! |-----------|-----|
//! | Batch atomicity | the batch is projected on a copy of the state, written with one `write_all` + `sync_data`, and the copy is swapped in only after the write succeeds |
//! | Order | entries reach the projector in write order, never skipped |
//! | Replay | `open` feeds every stored line to the projector before any append |
//! | Fail-stop | an undecodable line or a rejected event during replay aborts `open` |
//! | Empty batch | no-op, nothing is written |
//!
//! ## Module Structure
//!
//! ```text
//! kf-03-event-log/
//! ├── domain/          # errors
//! ├── ports/
//! │   └── outbound.rs  # LogStore, Projector
//! ├── adapters/
//! │   ├── file.rs      # FileLogStore (one file per user)
//! │   ├── memory.rs    # InMemoryLogStore (tests)
//! │   └── lock.rs      # DataDirLock (feature "locking")
//! └── service.rs       # EventLog
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use adapters::{FileLogStore, InMemoryLogStore};
#[cfg(feature = "locking")]
pub use adapters::{DataDirLock, LockError};
pub use domain::{EventLogError, LogStoreError};
pub use ports::{LogStore, Projector};
pub use service::EventLog;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
