//! # Adapters
//!
//! - `file`: one append-only file per user
//! - `memory`: in-memory store for tests
//! - `lock`: exclusive lock on the data directory (feature `locking`)

pub mod file;
#[cfg(feature = "locking")]
pub mod lock;
pub mod memory;

pub use file::FileLogStore;
#[cfg(feature = "locking")]
pub use lock::{DataDirLock, LockError};
pub use memory::InMemoryLogStore;
