//! # Adapters
//!
//! - `directory`: one `<user>.log` per user in a data directory
//! - `memory`: seeded in-memory logs for tests
//! - `second_factor`: verifier for deployments without U2F

pub mod directory;
pub mod memory;
pub mod second_factor;

pub use directory::DirectoryLogProvider;
pub use memory::MemoryLogProvider;
pub use second_factor::NoTokensVerifier;
