//! # Keyfold Test Suite
//!
//! Flows that cross subsystem boundaries. Single-crate behavior is tested
//! next to the code.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── envelope_flows.rs   # envelopes shared between key materials
//!     ├── replay.rs           # file-backed logs, replay and batch boundaries
//!     └── vault_flows.rs      # commands and queries through the vault
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p kf-tests
//! cargo test -p kf-tests integration::replay::
//! ```

pub mod integration;
