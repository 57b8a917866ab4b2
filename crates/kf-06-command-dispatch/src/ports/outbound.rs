//! # Outbound Ports (Driven Ports)
//!
//! What the vault needs from its host. Time comes through
//! [`TimeSource`](shared_types::TimeSource).

use kf_03_event_log::{LogStore, LogStoreError};
use kf_04_state_projector::U2fToken;
use shared_types::UserId;

use crate::domain::{SecondFactorProof, VerifiedUse};

/// Where per-user logs live.
///
/// Production: [`DirectoryLogProvider`](crate::DirectoryLogProvider)
/// Testing: [`MemoryLogProvider`](crate::MemoryLogProvider)
pub trait LogProvider: Send + Sync {
    /// Store type of one user's log.
    type Store: LogStore + 'static;

    /// Users that have a log, in any order.
    fn existing_users(&self) -> Result<Vec<UserId>, LogStoreError>;

    /// Open (creating if needed) the log of `user`.
    fn open(&self, user: &UserId) -> Result<Self::Store, LogStoreError>;
}

/// Checks second-factor proofs before secrets are exposed.
///
/// Challenge issuing and signature checking live with the transport; this
/// port only answers whether a proof is good for one of `tokens`.
pub trait SecondFactorVerifier: Send + Sync {
    /// `Ok(Some(_))` for a verified token use, `Ok(None)` when no second
    /// factor is needed, `Err(reason)` when the proof is refused.
    fn verify(
        &self,
        tokens: &[U2fToken],
        proof: &SecondFactorProof,
    ) -> Result<Option<VerifiedUse>, String>;
}
