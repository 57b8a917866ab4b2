//! # Outbound Ports (Driven Ports)
//!
//! Dependencies the event log requires from its host.

use kf_02_event_model::Event;

use crate::domain::LogStoreError;

/// Byte storage for one log.
///
/// Production: [`FileLogStore`](crate::FileLogStore)
/// Testing: [`InMemoryLogStore`](crate::InMemoryLogStore)
pub trait LogStore: Send {
    /// Entire stored content, in write order.
    fn read_all(&mut self) -> Result<String, LogStoreError>;

    /// Append `data` durably.
    ///
    /// ## Atomicity
    ///
    /// Either all of `data` is stored, or the store is left exactly as it
    /// was before the call.
    fn append(&mut self, data: &[u8]) -> Result<(), LogStoreError>;
}

/// Fold of events into state.
///
/// `Clone` is required: a batch is applied to a copy first, and the copy
/// replaces the live state only after the batch is durable.
pub trait Projector: Clone {
    /// Why an event could not be applied.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Apply one event.
    fn apply(&mut self, event: &Event) -> Result<(), Self::Error>;
}
