//! # Event Log Service
//!
//! Owns a [`LogStore`] and the [`Projector`] fed from it.
//!
//! ## Append flow
//!
//! ```text
//! events ──serialize──► lines
//!    │
//!    └──apply──► projector copy
//!                     │
//!         store.append(lines) ok?
//!          ├─ yes ─► copy becomes the live state
//!          └─ no ──► copy dropped, live state untouched
//! ```

use kf_02_event_model::{deserialize, serialize, Event};
use tracing::{debug, info};

use crate::domain::EventLogError;
use crate::ports::{LogStore, Projector};

/// Append-only event log with its projected state.
pub struct EventLog<S: LogStore, P: Projector> {
    store: S,
    projector: P,
    entries: usize,
}

impl<S: LogStore, P: Projector> EventLog<S, P> {
    /// Open the log and replay every stored entry into `projector`.
    ///
    /// # Errors
    ///
    /// Any undecodable line, unterminated tail or event the projector
    /// rejects aborts the open. Running with a partial replay is never an
    /// option.
    pub fn open(mut store: S, mut projector: P) -> Result<Self, EventLogError> {
        let contents = store.read_all()?;

        if !contents.is_empty() && !contents.ends_with('\n') {
            return Err(EventLogError::TornTail);
        }

        let mut entries = 0;
        for (index, line) in contents.lines().enumerate() {
            let position = index + 1;

            let event = deserialize(line).map_err(|source| EventLogError::Corrupt {
                line: position,
                source,
            })?;

            projector
                .apply(&event)
                .map_err(|e| EventLogError::Projection {
                    position,
                    source: Box::new(e),
                })?;

            entries += 1;
        }

        info!(entries, "[kf-03] replayed event log");

        Ok(Self {
            store,
            projector,
            entries,
        })
    }

    /// Durably append `events` as one all-or-nothing batch.
    ///
    /// An empty batch writes nothing and leaves the state untouched.
    ///
    /// # Errors
    ///
    /// On any error neither the store nor the projected state changes.
    pub fn append(&mut self, events: &[Event]) -> Result<(), EventLogError> {
        if events.is_empty() {
            return Ok(());
        }

        let mut batch = String::new();
        for event in events {
            batch.push_str(&serialize(event).map_err(EventLogError::Encode)?);
            batch.push('\n');
        }

        let mut next = self.projector.clone();
        for (offset, event) in events.iter().enumerate() {
            next.apply(event).map_err(|e| EventLogError::Projection {
                position: self.entries + offset + 1,
                source: Box::new(e),
            })?;
        }

        self.store.append(batch.as_bytes())?;

        self.projector = next;
        self.entries += events.len();

        debug!(
            appended = events.len(),
            entries = self.entries,
            "[kf-03] batch appended"
        );

        Ok(())
    }

    /// Current projected state.
    pub fn state(&self) -> &P {
        &self.projector
    }

    /// Mutable access for in-memory state that is never logged
    /// (for example an unlocked decryption key).
    pub fn state_mut(&mut self) -> &mut P {
        &mut self.projector
    }

    /// Number of entries in the log.
    pub fn len(&self) -> usize {
        self.entries
    }

    /// Whether the log has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }
}
