//! # Event Log Errors

use std::io;

use kf_02_event_model::EventCodecError;
use thiserror::Error;

/// Storage backend failures.
#[derive(Debug, Error)]
pub enum LogStoreError {
    /// Underlying I/O failed.
    #[error("log storage I/O error: {0}")]
    Io(#[from] io::Error),

    /// Stored bytes are not UTF-8.
    #[error("log is not valid UTF-8")]
    InvalidUtf8,

    /// Write refused (test adapter only).
    #[error("append rejected by store")]
    Rejected,
}

/// Event log failures.
#[derive(Debug, Error)]
pub enum EventLogError {
    /// The store failed; nothing from the batch became visible.
    #[error(transparent)]
    Store(#[from] LogStoreError),

    /// A stored line does not decode. Fatal at replay.
    #[error("corrupt log entry at line {line}: {source}")]
    Corrupt {
        /// 1-based line number.
        line: usize,
        /// Decoder error.
        source: EventCodecError,
    },

    /// The last entry has no terminating newline (torn write).
    #[error("log ends with an unterminated entry")]
    TornTail,

    /// An event of the batch could not be serialized.
    #[error("event does not serialize: {0}")]
    Encode(#[source] EventCodecError),

    /// The projector rejected an event.
    #[error("projection failed at {position}: {source}")]
    Projection {
        /// 1-based position of the rejected event in the log.
        position: usize,
        /// Projector error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl EventLogError {
    /// Whether this error means the stored log cannot be trusted.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            EventLogError::Corrupt { .. } | EventLogError::TornTail
        )
    }
}
