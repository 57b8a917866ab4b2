//! # Event Codec Errors

use thiserror::Error;

/// Failures turning a log line back into an [`Event`](crate::Event).
#[derive(Debug, Error)]
pub enum EventCodecError {
    /// The line does not have the four space-separated fields.
    #[error("malformed log line: {0}")]
    MalformedLine(&'static str),

    /// The timestamp field is not RFC 3339.
    #[error("invalid timestamp {value}: {source}")]
    InvalidTimestamp {
        /// Raw timestamp field.
        value: String,
        /// Parser error.
        source: chrono::ParseError,
    },

    /// No decoder is registered for this kind.
    #[error("unknown event kind: {0}")]
    UnknownEventKind(String),

    /// The JSON payload does not match the kind's schema.
    #[error("payload of {kind} does not decode: {source}")]
    PayloadDecodeError {
        /// Kind whose payload failed.
        kind: &'static str,
        /// JSON error.
        source: serde_json::Error,
    },

    /// The payload could not be encoded.
    #[error("payload of {kind} does not encode: {source}")]
    PayloadEncodeError {
        /// Kind whose payload failed.
        kind: &'static str,
        /// JSON error.
        source: serde_json::Error,
    },
}
