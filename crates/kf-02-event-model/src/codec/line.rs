//! # Log Line Codec
//!
//! `<kind> <timestamp> <user id> <json>`, single spaces between the first
//! three fields. The user id may be empty, which yields two adjacent spaces.
//! Everything after the third space is the JSON payload verbatim.
//!
//! Timestamps are RFC 3339 in UTC with as many fractional digits as needed
//! (none, 3, 6 or 9), and any RFC 3339 offset is accepted on the way back.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::domain::{Event, EventCodecError, EventKind, EventMeta, EventPayload};

/// Serialize one event to a log line without the trailing newline.
///
/// # Errors
///
/// Returns [`EventCodecError::PayloadEncodeError`] if the payload does not
/// encode to JSON.
pub fn serialize(event: &Event) -> Result<String, EventCodecError> {
    let payload = event.payload.to_json()?;

    Ok(format!(
        "{} {} {} {}",
        event.kind().as_str(),
        event
            .meta
            .timestamp
            .to_rfc3339_opts(SecondsFormat::AutoSi, true),
        event.meta.user_id,
        payload
    ))
}

/// Parse one log line. A trailing `\n` or `\r\n` is ignored.
///
/// # Errors
///
/// - [`EventCodecError::MalformedLine`] if fields are missing
/// - [`EventCodecError::UnknownEventKind`] if the kind has no decoder
/// - [`EventCodecError::InvalidTimestamp`] if the timestamp is not RFC 3339
/// - [`EventCodecError::PayloadDecodeError`] if the JSON does not fit the kind
pub fn deserialize(line: &str) -> Result<Event, EventCodecError> {
    let line = line.trim_end_matches(['\n', '\r']);

    let mut fields = line.splitn(4, ' ');
    let (Some(kind), Some(timestamp), Some(user_id), Some(payload)) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(EventCodecError::MalformedLine("expected four fields"));
    };

    if kind.is_empty() || timestamp.is_empty() {
        return Err(EventCodecError::MalformedLine("empty kind or timestamp"));
    }
    if payload.is_empty() {
        return Err(EventCodecError::MalformedLine("empty payload"));
    }

    let kind: EventKind = kind.parse()?;

    let timestamp = DateTime::parse_from_rfc3339(timestamp)
        .map_err(|source| EventCodecError::InvalidTimestamp {
            value: timestamp.to_string(),
            source,
        })?
        .with_timezone(&Utc);

    let payload = EventPayload::from_json(kind, payload)?;

    Ok(Event {
        meta: EventMeta::new(timestamp, user_id),
        payload,
    })
}
