//! # PEM Framing
//!
//! Lenient reader for RFC 1421-style PEM blocks. Unlike strict RFC 7468
//! decoders it accepts any base64 line width and surfaces the legacy
//! `Proc-Type`/`DEK-Info` headers, which is how password-protected
//! OpenSSL keys announce themselves.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::CryptoError;

const BEGIN: &str = "-----BEGIN ";
const END: &str = "-----END ";
const DASHES: &str = "-----";

/// One decoded PEM block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PemBlock {
    /// Label between `BEGIN ` and the closing dashes, e.g. `RSA PRIVATE KEY`.
    pub label: String,
    /// RFC 1421 headers in order of appearance.
    pub headers: Vec<(String, String)>,
    /// Decoded body.
    pub contents: Vec<u8>,
}

impl PemBlock {
    /// Decode the first PEM block in `input`.
    ///
    /// Returns the block and everything after its END line (the END line's own
    /// line terminator is consumed). Data before the BEGIN line is skipped.
    /// Returns `None` if no well-formed block is found.
    pub fn decode(input: &str) -> Option<(PemBlock, &str)> {
        let begin_at = find_line_start(input, BEGIN)?;
        let after_begin = &input[begin_at + BEGIN.len()..];
        let (label_line, mut body) = split_line(after_begin);
        let label = label_line.trim_end().strip_suffix(DASHES)?.to_string();

        let mut headers = Vec::new();
        loop {
            let (line, next) = split_line(body);
            if let Some((key, value)) = line.split_once(':') {
                headers.push((key.trim().to_string(), value.trim().to_string()));
                body = next;
                continue;
            }
            if !headers.is_empty() && line.trim().is_empty() {
                body = next;
            }
            break;
        }

        let end_marker = format!("{END}{label}{DASHES}");
        let mut encoded = String::new();
        let mut rest = body;
        loop {
            if rest.is_empty() {
                return None;
            }
            let (line, next) = split_line(rest);
            let trimmed = line.trim();
            if trimmed == end_marker {
                rest = next;
                break;
            }
            if trimmed.starts_with(DASHES) {
                return None;
            }
            encoded.push_str(trimmed);
            rest = next;
        }

        let contents = STANDARD.decode(encoded.as_bytes()).ok()?;
        Some((
            PemBlock {
                label,
                headers,
                contents,
            },
            rest,
        ))
    }

    /// Decode a block and require the expected label.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidInput` if no block is found or the label
    /// differs.
    pub fn decode_labelled(input: &str, label: &str) -> Result<PemBlock, CryptoError> {
        let (block, _) = Self::decode(input)
            .ok_or_else(|| CryptoError::InvalidInput("no PEM block found".to_string()))?;
        if block.label != label {
            return Err(CryptoError::InvalidInput(format!(
                "expected PEM type {label}, got {}",
                block.label
            )));
        }
        Ok(block)
    }

    /// Whether the block carries `Proc-Type: 4,ENCRYPTED`.
    pub fn is_encrypted(&self) -> bool {
        self.headers
            .iter()
            .any(|(key, value)| key == "Proc-Type" && value.contains("ENCRYPTED"))
    }
}

fn find_line_start(input: &str, needle: &str) -> Option<usize> {
    let mut offset = 0;
    for line in input.split_inclusive('\n') {
        if line.starts_with(needle) {
            return Some(offset);
        }
        offset += line.len();
    }
    None
}

fn split_line(input: &str) -> (&str, &str) {
    match input.find('\n') {
        Some(idx) => (input[..idx].trim_end_matches('\r'), &input[idx + 1..]),
        None => (input, ""),
    }
}
