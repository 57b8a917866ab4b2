//! # Binary Marshal
//!
//! Length-prefixed layout using unsigned LEB128 varints (Go `uvarint`).
//! Decoding is strict: wrong version, truncated fields and trailing bytes are
//! all rejected.

use crate::domain::{Envelope, EnvelopeError, KeySlot, ENVELOPE_VERSION};

/// Longest valid encoding of a u64 varint.
const MAX_VARINT_LEN: usize = 10;

impl Envelope {
    /// Serialize to the versioned binary format.
    pub fn marshal(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(
            self.encrypted_content.len()
                + self
                    .key_slots
                    .iter()
                    .map(|s| s.kek_id.len() + s.dek_encrypted.len() + 2 * MAX_VARINT_LEN)
                    .sum::<usize>()
                + 3 * MAX_VARINT_LEN,
        );

        put_uvarint(&mut out, ENVELOPE_VERSION);
        put_bytes(&mut out, &self.encrypted_content);
        put_uvarint(&mut out, self.key_slots.len() as u64);

        for slot in &self.key_slots {
            put_bytes(&mut out, slot.kek_id.as_bytes());
            put_bytes(&mut out, &slot.dek_encrypted);
        }

        out
    }

    /// Parse the versioned binary format.
    ///
    /// # Errors
    ///
    /// - [`EnvelopeError::UnsupportedVersion`] for any version other than 1
    /// - [`EnvelopeError::Malformed`] for truncation, overlong varints,
    ///   non-UTF-8 key ids or trailing bytes
    pub fn unmarshal(bytes: &[u8]) -> Result<Self, EnvelopeError> {
        let mut reader = Reader { buf: bytes, pos: 0 };

        let version = reader.uvarint()?;
        if version != ENVELOPE_VERSION {
            return Err(EnvelopeError::UnsupportedVersion(version));
        }

        let encrypted_content = reader.byte_slice()?.to_vec();

        let slot_count = reader.uvarint()?;
        // every slot needs at least two length bytes
        if slot_count > (reader.remaining() / 2) as u64 {
            return Err(EnvelopeError::Malformed("slot count exceeds input"));
        }

        let mut key_slots = Vec::with_capacity(slot_count as usize);
        for _ in 0..slot_count {
            let kek_id = std::str::from_utf8(reader.byte_slice()?)
                .map_err(|_| EnvelopeError::Malformed("kek id is not utf-8"))?
                .to_string();
            let dek_encrypted = reader.byte_slice()?.to_vec();

            key_slots.push(KeySlot {
                kek_id,
                dek_encrypted,
            });
        }

        if reader.remaining() != 0 {
            return Err(EnvelopeError::Malformed("trailing bytes"));
        }

        Ok(Envelope {
            key_slots,
            encrypted_content,
        })
    }
}

fn put_uvarint(out: &mut Vec<u8>, mut value: u64) {
    while value >= 0x80 {
        out.push((value as u8) | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

fn put_bytes(out: &mut Vec<u8>, bytes: &[u8]) {
    put_uvarint(out, bytes.len() as u64);
    out.extend_from_slice(bytes);
}

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn uvarint(&mut self) -> Result<u64, EnvelopeError> {
        let mut value: u64 = 0;

        for i in 0..MAX_VARINT_LEN {
            let byte = *self
                .buf
                .get(self.pos)
                .ok_or(EnvelopeError::Malformed("truncated varint"))?;
            self.pos += 1;

            // the tenth byte may only carry the top bit of a u64
            if i == MAX_VARINT_LEN - 1 && byte > 1 {
                return Err(EnvelopeError::Malformed("varint overflows u64"));
            }

            value |= u64::from(byte & 0x7f) << (7 * i);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }

        Err(EnvelopeError::Malformed("varint overflows u64"))
    }

    fn byte_slice(&mut self) -> Result<&'a [u8], EnvelopeError> {
        let len = self.uvarint()?;
        if len > self.remaining() as u64 {
            return Err(EnvelopeError::Malformed("length exceeds input"));
        }

        let start = self.pos;
        self.pos += len as usize;
        Ok(&self.buf[start..self.pos])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Envelope {
        Envelope {
            key_slots: vec![KeySlot {
                kek_id: "foo".to_string(),
                dek_encrypted: vec![0x07, 0x06, 0x05, 0x04, 0x03, 0x02, 0x01, 0x00],
            }],
            encrypted_content: vec![0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07],
        }
    }

    #[test]
    fn test_marshal_layout() {
        let out = sample().marshal();

        assert_eq!(
            hex::encode(&out),
            "01\
             08 0001020304050607\
             01\
             03 666f6f\
             08 0706050403020100"
                .replace(' ', "")
        );
        assert_eq!(Envelope::unmarshal(&out).unwrap(), sample());
    }

    #[test]
    fn test_long_lengths_use_multibyte_varints() {
        let envelope = Envelope {
            key_slots: vec![],
            encrypted_content: vec![0xab; 300],
        };
        let out = envelope.marshal();

        // 300 = 0b10_0101100 -> 0xac 0x02
        assert_eq!(&out[..3], &[0x01, 0xac, 0x02]);
        assert_eq!(Envelope::unmarshal(&out).unwrap(), envelope);
    }

    #[test]
    fn test_rejects_unknown_version() {
        let mut out = sample().marshal();
        out[0] = 2;

        assert!(matches!(
            Envelope::unmarshal(&out),
            Err(EnvelopeError::UnsupportedVersion(2))
        ));
    }

    #[test]
    fn test_rejects_truncation() {
        let out = sample().marshal();

        for len in 0..out.len() {
            assert!(
                Envelope::unmarshal(&out[..len]).is_err(),
                "prefix of length {len} accepted"
            );
        }
    }

    #[test]
    fn test_rejects_trailing_bytes() {
        let mut out = sample().marshal();
        out.push(0);

        assert!(matches!(
            Envelope::unmarshal(&out),
            Err(EnvelopeError::Malformed("trailing bytes"))
        ));
    }

    #[test]
    fn test_rejects_huge_slot_count() {
        let mut out = Vec::new();
        put_uvarint(&mut out, ENVELOPE_VERSION);
        put_bytes(&mut out, &[]);
        put_uvarint(&mut out, u64::MAX);

        assert!(matches!(
            Envelope::unmarshal(&out),
            Err(EnvelopeError::Malformed(_))
        ));
    }

    #[test]
    fn test_rejects_overlong_varint() {
        let out = [0xffu8; 11];
        assert!(matches!(
            Envelope::unmarshal(&out),
            Err(EnvelopeError::Malformed(_))
        ));
    }
}
