//! # Envelope Entities

/// Current (and only) wire format version.
pub const ENVELOPE_VERSION: u64 = 1;

/// One recipient's wrapped copy of the content key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeySlot {
    /// Fingerprint of the recipient's public key (`SHA256:...`).
    pub kek_id: String,
    /// RSA-OAEP-SHA256(recipient public key, content key).
    pub dek_encrypted: Vec<u8>,
}

/// Self-describing encrypted container.
///
/// ## Invariants
///
/// - `encrypted_content` is `nonce(24) ‖ secretbox(dek, nonce, plaintext)`
/// - exactly one slot exists per intended recipient
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Envelope {
    /// Wrapped content keys, one per recipient.
    pub key_slots: Vec<KeySlot>,
    /// Nonce followed by the sealed payload.
    pub encrypted_content: Vec<u8>,
}

impl Envelope {
    /// Slot addressed to the given fingerprint, if any.
    pub fn slot_for(&self, kek_id: &str) -> Option<&KeySlot> {
        self.key_slots.iter().find(|slot| slot.kek_id == kek_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_for() {
        let envelope = Envelope {
            key_slots: vec![
                KeySlot {
                    kek_id: "a".to_string(),
                    dek_encrypted: vec![1],
                },
                KeySlot {
                    kek_id: "b".to_string(),
                    dek_encrypted: vec![2],
                },
            ],
            encrypted_content: vec![],
        };

        assert_eq!(envelope.slot_for("b").map(|s| s.dek_encrypted.clone()), Some(vec![2]));
        assert!(envelope.slot_for("c").is_none());
    }
}
