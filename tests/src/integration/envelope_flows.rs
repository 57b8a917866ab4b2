//! # Envelope Flows
//!
//! Envelopes sealed for several recipients and opened through each
//! recipient's own key material.

#[cfg(test)]
mod tests {
    use kf_01_envelope::{encrypt, Envelope, EnvelopeError};
    use kf_05_key_material::{
        export_private_key_with_password, KeyMaterial, KeyMaterialError, SealedKey,
    };
    use shared_crypto::rsa_keys::{generate_private_key, private_key_from_pem};
    use shared_crypto::test_vectors::{OTHER_TEST_KEY_PEM, TEST_KEY_PEM};
    use shared_crypto::RsaPrivateKey;

    fn unlocked(key: &RsaPrivateKey, password: &str) -> KeyMaterial {
        let event = export_private_key_with_password(key, password).unwrap();
        let mut key_material = KeyMaterial::install(None, SealedKey::from_event(&event).unwrap());
        key_material.unlock(password).unwrap();
        key_material
    }

    fn alice_and_bob() -> (KeyMaterial, KeyMaterial) {
        (
            unlocked(&private_key_from_pem(TEST_KEY_PEM).unwrap(), "alice"),
            unlocked(&private_key_from_pem(OTHER_TEST_KEY_PEM).unwrap(), "bob"),
        )
    }

    #[test]
    fn test_every_recipient_opens_shared_envelope() {
        let (alice, bob) = alice_and_bob();
        let recipients = [alice.public_key().clone(), bob.public_key().clone()];

        let bytes = encrypt(b"shared note", &recipients).unwrap().marshal();

        assert_eq!(Envelope::unmarshal(&bytes).unwrap().key_slots.len(), 2);
        assert_eq!(alice.decrypt_string(&bytes).unwrap(), "shared note");
        assert_eq!(bob.decrypt_string(&bytes).unwrap(), "shared note");
    }

    #[test]
    fn test_outsider_has_no_slot() {
        let (alice, _) = alice_and_bob();
        let carol = unlocked(&generate_private_key(1024).unwrap(), "carol");

        let bytes = alice.encrypt(b"for alice only").unwrap();

        assert!(matches!(
            carol.decrypt(&bytes),
            Err(KeyMaterialError::Envelope(EnvelopeError::NoMatchingSlot { .. }))
        ));
    }

    #[test]
    fn test_tampered_content_never_decrypts() {
        let (alice, bob) = alice_and_bob();
        let recipients = [alice.public_key().clone(), bob.public_key().clone()];
        let envelope = encrypt(b"hunter2", &recipients).unwrap();

        for index in [0, envelope.encrypted_content.len() / 2, envelope.encrypted_content.len() - 1] {
            let mut tampered = envelope.clone();
            tampered.encrypted_content[index] ^= 0x01;
            let bytes = tampered.marshal();

            assert!(alice.decrypt(&bytes).is_err());
            assert!(bob.decrypt(&bytes).is_err());
        }
    }

    #[test]
    fn test_sealed_material_refuses_to_decrypt() {
        let (mut alice, _) = alice_and_bob();
        let bytes = alice.encrypt(b"later").unwrap();

        alice.seal();

        assert!(matches!(alice.decrypt(&bytes), Err(KeyMaterialError::Locked)));
        alice.unlock("alice").unwrap();
        assert_eq!(alice.decrypt(&bytes).unwrap(), b"later");
    }
}
