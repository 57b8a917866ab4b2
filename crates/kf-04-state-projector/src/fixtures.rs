//! Shared test history: one user with a couple of folders and accounts.

use chrono::{TimeZone, Utc};
use kf_02_event_model::*;
use kf_03_event_log::Projector;
use kf_05_key_material::{export_private_key_with_password, KeyMaterial, SealedKey};
use shared_crypto::rsa_keys::private_key_from_pem;
use shared_crypto::test_vectors::TEST_KEY_PEM;
use shared_types::{AccountId, FolderId, SecretId, Timestamp};

use crate::UserState;

pub const MASTER_PASSWORD: &str = "myMasterPassword";

/// Stored hash of "nimda".
pub const NIMDA_HASH: &str =
    "$pbkdf2-sha256-100k$_Ui6aWQtIAzyqL0nhzxZktjIpKh4KzuM4EzDRV8Ew-s$u1Yv0UYexUqpn6MtiZ_Obv7foqayElMc4_lWXX2DhV8";

pub const OTP_URL: &str = "otpauth://totp/Google%3Afoo%40example.com?secret=qlt6vmy6svfx4bt4rpmisaiyol6hihca&issuer=Google";

pub fn at(minute: u32) -> Timestamp {
    Utc.with_ymd_and_hms(2020, 2, 20, 14, minute, 0).unwrap()
}

pub fn ev(minute: u32, payload: impl Into<EventPayload>) -> Event {
    Event::new(EventMeta::new(at(minute), "1"), payload)
}

pub fn master_password_changed() -> MasterPasswordChanged {
    let key = private_key_from_pem(TEST_KEY_PEM).unwrap();
    export_private_key_with_password(&key, MASTER_PASSWORD).unwrap()
}

/// Envelope for the test key, readable once unlocked.
pub fn seal_for(key: &MasterPasswordChanged, plaintext: &str) -> Vec<u8> {
    KeyMaterial::install(None, SealedKey::from_event(key).unwrap())
        .encrypt(plaintext.as_bytes())
        .unwrap()
}

pub fn history() -> Vec<Event> {
    let key = master_password_changed();
    let acc1 = AccountId::new("accId1");
    let fld1 = FolderId::new("fld1");

    vec![
        ev(0, UserCreated { id: "1".into(), username: "joonas".into() }),
        ev(
            0,
            UserPasswordUpdated {
                user: "1".into(),
                password: NIMDA_HASH.into(),
                automatic_upgrade: false,
            },
        ),
        ev(0, key.clone()),
        ev(1, FolderCreated { id: fld1.clone(), parent_id: FolderId::root(), name: "General".into() }),
        ev(1, FolderRenamed { id: fld1.clone(), name: "General websites".into() }),
        ev(2, FolderCreated { id: "fld2".into(), parent_id: fld1.clone(), name: "Work".into() }),
        ev(3, AccountCreated { id: acc1.clone(), folder_id: fld1.clone(), title: "google.com".into() }),
        ev(3, AccountUsernameChanged { id: acc1.clone(), username: "joonas@example.com".into() }),
        ev(3, AccountUrlChanged { id: acc1.clone(), url: "https://google.com/".into() }),
        ev(
            3,
            AccountDescriptionChanged {
                id: acc1.clone(),
                description: "Notes for account\nLine 2".into(),
            },
        ),
        ev(
            4,
            PasswordAdded {
                account: acc1.clone(),
                id: SecretId::new("pwd1"),
                password: seal_for(&key, "hunter2"),
            },
        ),
        ev(
            5,
            OtpTokenAdded {
                account: acc1.clone(),
                id: SecretId::new("otp1"),
                otp_provisioning_url: seal_for(&key, OTP_URL),
            },
        ),
        ev(
            6,
            KeylistAdded {
                account: acc1.clone(),
                id: SecretId::new("kl1"),
                title: "Keylist 567".into(),
                key_example: "01".into(),
                keys: seal_for(&key, r#"[{"key":"01","value":"9876"},{"key":"02","value":"5432"}]"#),
            },
        ),
        ev(7, AccountCreated { id: "accId2".into(), folder_id: FolderId::root(), title: "facebook.com".into() }),
    ]
}

pub fn project(events: &[Event]) -> UserState {
    let mut state = UserState::new();
    for event in events {
        state.apply(event).unwrap();
    }
    state
}
