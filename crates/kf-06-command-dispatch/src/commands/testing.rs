//! Helpers for running commands against a prepared state.

use std::sync::LazyLock;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use kf_02_event_model::*;
use kf_03_event_log::Projector;
use kf_04_state_projector::UserState;
use kf_05_key_material::export_private_key_with_password;
use shared_crypto::rsa_keys::private_key_from_pem;
use shared_crypto::test_vectors::TEST_KEY_PEM;
use shared_crypto::StoredPassword;
use shared_types::{AccountId, FolderId, Timestamp};

use super::get_command_info;
use crate::domain::{CommandError, Ctx, DispatchConfig, RequestMeta};

pub const PASSWORD: &str = "nimda";

pub fn at(minute: u32) -> Timestamp {
    Utc.with_ymd_and_hms(2020, 2, 20, 14, minute, 0).unwrap()
}

pub fn config() -> DispatchConfig {
    DispatchConfig {
        signin_failure_delay: Duration::ZERO,
        rsa_key_bits: 1024,
    }
}

/// User "1" (joonas / nimda) with the test key, a folder "fld1" and an
/// account "acc1" in it. Key locked.
pub static BASE: LazyLock<UserState> = LazyLock::new(|| {
    let key = private_key_from_pem(TEST_KEY_PEM).unwrap();
    let ev = |payload: EventPayload| Event::new(EventMeta::new(at(0), "1"), payload);

    let events = [
        ev(UserCreated { id: "1".into(), username: "joonas".into() }.into()),
        ev(UserPasswordUpdated {
            user: "1".into(),
            password: StoredPassword::hash(PASSWORD).as_str().to_string(),
            automatic_upgrade: false,
        }
        .into()),
        ev(export_private_key_with_password(&key, PASSWORD).unwrap().into()),
        ev(FolderCreated {
            id: FolderId::new("fld1"),
            parent_id: FolderId::root(),
            name: "Work".into(),
        }
        .into()),
        ev(AccountCreated {
            id: AccountId::new("acc1"),
            folder_id: FolderId::new("fld1"),
            title: "google.com".into(),
        }
        .into()),
    ];

    let mut state = UserState::new();
    for event in &events {
        state.apply(event).unwrap();
    }
    state
});

/// [`BASE`] with the key unlocked.
pub fn unlocked() -> UserState {
    let mut state = BASE.clone();
    let private_key = private_key_from_pem(TEST_KEY_PEM).unwrap();
    state
        .key_material_mut()
        .unwrap()
        .unlock_with(private_key)
        .unwrap();
    state
}

/// Decode, validate and invoke a command against `state`.
pub fn run(
    state: &UserState,
    name: &str,
    input: serde_json::Value,
) -> Result<Vec<Event>, CommandError> {
    let command = get_command_info(name).unwrap().decode(input).unwrap();
    command.validate()?;

    let request = RequestMeta::new("127.0.0.1", "tests");
    let config = config();
    let mut ctx = Ctx::new(state, EventMeta::new(at(30), "1"), &request, &config);
    command.invoke(&mut ctx)?;
    Ok(ctx.finish().0)
}

/// [`run`], then apply the events to a copy of `state`.
pub fn run_and_apply(
    state: &UserState,
    name: &str,
    input: serde_json::Value,
) -> Result<(Vec<Event>, UserState), CommandError> {
    let events = run(state, name, input)?;
    let mut next = state.clone();
    for event in &events {
        next.apply(event).unwrap();
    }
    Ok((events, next))
}

pub fn kinds(events: &[Event]) -> Vec<EventKind> {
    events.iter().map(Event::kind).collect()
}
