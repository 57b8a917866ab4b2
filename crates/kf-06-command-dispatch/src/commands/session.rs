//! Session commands.

use kf_02_event_model::SessionSignedIn;
use serde::Deserialize;
use shared_crypto::StoredPassword;
use tracing::warn;

use super::Command;
use crate::domain::{CommandError, Ctx};

/// `session.SignIn`
///
/// Runs against the storage of the user named by `username`. A wrong
/// password fails at once; the dispatcher adds the failure delay after the
/// user's lock is released.
#[derive(Deserialize)]
pub struct SignIn {
    pub username: String,
    pub password: String,
}

impl Command for SignIn {
    fn invoke(&self, ctx: &mut Ctx<'_>) -> Result<(), CommandError> {
        let verified = match ctx.state().user() {
            Some(user) if user.username == self.username => {
                StoredPassword::from_stored(user.password_hash.as_str())
                    .verify(&self.password)
                    .unwrap_or_else(|err| {
                        warn!(user = %user.id, error = %err, "[kf-06] unusable stored password");
                        false
                    })
            }
            _ => false,
        };

        if !verified {
            return Err(CommandError::BadCredentials);
        }

        let signed_in = SessionSignedIn {
            ip_address: ctx.request().remote_addr.clone(),
            user_agent: ctx.request().user_agent.clone(),
        };
        ctx.raise_event(signed_in);
        Ok(())
    }

    fn username(&self) -> Option<&str> {
        Some(&self.username)
    }

    fn password(&self) -> Option<&str> {
        Some(&self.password)
    }
}

/// Well-formed hash that matches no password.
const NOBODY_PASSWORD_HASH: &str = concat!(
    "$pbkdf2-sha256-100k",
    "$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA",
    "$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA",
);

/// Spend the work of one password check on a sign-in for an unknown
/// username, so it answers no sooner than a wrong password.
pub(crate) fn verify_for_unknown_user(password: &str) {
    let _ = StoredPassword::from_stored(NOBODY_PASSWORD_HASH).verify(password);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::*;
    use kf_02_event_model::EventPayload;
    use serde_json::json;

    #[test]
    fn test_sign_in_records_request() {
        let (events, state) = run_and_apply(
            &BASE,
            "session.SignIn",
            json!({ "username": "joonas", "password": PASSWORD }),
        )
        .unwrap();

        let EventPayload::SessionSignedIn(signed_in) = &events[0].payload else {
            panic!("expected SessionSignedIn");
        };
        assert_eq!(signed_in.ip_address, "127.0.0.1");
        assert_eq!(signed_in.user_agent, "tests");
        assert_eq!(
            state.audit_log()[0].message,
            "Signed in with IP 127.0.0.1 with tests"
        );
    }

    #[test]
    fn test_bad_credentials() {
        for (username, password) in [("joonas", "wrong"), ("someone", PASSWORD)] {
            let err = run(
                &BASE,
                "session.SignIn",
                json!({ "username": username, "password": password }),
            )
            .unwrap_err();
            assert_eq!(err.to_string(), "bad username or password");
        }
    }

    #[test]
    fn test_nobody_hash_is_well_formed() {
        let stored = StoredPassword::from_stored(NOBODY_PASSWORD_HASH);
        assert!(!stored.verify(PASSWORD).unwrap());
        assert!(!stored.verify("").unwrap());
    }
}
