//! # Vault Flows
//!
//! Commands and queries through [`Vault`](kf_06_command_dispatch::Vault),
//! down to the projected state and the stored log.
//!
//! ## Flows Tested:
//!
//! 1. **Folder deletion**: refused while a subfolder or an account remains
//! 2. **SSH validation**: trailing data after the PEM block raises nothing
//! 3. **Account/secret lifecycle**: add and delete a secret, delete the account
//! 4. **Restart**: a reopened data directory decrypts what the old process
//!    stored, once unlocked again
//! 5. **Isolation**: users dispatching in parallel never see each other

#[cfg(test)]
mod tests {
    use std::thread;
    use std::time::Duration;

    use chrono::{TimeZone, Utc};
    use kf_04_state_projector::UserState;
    use kf_06_command_dispatch::{
        DirectoryLogProvider, DispatchConfig, ExposedContent, LogProvider, MemoryLogProvider,
        NoTokensVerifier, RequestMeta, SecondFactorProof, Vault,
    };
    use serde_json::{json, Value};
    use shared_crypto::test_vectors::TEST_KEY_PEM;
    use shared_types::{AccountId, FixedTimeSource, FolderId, SecretKind, UserId};
    use tempfile::TempDir;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn config() -> DispatchConfig {
        DispatchConfig {
            signin_failure_delay: Duration::ZERO,
            rsa_key_bits: 1024,
        }
    }

    fn clock() -> FixedTimeSource {
        FixedTimeSource(Utc.with_ymd_and_hms(2021, 6, 1, 9, 0, 0).unwrap())
    }

    struct Session<'v, P: LogProvider> {
        vault: &'v Vault<P, NoTokensVerifier, FixedTimeSource>,
        user: UserId,
    }

    impl<'v, P: LogProvider> Session<'v, P> {
        fn register(vault: &'v Vault<P, NoTokensVerifier, FixedTimeSource>, username: &str) -> Self {
            let user = vault
                .dispatch(
                    None,
                    "user.Create",
                    json!({ "username": username, "password": "pw", "password_repeat": "pw" }),
                    &RequestMeta::default(),
                )
                .unwrap()
                .user;
            Self { vault, user }
        }

        fn run(&self, name: &str, input: Value) -> Result<(), String> {
            self.vault
                .dispatch(Some(&self.user), name, input, &RequestMeta::default())
                .map(|_| ())
                .map_err(|e| e.to_string())
        }

        fn state(&self) -> UserState {
            self.vault.query(&self.user, UserState::clone).unwrap()
        }

        fn log_len(&self) -> usize {
            self.vault.log_len(&self.user).unwrap()
        }

        fn only_account(&self) -> AccountId {
            let accounts = self.state().list_accounts(false);
            assert_eq!(accounts.len(), 1);
            accounts[0].id.clone()
        }
    }

    fn memory_vault() -> Vault<MemoryLogProvider, NoTokensVerifier, FixedTimeSource> {
        Vault::open(MemoryLogProvider::new(), NoTokensVerifier, clock(), config()).unwrap()
    }

    // =============================================================================
    // INTEGRATION TESTS
    // =============================================================================

    #[test]
    fn test_folder_deletion_waits_for_contents() {
        let vault = memory_vault();
        let alice = Session::register(&vault, "alice");

        alice
            .run("folder.Create", json!({ "parent": "root", "name": "Work" }))
            .unwrap();
        let work = alice.state().search_folders("work")[0].id.clone();
        alice
            .run("folder.Create", json!({ "parent": work.as_str(), "name": "Old" }))
            .unwrap();
        alice
            .run("account.Create", json!({ "folder_id": work.as_str(), "title": "intranet" }))
            .unwrap();

        let delete = json!({ "id": work.as_str() });
        assert_eq!(alice.run("folder.Delete", delete.clone()).unwrap_err(), "folder not empty");

        let old = alice.state().subfolders(&work)[0].id.clone();
        alice.run("folder.Delete", json!({ "id": old.as_str() })).unwrap();
        assert_eq!(alice.run("folder.Delete", delete.clone()).unwrap_err(), "folder not empty");

        let account = alice.only_account();
        alice.run("account.Delete", json!({ "account": account.as_str() })).unwrap();
        alice.run("folder.Delete", delete).unwrap();

        assert!(alice.state().folder(&work).is_none());
    }

    #[test]
    fn test_ssh_key_with_trailing_data_raises_nothing() {
        let vault = memory_vault();
        let alice = Session::register(&vault, "alice");
        alice.run("user.UnlockDecryptionKey", json!({ "password": "pw" })).unwrap();
        alice
            .run("account.Create", json!({ "folder_id": "root", "title": "server" }))
            .unwrap();
        let account = alice.only_account();
        let before = alice.log_len();

        let err = alice
            .run(
                "account.AddSshKey",
                json!({
                    "account": account.as_str(),
                    "ssh_private_key": format!("{TEST_KEY_PEM}\nssh-rsa AAAA trailing\n"),
                }),
            )
            .unwrap_err();

        assert_eq!(err, "Extra data included in PEM content");
        assert_eq!(alice.log_len(), before);

        alice
            .run(
                "account.AddSshKey",
                json!({ "account": account.as_str(), "ssh_private_key": TEST_KEY_PEM }),
            )
            .unwrap();
        assert!(alice.state().account(&account).unwrap().has_ssh_key());
        assert_eq!(alice.state().list_accounts(true).len(), 1);
    }

    #[test]
    fn test_account_and_secret_lifecycle() {
        let vault = memory_vault();
        let alice = Session::register(&vault, "alice");
        alice.run("user.UnlockDecryptionKey", json!({ "password": "pw" })).unwrap();
        alice
            .run(
                "account.Create",
                json!({
                    "folder_id": "root",
                    "url": "https://accounts.example.com/login",
                    "username": "alice@example.com",
                }),
            )
            .unwrap();
        let account = alice.only_account();
        let summary = alice.state().list_accounts(false)[0].clone();
        assert_eq!(summary.title, "accounts.example.com");

        alice
            .run(
                "account.AddPassword",
                json!({ "account": account.as_str(), "password": "_auto", "password_repeat": "_auto" }),
            )
            .unwrap();
        let state = alice.state();
        let secret = &state.account(&account).unwrap().secrets[0];
        assert_eq!(secret.kind(), SecretKind::Password);

        let exposed = vault
            .expose_secrets(&alice.user, &account, &SecondFactorProof::default())
            .unwrap();
        let ExposedContent::Password(password) = &exposed[0].content else {
            panic!("expected a password");
        };
        assert_eq!(password.len(), 16);

        alice
            .run(
                "account.DeleteSecret",
                json!({ "account": account.as_str(), "secret": secret.id.as_str() }),
            )
            .unwrap();
        assert!(alice.state().account(&account).unwrap().secrets.is_empty());
        assert_eq!(alice.state().list_accounts(false)[0], summary);

        alice.run("account.Delete", json!({ "account": account.as_str() })).unwrap();
        let root = alice.state().folder_view(&FolderId::root()).unwrap();
        assert!(root.accounts.is_empty());
        assert!(alice.state().search_accounts("example").is_empty());
    }

    #[test]
    fn test_reopened_vault_decrypts_after_unlock() {
        let dir = TempDir::new().unwrap();
        let open = || {
            Vault::open(
                DirectoryLogProvider::new(dir.path()).unwrap(),
                NoTokensVerifier,
                clock(),
                config(),
            )
            .unwrap()
        };

        let (user, account) = {
            let vault = open();
            let alice = Session::register(&vault, "alice");
            alice.run("user.UnlockDecryptionKey", json!({ "password": "pw" })).unwrap();
            alice
                .run(
                    "account.Create",
                    json!({ "folder_id": "root", "title": "bank", "password": "s3cret" }),
                )
                .unwrap();
            (alice.user.clone(), alice.only_account())
        };

        let vault = open();
        let alice = Session { vault: &vault, user };
        let proof = SecondFactorProof::default();

        let err = vault.expose_secrets(&alice.user, &account, &proof).unwrap_err();
        assert_eq!(err.to_string(), "decryption key locked");

        assert_eq!(
            alice
                .run("user.UnlockDecryptionKey", json!({ "password": "wrong" }))
                .unwrap_err(),
            "UnlockDecryptionKey: decryption error. wrong password?"
        );
        alice.run("user.UnlockDecryptionKey", json!({ "password": "pw" })).unwrap();

        let exposed = vault.expose_secrets(&alice.user, &account, &proof).unwrap();
        assert_eq!(exposed[0].content, ExposedContent::Password("s3cret".into()));
    }

    #[test]
    fn test_users_are_isolated() {
        let vault = memory_vault();
        let sessions: Vec<_> = ["alice", "bob", "carol"]
            .into_iter()
            .map(|name| Session::register(&vault, name))
            .collect();

        thread::scope(|scope| {
            for session in &sessions {
                scope.spawn(move || {
                    for i in 0..5 {
                        session
                            .run(
                                "folder.Create",
                                json!({ "parent": "root", "name": format!("f{i}") }),
                            )
                            .unwrap();
                    }
                });
            }
        });

        for session in &sessions {
            assert_eq!(session.state().subfolders(&FolderId::root()).len(), 5);
            assert_eq!(session.log_len(), 3 + 5);
        }
        assert_eq!(vault.user_by_username("carol"), Some(sessions[2].user.clone()));
    }
}
