//! # Keyfold Vault Runtime
//!
//! Wires the subsystems into one process-wide vault and offers it to async
//! callers.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration from the environment
//! 2. Lock the data directory (a second process on it fails here)
//! 3. Replay every `<user>.log` (any corrupt log aborts startup)
//! 4. Serve commands and queries
//! 5. On shutdown, drop every unlocked private key
//!
//! Commands and secret queries run on tokio's blocking pool: they take a
//! per-user mutex, write files and may spend seconds in PBKDF2 or RSA key
//! generation.

#![warn(missing_docs)]

pub mod config;

use std::sync::Arc;

use keyfold_telemetry::{
    metric_inc, HistogramTimer, COMMANDS_DISPATCHED, COMMAND_DURATION, DECRYPTION_FAILURES,
    EVENTS_APPENDED, EVENTS_REPLAYED, SECRETS_EXPOSED, USERS_OPEN,
};
use kf_03_event_log::{DataDirLock, LockError, LogStoreError};
use kf_06_command_dispatch::{
    CommandError, DirectoryLogProvider, DispatchError, DispatchOutcome, ExposedSecret,
    NoTokensVerifier, RequestMeta, SecondFactorProof, Vault,
};
use shared_types::{AccountId, SecretId, SystemTimeSource, UserId};
use thiserror::Error;
use tracing::info;

pub use config::{ConfigError, VaultConfig};

/// The vault as deployed: log files on disk, wall-clock time, no U2F
/// signature checks.
pub type ServerVault = Vault<DirectoryLogProvider, NoTokensVerifier, SystemTimeSource>;

/// Runtime errors.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Data directory is held by another process.
    #[error(transparent)]
    Lock(#[from] LockError),

    /// Data directory could not be prepared.
    #[error(transparent)]
    Store(#[from] LogStoreError),

    /// Command or query failed.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// Blocking task panicked or was cancelled.
    #[error("vault task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// The running vault.
pub struct VaultRuntime {
    vault: Arc<ServerVault>,
    _lock: DataDirLock,
}

impl VaultRuntime {
    /// Lock the data directory and replay every user.
    pub fn open(config: &VaultConfig) -> Result<Self, RuntimeError> {
        let provider = DirectoryLogProvider::new(&config.data_dir)?;
        let lock = DataDirLock::acquire(&config.data_dir)?;

        let vault = Vault::open(
            provider,
            NoTokensVerifier,
            SystemTimeSource,
            config.dispatch.clone(),
        )?;

        let users = vault.users();
        let mut replayed = 0;
        for user in &users {
            replayed += vault.log_len(user)?;
        }
        USERS_OPEN.set(users.len() as i64);
        EVENTS_REPLAYED.inc_by(replayed as u64);

        info!(
            data_dir = %config.data_dir.display(),
            users = users.len(),
            events = replayed,
            "Vault runtime started"
        );

        Ok(Self {
            vault: Arc::new(vault),
            _lock: lock,
        })
    }

    /// The vault, for cheap synchronous reads.
    pub fn vault(&self) -> &ServerVault {
        &self.vault
    }

    /// Run a command on the blocking pool.
    pub async fn dispatch(
        &self,
        actor: Option<UserId>,
        name: String,
        input: serde_json::Value,
        request: RequestMeta,
    ) -> Result<DispatchOutcome, RuntimeError> {
        let result = self
            .blocking(move |vault| {
                let _timer = HistogramTimer::new(&COMMAND_DURATION);
                let result = vault.dispatch(actor.as_ref(), &name, input, &request);
                metric_inc!(COMMANDS_DISPATCHED, &[name.as_str(), outcome(&result)]);
                result
            })
            .await?;

        if let Ok(outcome) = &result {
            EVENTS_APPENDED.inc_by(outcome.events.len() as u64);
            USERS_OPEN.set(self.vault.users().len() as i64);
        }
        Ok(result?)
    }

    /// [`Vault::expose_secrets`] on the blocking pool.
    pub async fn expose_secrets(
        &self,
        user: UserId,
        account: AccountId,
        proof: SecondFactorProof,
    ) -> Result<Vec<ExposedSecret>, RuntimeError> {
        let result = self
            .blocking(move |vault| vault.expose_secrets(&user, &account, &proof))
            .await?;
        record_exposure(&result, "password_exposed");
        Ok(result?)
    }

    /// [`Vault::expose_keylist_key`] on the blocking pool; returns the value.
    pub async fn expose_keylist_key(
        &self,
        user: UserId,
        account: AccountId,
        secret: SecretId,
        key: String,
        proof: SecondFactorProof,
    ) -> Result<String, RuntimeError> {
        let result = self
            .blocking(move |vault| {
                vault
                    .expose_keylist_key(&user, &account, &secret, &key, &proof)
                    .map(|item| item.value)
            })
            .await?;
        record_exposure(&result, "keylist_key_exposed");
        Ok(result?)
    }

    /// [`Vault::export_otp_provisioning_url`] on the blocking pool.
    pub async fn export_otp_provisioning_url(
        &self,
        user: UserId,
        account: AccountId,
        secret: SecretId,
        mac: String,
    ) -> Result<String, RuntimeError> {
        let result = self
            .blocking(move |vault| vault.export_otp_provisioning_url(&user, &account, &secret, &mac))
            .await?;
        record_exposure(&result, "otp_export");
        Ok(result?)
    }

    /// [`Vault::ssh_private_key`] on the blocking pool.
    pub async fn ssh_private_key(
        &self,
        user: UserId,
        account: AccountId,
        secret: SecretId,
    ) -> Result<String, RuntimeError> {
        let result = self
            .blocking(move |vault| vault.ssh_private_key(&user, &account, &secret))
            .await?;
        record_exposure(&result, "ssh_signing");
        Ok(result?)
    }

    /// Drop every unlocked private key.
    pub fn seal_all(&self) -> Result<(), RuntimeError> {
        for user in self.vault.users() {
            self.vault.seal_decryption_key(&user)?;
        }
        info!("All decryption keys sealed");
        Ok(())
    }

    async fn blocking<R: Send + 'static>(
        &self,
        f: impl FnOnce(&ServerVault) -> R + Send + 'static,
    ) -> Result<R, RuntimeError> {
        let vault = Arc::clone(&self.vault);
        Ok(tokio::task::spawn_blocking(move || f(&vault)).await?)
    }
}

fn outcome<T>(result: &Result<T, DispatchError>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(err) if err.is_client_error() => "rejected",
        Err(_) => "failed",
    }
}

fn record_exposure<T>(result: &Result<T, DispatchError>, usage: &str) {
    match result {
        Ok(_) => metric_inc!(SECRETS_EXPOSED, &[usage]),
        Err(DispatchError::Command(CommandError::KeyMaterial(_))) => metric_inc!(DECRYPTION_FAILURES),
        Err(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kf_06_command_dispatch::ExposedContent;
    use serde_json::json;
    use std::time::Duration;
    use tempfile::TempDir;

    fn config(dir: &TempDir) -> VaultConfig {
        let mut config = VaultConfig {
            data_dir: dir.path().to_path_buf(),
            ..VaultConfig::default()
        };
        config.dispatch.signin_failure_delay = Duration::ZERO;
        config.dispatch.rsa_key_bits = 1024;
        config
    }

    #[test]
    fn test_data_dir_is_exclusive() {
        let dir = TempDir::new().unwrap();
        let _first = VaultRuntime::open(&config(&dir)).unwrap();

        let second = VaultRuntime::open(&config(&dir));
        assert!(matches!(second, Err(RuntimeError::Lock(_))));
    }

    #[tokio::test]
    async fn test_register_unlock_expose() {
        let dir = TempDir::new().unwrap();
        let runtime = VaultRuntime::open(&config(&dir)).unwrap();
        let request = RequestMeta::new("127.0.0.1", "tests");

        let user = runtime
            .dispatch(
                None,
                "user.Create".into(),
                json!({ "username": "alice", "password": "pw", "password_repeat": "pw" }),
                request.clone(),
            )
            .await
            .unwrap()
            .user;
        runtime
            .dispatch(
                Some(user.clone()),
                "account.Create".into(),
                json!({ "folder_id": "root", "title": "example.com", "password": "hunter2" }),
                request.clone(),
            )
            .await
            .unwrap();
        let account = runtime
            .vault()
            .query(&user, |s| s.list_accounts(false)[0].id.clone())
            .unwrap();

        let locked = runtime
            .expose_secrets(user.clone(), account.clone(), SecondFactorProof::default())
            .await;
        assert!(locked.is_err());

        runtime
            .dispatch(
                Some(user.clone()),
                "user.UnlockDecryptionKey".into(),
                json!({ "password": "pw" }),
                request,
            )
            .await
            .unwrap();
        let exposed = runtime
            .expose_secrets(user.clone(), account, SecondFactorProof::default())
            .await
            .unwrap();
        assert_eq!(exposed[0].content, ExposedContent::Password("hunter2".into()));

        runtime.seal_all().unwrap();
        let sealed = runtime
            .vault()
            .query(&user, |s| s.key_material().is_some_and(|k| !k.is_unlocked()))
            .unwrap();
        assert!(sealed);
    }

    #[tokio::test]
    async fn test_rejected_command_is_reported() {
        let dir = TempDir::new().unwrap();
        let runtime = VaultRuntime::open(&config(&dir)).unwrap();

        let err = runtime
            .dispatch(
                None,
                "session.SignIn".into(),
                json!({ "username": "ghost", "password": "x" }),
                RequestMeta::default(),
            )
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "bad username or password");
    }
}
