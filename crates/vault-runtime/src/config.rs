//! # Vault Configuration
//!
//! Runtime settings, read from the environment.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `KF_DATA_DIR` | `./data` | one `<user>.log` per user, plus the lock file |
//! | `KF_SIGNIN_FAILURE_DELAY_MS` | `2000` | pause before a failed sign-in answers |
//! | `KF_RSA_KEY_BITS` | `2048` | key size for new users |

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use kf_06_command_dispatch::DispatchConfig;
use thiserror::Error;

/// Complete runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultConfig {
    /// Data directory.
    pub data_dir: PathBuf,
    /// Command handling tunables.
    pub dispatch: DispatchConfig,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            dispatch: DispatchConfig::default(),
        }
    }
}

impl VaultConfig {
    /// Read the configuration from `KF_*` variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(dir) = lookup("KF_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(ms) = lookup("KF_SIGNIN_FAILURE_DELAY_MS") {
            let ms = parse_number("KF_SIGNIN_FAILURE_DELAY_MS", &ms)?;
            config.dispatch.signin_failure_delay = Duration::from_millis(ms);
        }
        if let Some(bits) = lookup("KF_RSA_KEY_BITS") {
            config.dispatch.rsa_key_bits = parse_number("KF_RSA_KEY_BITS", &bits)?;
        }

        config
            .dispatch
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(config)
    }
}

fn parse_number<N: std::str::FromStr>(name: &'static str, value: &str) -> Result<N, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::NotANumber {
        name,
        value: value.to_string(),
    })
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A numeric variable does not parse.
    #[error("{name} must be a number, got {value:?}")]
    NotANumber {
        /// Variable name.
        name: &'static str,
        /// Raw value.
        value: String,
    },

    /// Values parse but are unusable.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
