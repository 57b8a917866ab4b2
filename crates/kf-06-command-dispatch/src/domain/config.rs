//! Dispatch configuration.

use std::time::Duration;

use thiserror::Error;

/// Smallest RSA modulus accepted for generated user keys.
pub const MIN_RSA_KEY_BITS: usize = 1024;

/// Tunables for command handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Pause before answering a failed sign-in, for unknown users and wrong
    /// passwords alike.
    pub signin_failure_delay: Duration,
    /// Modulus size of the key pair generated by `user.Create`.
    pub rsa_key_bits: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            signin_failure_delay: Duration::from_secs(2),
            rsa_key_bits: 2048,
        }
    }
}

impl DispatchConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rsa_key_bits < MIN_RSA_KEY_BITS {
            return Err(ConfigError::RsaKeyTooSmall(self.rsa_key_bits));
        }
        Ok(())
    }
}

/// Invalid [`DispatchConfig`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Key size below [`MIN_RSA_KEY_BITS`].
    #[error("RSA key size {0} is below the minimum of {MIN_RSA_KEY_BITS} bits")]
    RsaKeyTooSmall(usize),
}
