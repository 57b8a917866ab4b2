//! Random material from the thread-local CSPRNG.

use rand::distributions::Alphanumeric;
use rand::{Rng, RngCore};

/// Length of generated account passwords.
pub const GENERATED_PASSWORD_LEN: usize = 16;

/// Random alphanumeric password.
pub fn password(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// `N` random bytes.
pub fn bytes<const N: usize>() -> [u8; N] {
    let mut out = [0u8; N];
    rand::thread_rng().fill_bytes(&mut out);
    out
}
