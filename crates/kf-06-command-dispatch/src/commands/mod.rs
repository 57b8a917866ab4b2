//! # Commands
//!
//! Every command is a `serde` struct decoded from a JSON object and looked
//! up by name in [`COMMAND_REGISTRY`].
//!
//! ## Lifecycle
//!
//! ```text
//! decode ──► validate ──► invoke ──► append ──► project
//!  (serde)   (input only)  (reads state, raises events)
//! ```
//!
//! `validate` never sees state. `invoke` re-checks everything that depends
//! on state and returns before raising anything it would have to take back.

// Command fields are the JSON request fields, named as the clients send them.
#![allow(missing_docs)]

pub mod account;
pub mod folder;
pub mod secret;
pub mod session;
pub mod user;

#[cfg(test)]
pub(crate) mod testing;

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::de::DeserializeOwned;

use crate::domain::{CommandError, Ctx};

/// A decoded command.
pub trait Command: Send {
    /// Checks on the input alone.
    fn validate(&self) -> Result<(), CommandError> {
        Ok(())
    }

    /// Check preconditions against the current state and raise events.
    fn invoke(&self, ctx: &mut Ctx<'_>) -> Result<(), CommandError>;

    /// Username the command targets, for commands that run before a user
    /// is known.
    fn username(&self) -> Option<&str> {
        None
    }

    /// Password the command checks, for commands that run before a user is
    /// known.
    fn password(&self) -> Option<&str> {
        None
    }
}

/// Which user a command runs as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandScope {
    /// The signed-in user.
    User,
    /// A user created by the command itself.
    Register,
    /// The user named in the command.
    SignIn,
}

/// Turns command input into a boxed [`Command`].
pub type DecodeFn = fn(serde_json::Value) -> Result<Box<dyn Command>, serde_json::Error>;

/// Command metadata
#[derive(Debug, Clone, Copy)]
pub struct CommandInfo {
    /// Registry name, e.g. `account.Create`
    pub name: &'static str,
    /// Which user it runs as
    pub scope: CommandScope,
    /// Brief description
    pub description: &'static str,
    decode: DecodeFn,
}

impl CommandInfo {
    fn new(
        name: &'static str,
        scope: CommandScope,
        description: &'static str,
        decode: DecodeFn,
    ) -> Self {
        Self {
            name,
            scope,
            description,
            decode,
        }
    }

    /// Decode command input.
    pub fn decode(&self, input: serde_json::Value) -> Result<Box<dyn Command>, serde_json::Error> {
        (self.decode)(input)
    }
}

fn decoder<C>(input: serde_json::Value) -> Result<Box<dyn Command>, serde_json::Error>
where
    C: Command + DeserializeOwned + 'static,
{
    Ok(Box::new(serde_json::from_value::<C>(input)?))
}

/// Command registry - every supported command with metadata
pub static COMMAND_REGISTRY: LazyLock<HashMap<&'static str, CommandInfo>> = LazyLock::new(|| {
    use CommandScope::{Register, SignIn, User};

    let commands = [
        // ═══════════════════════════════════════════════════════════════════
        // ACCOUNTS
        // ═══════════════════════════════════════════════════════════════════
        CommandInfo::new("account.Create", User, "Create an account", decoder::<account::Create>),
        CommandInfo::new("account.Rename", User, "Change account title", decoder::<account::Rename>),
        CommandInfo::new(
            "account.ChangeUsername",
            User,
            "Change account username",
            decoder::<account::ChangeUsername>,
        ),
        CommandInfo::new("account.ChangeUrl", User, "Change account URL", decoder::<account::ChangeUrl>),
        CommandInfo::new(
            "account.ChangeDescription",
            User,
            "Change account description",
            decoder::<account::ChangeDescription>,
        ),
        CommandInfo::new("account.Move", User, "Move account to a folder", decoder::<account::Move>),
        CommandInfo::new("account.Delete", User, "Delete an account", decoder::<account::Delete>),
        // --- Secrets ---
        CommandInfo::new("account.AddPassword", User, "Add a password", decoder::<secret::AddPassword>),
        CommandInfo::new(
            "account.AddSecretNote",
            User,
            "Add a secret note",
            decoder::<secret::AddSecretNote>,
        ),
        CommandInfo::new("account.AddOtpToken", User, "Add a TOTP token", decoder::<secret::AddOtpToken>),
        CommandInfo::new("account.AddKeylist", User, "Add a keylist", decoder::<secret::AddKeylist>),
        CommandInfo::new("account.AddSshKey", User, "Add an SSH private key", decoder::<secret::AddSshKey>),
        CommandInfo::new(
            "account.AddExternalU2FToken",
            User,
            "Note an external U2F token",
            decoder::<secret::AddExternalU2fToken>,
        ),
        CommandInfo::new(
            "account.AddExternalYubicoOtpToken",
            User,
            "Note an external Yubico OTP token",
            decoder::<secret::AddExternalYubicoOtpToken>,
        ),
        CommandInfo::new("account.DeleteSecret", User, "Delete a secret", decoder::<secret::DeleteSecret>),
        // ═══════════════════════════════════════════════════════════════════
        // FOLDERS
        // ═══════════════════════════════════════════════════════════════════
        CommandInfo::new("folder.Create", User, "Create a folder", decoder::<folder::Create>),
        CommandInfo::new("folder.Rename", User, "Rename a folder", decoder::<folder::Rename>),
        CommandInfo::new("folder.Move", User, "Move a folder", decoder::<folder::Move>),
        CommandInfo::new("folder.Delete", User, "Delete an empty folder", decoder::<folder::Delete>),
        // ═══════════════════════════════════════════════════════════════════
        // USERS
        // ═══════════════════════════════════════════════════════════════════
        CommandInfo::new("user.Create", Register, "Register a user", decoder::<user::Create>),
        CommandInfo::new(
            "user.ChangePassword",
            User,
            "Change the login password",
            decoder::<user::ChangePassword>,
        ),
        CommandInfo::new(
            "user.AddAccessToken",
            User,
            "Issue an API access token",
            decoder::<user::AddAccessToken>,
        ),
        CommandInfo::new(
            "user.RegisterU2fToken",
            User,
            "Register a verified U2F token",
            decoder::<user::RegisterU2fToken>,
        ),
        CommandInfo::new(
            "user.UnlockDecryptionKey",
            User,
            "Unlock the decryption key",
            decoder::<user::UnlockDecryptionKey>,
        ),
        CommandInfo::new(
            "user.ChangeDecryptionKeyPassword",
            User,
            "Re-seal the decryption key",
            decoder::<user::ChangeDecryptionKeyPassword>,
        ),
        // ═══════════════════════════════════════════════════════════════════
        // SESSIONS
        // ═══════════════════════════════════════════════════════════════════
        CommandInfo::new("session.SignIn", SignIn, "Sign in", decoder::<session::SignIn>),
    ];

    commands.into_iter().map(|c| (c.name, c)).collect()
});

/// Get command info by name
pub fn get_command_info(name: &str) -> Option<&'static CommandInfo> {
    COMMAND_REGISTRY.get(name)
}

/// Check if command is supported
pub fn is_command_supported(name: &str) -> bool {
    COMMAND_REGISTRY.contains_key(name)
}

/// Get all commands for a scope
pub fn get_commands_by_scope(scope: CommandScope) -> Vec<&'static str> {
    let mut names: Vec<_> = COMMAND_REGISTRY
        .values()
        .filter(|c| c.scope == scope)
        .map(|c| c.name)
        .collect();
    names.sort_unstable();
    names
}
