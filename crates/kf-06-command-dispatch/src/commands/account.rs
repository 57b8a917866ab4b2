//! Account metadata commands.

use kf_02_event_model::{
    AccountCreated, AccountDeleted, AccountDescriptionChanged, AccountMoved, AccountRenamed,
    AccountUrlChanged, AccountUsernameChanged, PasswordAdded,
};
use serde::Deserialize;
use shared_types::{AccountId, FolderId, SecretId};
use url::Url;

use super::Command;
use crate::domain::{CommandError, Ctx};

/// `account.Create`
#[derive(Deserialize)]
pub struct Create {
    pub folder_id: FolderId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password_repeat: String,
    #[serde(default)]
    pub url: String,
}

impl Create {
    fn title(&self) -> Result<String, CommandError> {
        if !self.title.is_empty() {
            return Ok(self.title.clone());
        }
        if self.url.is_empty() {
            return Err(CommandError::TitleOrUrlRequired);
        }
        url_host(&self.url)?.ok_or(CommandError::TitleOrUrlRequired)
    }
}

/// Host of an account URL. Relative references such as `example.com` are
/// accepted as typed and have no host.
fn url_host(raw: &str) -> Result<Option<String>, CommandError> {
    let url = match Url::parse(raw) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse("relative:///")?.join(raw)?,
        Err(err) => return Err(err.into()),
    };
    Ok(url
        .host_str()
        .filter(|host| !host.is_empty())
        .map(str::to_string))
}

impl Command for Create {
    fn validate(&self) -> Result<(), CommandError> {
        self.title()?;
        if !self.url.is_empty() {
            url_host(&self.url)?;
        }
        // an empty repeat means "not asked"
        if !self.password.is_empty()
            && !self.password_repeat.is_empty()
            && self.password != self.password_repeat
        {
            return Err(CommandError::PasswordsDiffer);
        }
        Ok(())
    }

    fn invoke(&self, ctx: &mut Ctx<'_>) -> Result<(), CommandError> {
        ctx.folder(&self.folder_id)?;

        let title = self.title()?;
        let password = if self.password.is_empty() {
            None
        } else {
            Some(ctx.encrypt(self.password.as_bytes())?)
        };

        let id = AccountId::random();

        ctx.raise_event(AccountCreated {
            id: id.clone(),
            folder_id: self.folder_id.clone(),
            title,
        });

        if !self.username.is_empty() {
            ctx.raise_event(AccountUsernameChanged {
                id: id.clone(),
                username: self.username.clone(),
            });
        }

        if let Some(password) = password {
            ctx.raise_event(PasswordAdded {
                account: id.clone(),
                id: SecretId::random(),
                password,
            });
        }

        if !self.url.is_empty() {
            ctx.raise_event(AccountUrlChanged {
                id,
                url: self.url.clone(),
            });
        }

        Ok(())
    }
}

/// `account.Rename`
#[derive(Debug, Deserialize)]
pub struct Rename {
    pub account: AccountId,
    pub title: String,
}

impl Command for Rename {
    fn validate(&self) -> Result<(), CommandError> {
        if self.title.is_empty() {
            return Err(CommandError::Required("title"));
        }
        Ok(())
    }

    fn invoke(&self, ctx: &mut Ctx<'_>) -> Result<(), CommandError> {
        ctx.account(&self.account)?;
        ctx.raise_event(AccountRenamed {
            id: self.account.clone(),
            title: self.title.clone(),
        });
        Ok(())
    }
}

/// `account.ChangeUsername`
#[derive(Debug, Deserialize)]
pub struct ChangeUsername {
    pub account: AccountId,
    #[serde(default)]
    pub username: String,
}

impl Command for ChangeUsername {
    fn invoke(&self, ctx: &mut Ctx<'_>) -> Result<(), CommandError> {
        ctx.account(&self.account)?;
        ctx.raise_event(AccountUsernameChanged {
            id: self.account.clone(),
            username: self.username.clone(),
        });
        Ok(())
    }
}

/// `account.ChangeUrl`. An empty URL clears it.
#[derive(Debug, Deserialize)]
pub struct ChangeUrl {
    pub account: AccountId,
    #[serde(default)]
    pub url: String,
}

impl Command for ChangeUrl {
    fn validate(&self) -> Result<(), CommandError> {
        if !self.url.is_empty() {
            url_host(&self.url)?;
        }
        Ok(())
    }

    fn invoke(&self, ctx: &mut Ctx<'_>) -> Result<(), CommandError> {
        ctx.account(&self.account)?;
        ctx.raise_event(AccountUrlChanged {
            id: self.account.clone(),
            url: self.url.clone(),
        });
        Ok(())
    }
}

/// `account.ChangeDescription`
#[derive(Debug, Deserialize)]
pub struct ChangeDescription {
    pub account: AccountId,
    #[serde(default)]
    pub description: String,
}

impl Command for ChangeDescription {
    fn invoke(&self, ctx: &mut Ctx<'_>) -> Result<(), CommandError> {
        ctx.account(&self.account)?;
        ctx.raise_event(AccountDescriptionChanged {
            id: self.account.clone(),
            description: self.description.clone(),
        });
        Ok(())
    }
}

/// `account.Move`
#[derive(Debug, Deserialize)]
pub struct Move {
    pub account: AccountId,
    pub new_parent_folder: FolderId,
}

impl Command for Move {
    fn invoke(&self, ctx: &mut Ctx<'_>) -> Result<(), CommandError> {
        ctx.account(&self.account)?;
        ctx.folder(&self.new_parent_folder)?;
        ctx.raise_event(AccountMoved {
            id: self.account.clone(),
            new_parent_folder: self.new_parent_folder.clone(),
        });
        Ok(())
    }
}

/// `account.Delete`
#[derive(Debug, Deserialize)]
pub struct Delete {
    pub account: AccountId,
}

impl Command for Delete {
    fn invoke(&self, ctx: &mut Ctx<'_>) -> Result<(), CommandError> {
        ctx.account(&self.account)?;
        ctx.raise_event(AccountDeleted {
            id: self.account.clone(),
        });
        Ok(())
    }
}
