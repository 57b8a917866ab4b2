//! # Projection
//!
//! One arm per event kind. The match has no wildcard: adding a kind to the
//! event model without handling it here does not compile.

use kf_02_event_model::{Event, EventKind, EventPayload};
use kf_03_event_log::Projector;
use kf_05_key_material::{KeyMaterial, SealedKey};
use shared_types::{AccountId, FolderId, SecretId};
use tracing::trace;

use crate::domain::{
    AccessToken, Account, Folder, ProjectionError, Secret, SecretPayload, U2fToken, User,
    UserState,
};

impl Projector for UserState {
    type Error = ProjectionError;

    fn apply(&mut self, event: &Event) -> Result<(), ProjectionError> {
        let kind = event.kind();
        let at = event.meta.timestamp;

        match &event.payload {
            EventPayload::UserCreated(e) => {
                if self.user.is_some() {
                    return Err(ProjectionError::UserExists { kind });
                }
                self.user = Some(User {
                    id: e.id.clone(),
                    username: e.username.clone(),
                    created: at,
                    password_hash: String::new(),
                    password_last_changed: None,
                    access_token: None,
                });
            }
            EventPayload::UserPasswordUpdated(e) => {
                let user = self.user_mut(kind)?;
                user.password_hash = e.password.clone();
                if !e.automatic_upgrade {
                    user.password_last_changed = Some(at);
                }
            }
            EventPayload::UserAccessTokenAdded(e) => {
                self.user_mut(kind)?.access_token = Some(AccessToken {
                    id: e.token_id.clone(),
                    token: e.token.clone(),
                    description: e.description.clone(),
                });
            }
            EventPayload::UserU2fTokenRegistered(e) => {
                self.u2f_tokens.push(U2fToken {
                    name: e.name.clone(),
                    enrolled_at: at,
                    key_handle: e.key_handle.clone(),
                    registration_data: e.registration_data.clone(),
                    client_data: e.client_data.clone(),
                    version: e.version.clone(),
                    counter: 0,
                });
            }
            EventPayload::UserU2fTokenUsed(e) => {
                let token = self
                    .u2f_tokens
                    .iter_mut()
                    .find(|t| t.key_handle == e.key_handle)
                    .ok_or_else(|| ProjectionError::U2fTokenNotFound {
                        kind,
                        key_handle: e.key_handle.clone(),
                    })?;
                token.counter = e.counter;
            }
            EventPayload::MasterPasswordChanged(e) => {
                let sealed = SealedKey::from_event(e)
                    .map_err(|source| ProjectionError::KeyMaterial { kind, source })?;
                self.key_material = Some(KeyMaterial::install(self.key_material.as_ref(), sealed));
                self.audit(at, "Changed the decryption key password".to_string());
            }
            EventPayload::DatabaseUnsealed(_) => {
                self.audit(at, "Unlocked the decryption key".to_string());
            }
            EventPayload::SessionSignedIn(e) => {
                self.audit(
                    at,
                    format!("Signed in with IP {} with {}", e.ip_address, e.user_agent),
                );
            }

            EventPayload::FolderCreated(e) => {
                if self.folders.contains_key(&e.id) {
                    return Err(ProjectionError::FolderExists {
                        kind,
                        id: e.id.clone(),
                    });
                }
                self.require_folder(kind, &e.parent_id)?;
                self.folders.insert(
                    e.id.clone(),
                    Folder {
                        id: e.id.clone(),
                        parent_id: Some(e.parent_id.clone()),
                        name: e.name.clone(),
                    },
                );
            }
            EventPayload::FolderMoved(e) => {
                if e.id.is_root() {
                    return Err(ProjectionError::RootFolder { kind });
                }
                self.require_folder(kind, &e.parent_id)?;
                self.folder_mut(kind, &e.id)?.parent_id = Some(e.parent_id.clone());
            }
            EventPayload::FolderRenamed(e) => {
                self.folder_mut(kind, &e.id)?.name = e.name.clone();
            }
            EventPayload::FolderDeleted(e) => {
                if e.id.is_root() {
                    return Err(ProjectionError::RootFolder { kind });
                }
                if self.folders.remove(&e.id).is_none() {
                    return Err(ProjectionError::FolderNotFound {
                        kind,
                        id: e.id.clone(),
                    });
                }
            }

            EventPayload::AccountCreated(e) => {
                if self.accounts.contains_key(&e.id) {
                    return Err(ProjectionError::AccountExists {
                        kind,
                        id: e.id.clone(),
                    });
                }
                self.require_folder(kind, &e.folder_id)?;
                self.accounts.insert(
                    e.id.clone(),
                    Account {
                        id: e.id.clone(),
                        folder_id: e.folder_id.clone(),
                        title: e.title.clone(),
                        username: String::new(),
                        url: String::new(),
                        description: String::new(),
                        created: at,
                        secrets: Vec::new(),
                    },
                );
            }
            EventPayload::AccountRenamed(e) => {
                self.account_mut(kind, &e.id)?.title = e.title.clone();
            }
            EventPayload::AccountUsernameChanged(e) => {
                self.account_mut(kind, &e.id)?.username = e.username.clone();
            }
            EventPayload::AccountUrlChanged(e) => {
                self.account_mut(kind, &e.id)?.url = e.url.clone();
            }
            EventPayload::AccountDescriptionChanged(e) => {
                self.account_mut(kind, &e.id)?.description = e.description.clone();
            }
            EventPayload::AccountMoved(e) => {
                self.require_folder(kind, &e.new_parent_folder)?;
                self.account_mut(kind, &e.id)?.folder_id = e.new_parent_folder.clone();
            }
            EventPayload::AccountDeleted(e) => {
                if self.accounts.remove(&e.id).is_none() {
                    return Err(ProjectionError::AccountNotFound {
                        kind,
                        id: e.id.clone(),
                    });
                }
            }

            EventPayload::PasswordAdded(e) => {
                self.add_secret(
                    kind,
                    &e.account,
                    Secret {
                        id: e.id.clone(),
                        created: at,
                        title: String::new(),
                        payload: SecretPayload::Password {
                            password: e.password.clone(),
                        },
                    },
                )?;
            }
            EventPayload::SecretNoteAdded(e) => {
                self.add_secret(
                    kind,
                    &e.account,
                    Secret {
                        id: e.id.clone(),
                        created: at,
                        title: e.title.clone(),
                        payload: SecretPayload::Note {
                            note: e.note.clone(),
                        },
                    },
                )?;
            }
            EventPayload::OtpTokenAdded(e) => {
                self.add_secret(
                    kind,
                    &e.account,
                    Secret {
                        id: e.id.clone(),
                        created: at,
                        title: String::new(),
                        payload: SecretPayload::OtpToken {
                            otp_provisioning_url: e.otp_provisioning_url.clone(),
                        },
                    },
                )?;
            }
            EventPayload::KeylistAdded(e) => {
                self.add_secret(
                    kind,
                    &e.account,
                    Secret {
                        id: e.id.clone(),
                        created: at,
                        title: e.title.clone(),
                        payload: SecretPayload::Keylist {
                            key_example: e.key_example.clone(),
                            keys: e.keys.clone(),
                        },
                    },
                )?;
            }
            EventPayload::SshKeyAdded(e) => {
                self.add_secret(
                    kind,
                    &e.account,
                    Secret {
                        id: e.id.clone(),
                        created: at,
                        title: String::new(),
                        payload: SecretPayload::SshKey {
                            ssh_private_key: e.ssh_private_key.clone(),
                            ssh_public_key_authorized: e.ssh_public_key_authorized.clone(),
                        },
                    },
                )?;
            }
            EventPayload::ExternalTokenAdded(e) => {
                self.add_secret(
                    kind,
                    &e.account,
                    Secret {
                        id: e.id.clone(),
                        created: at,
                        title: e.description.clone(),
                        payload: SecretPayload::ExternalToken { kind: e.kind },
                    },
                )?;
            }
            EventPayload::SecretDeleted(e) => {
                let account = self.account_mut(kind, &e.account)?;
                let index = account
                    .secrets
                    .iter()
                    .position(|s| s.id == e.secret)
                    .ok_or_else(|| ProjectionError::SecretNotFound {
                        kind,
                        account: e.account.clone(),
                        secret: e.secret.clone(),
                    })?;
                account.secrets.remove(index);
            }
            EventPayload::SecretUsed(e) => {
                // audit only; the account may be gone by the time this is read
                let ids = e
                    .secrets
                    .iter()
                    .map(SecretId::as_str)
                    .collect::<Vec<_>>()
                    .join(" ");
                self.audit(
                    at,
                    format!("Account {} secret [{}] - {}", e.account, ids, e.used_type),
                );
            }
        }

        trace!(kind = %kind, "[kf-04] event applied");
        Ok(())
    }
}

impl UserState {
    fn user_mut(&mut self, kind: EventKind) -> Result<&mut User, ProjectionError> {
        self.user
            .as_mut()
            .ok_or(ProjectionError::UserMissing { kind })
    }

    fn require_folder(&self, kind: EventKind, id: &FolderId) -> Result<(), ProjectionError> {
        if self.folders.contains_key(id) {
            Ok(())
        } else {
            Err(ProjectionError::FolderNotFound {
                kind,
                id: id.clone(),
            })
        }
    }

    fn folder_mut(&mut self, kind: EventKind, id: &FolderId) -> Result<&mut Folder, ProjectionError> {
        self.folders
            .get_mut(id)
            .ok_or_else(|| ProjectionError::FolderNotFound {
                kind,
                id: id.clone(),
            })
    }

    fn account_mut(
        &mut self,
        kind: EventKind,
        id: &AccountId,
    ) -> Result<&mut Account, ProjectionError> {
        self.accounts
            .get_mut(id)
            .ok_or_else(|| ProjectionError::AccountNotFound {
                kind,
                id: id.clone(),
            })
    }

    fn add_secret(
        &mut self,
        kind: EventKind,
        account: &AccountId,
        secret: Secret,
    ) -> Result<(), ProjectionError> {
        let owner = self.account_mut(kind, account)?;
        if owner.secret(&secret.id).is_some() {
            return Err(ProjectionError::SecretExists {
                kind,
                account: account.clone(),
                secret: secret.id,
            });
        }
        owner.secrets.push(secret);
        Ok(())
    }
}
