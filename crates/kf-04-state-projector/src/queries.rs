//! # Queries
//!
//! Read-only views over [`UserState`]. Nothing here decrypts; exposing
//! secret content is the query service's job.

use std::collections::VecDeque;

use shared_types::{AccountId, FolderId};

use crate::domain::{
    Account, AccountSummary, AuditEntry, Folder, FolderView, U2fToken, User, UserState,
};

impl UserState {
    /// The user, once created.
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Folder by id.
    pub fn folder(&self, id: &FolderId) -> Option<&Folder> {
        self.folders.get(id)
    }

    /// Account by id, with its secrets.
    pub fn account(&self, id: &AccountId) -> Option<&Account> {
        self.accounts.get(id)
    }

    /// All accounts, in id order.
    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    /// Direct children of a folder, sorted by name.
    pub fn subfolders(&self, parent: &FolderId) -> Vec<&Folder> {
        let mut children: Vec<_> = self
            .folders
            .values()
            .filter(|f| f.parent_id.as_ref() == Some(parent))
            .collect();
        children.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        children
    }

    /// Accounts directly inside a folder, sorted by title.
    pub fn accounts_in_folder(&self, folder: &FolderId) -> Vec<&Account> {
        let mut accounts: Vec<_> = self
            .accounts
            .values()
            .filter(|a| &a.folder_id == folder)
            .collect();
        accounts.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.id.cmp(&b.id)));
        accounts
    }

    /// Ancestors of a folder, root first, excluding the folder itself.
    pub fn parent_chain(&self, id: &FolderId) -> Vec<&Folder> {
        let mut chain = Vec::new();
        let mut current = self.folders.get(id).and_then(|f| f.parent_id.as_ref());

        // at most one lap around a cyclic tree
        while let Some(parent_id) = current {
            if chain.len() >= self.folders.len() {
                break;
            }
            let Some(parent) = self.folders.get(parent_id) else {
                break;
            };
            chain.push(parent);
            current = parent.parent_id.as_ref();
        }

        chain.reverse();
        chain
    }

    /// Folder with its parents, subfolders and accounts.
    pub fn folder_view(&self, id: &FolderId) -> Option<FolderView> {
        let folder = self.folders.get(id)?;

        Some(FolderView {
            folder: folder.clone(),
            parents: self.parent_chain(id).into_iter().cloned().collect(),
            subfolders: self.subfolders(id).into_iter().cloned().collect(),
            accounts: self
                .accounts_in_folder(id)
                .into_iter()
                .map(AccountSummary::from)
                .collect(),
        })
    }

    /// Whether a folder has neither subfolders nor accounts.
    pub fn folder_is_empty(&self, id: &FolderId) -> bool {
        !self.folders.values().any(|f| f.parent_id.as_ref() == Some(id))
            && !self.accounts.values().any(|a| &a.folder_id == id)
    }

    /// Whether `id` is `ancestor` or lies below it.
    pub fn folder_is_within(&self, id: &FolderId, ancestor: &FolderId) -> bool {
        id == ancestor || self.parent_chain(id).iter().any(|f| &f.id == ancestor)
    }

    /// All accounts as summaries, sorted by title. With `ssh_only`, only
    /// accounts holding an SSH key.
    pub fn list_accounts(&self, ssh_only: bool) -> Vec<AccountSummary> {
        let mut accounts: Vec<_> = self
            .accounts
            .values()
            .filter(|a| !ssh_only || a.has_ssh_key())
            .map(AccountSummary::from)
            .collect();
        accounts.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.id.cmp(&b.id)));
        accounts
    }

    /// Accounts whose title contains `query`, case-insensitively.
    pub fn search_accounts(&self, query: &str) -> Vec<AccountSummary> {
        let needle = query.to_lowercase();
        self.list_accounts(false)
            .into_iter()
            .filter(|a| a.title.to_lowercase().contains(&needle))
            .collect()
    }

    /// Folders whose name contains `query`, case-insensitively.
    pub fn search_folders(&self, query: &str) -> Vec<&Folder> {
        let needle = query.to_lowercase();
        self.folders
            .values()
            .filter(|f| f.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Audit log, newest first.
    pub fn audit_log(&self) -> &VecDeque<AuditEntry> {
        &self.audit_log
    }

    /// Registered U2F tokens, in registration order.
    pub fn u2f_tokens(&self) -> &[U2fToken] {
        &self.u2f_tokens
    }

    /// U2F token by key handle.
    pub fn u2f_token(&self, key_handle: &str) -> Option<&U2fToken> {
        self.u2f_tokens.iter().find(|t| t.key_handle == key_handle)
    }
}
