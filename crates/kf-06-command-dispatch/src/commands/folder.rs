//! Folder commands.
//!
//! The tree stays rooted and acyclic: root cannot be moved or deleted, and a
//! folder cannot be moved below itself.

use kf_02_event_model::{FolderCreated, FolderDeleted, FolderMoved, FolderRenamed};
use serde::Deserialize;
use shared_types::FolderId;

use super::Command;
use crate::domain::{CommandError, Ctx};

/// `folder.Create`
#[derive(Debug, Deserialize)]
pub struct Create {
    pub parent: FolderId,
    pub name: String,
}

impl Command for Create {
    fn validate(&self) -> Result<(), CommandError> {
        if self.name.is_empty() {
            return Err(CommandError::Required("name"));
        }
        Ok(())
    }

    fn invoke(&self, ctx: &mut Ctx<'_>) -> Result<(), CommandError> {
        ctx.folder(&self.parent)?;
        ctx.raise_event(FolderCreated {
            id: FolderId::random(),
            parent_id: self.parent.clone(),
            name: self.name.clone(),
        });
        Ok(())
    }
}

/// `folder.Rename`
#[derive(Debug, Deserialize)]
pub struct Rename {
    pub id: FolderId,
    pub name: String,
}

impl Command for Rename {
    fn validate(&self) -> Result<(), CommandError> {
        if self.name.is_empty() {
            return Err(CommandError::Required("name"));
        }
        Ok(())
    }

    fn invoke(&self, ctx: &mut Ctx<'_>) -> Result<(), CommandError> {
        ctx.folder(&self.id)?;
        ctx.raise_event(FolderRenamed {
            id: self.id.clone(),
            name: self.name.clone(),
        });
        Ok(())
    }
}

/// `folder.Move`
#[derive(Debug, Deserialize)]
pub struct Move {
    pub id: FolderId,
    pub new_parent: FolderId,
}

impl Command for Move {
    fn validate(&self) -> Result<(), CommandError> {
        if self.id.is_root() {
            return Err(CommandError::MoveRootFolder);
        }
        Ok(())
    }

    fn invoke(&self, ctx: &mut Ctx<'_>) -> Result<(), CommandError> {
        ctx.folder(&self.id)?;
        ctx.folder(&self.new_parent)?;

        if ctx.state().folder_is_within(&self.new_parent, &self.id) {
            return Err(CommandError::FolderCycle);
        }

        ctx.raise_event(FolderMoved {
            id: self.id.clone(),
            parent_id: self.new_parent.clone(),
        });
        Ok(())
    }
}

/// `folder.Delete`. Only empty folders can go.
#[derive(Debug, Deserialize)]
pub struct Delete {
    pub id: FolderId,
}

impl Command for Delete {
    fn validate(&self) -> Result<(), CommandError> {
        if self.id.is_root() {
            return Err(CommandError::DeleteRootFolder);
        }
        Ok(())
    }

    fn invoke(&self, ctx: &mut Ctx<'_>) -> Result<(), CommandError> {
        ctx.folder(&self.id)?;

        if !ctx.state().folder_is_empty(&self.id) {
            return Err(CommandError::FolderNotEmpty);
        }

        ctx.raise_event(FolderDeleted {
            id: self.id.clone(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::*;
    use kf_02_event_model::EventPayload;
    use kf_04_state_projector::UserState;
    use serde_json::json;

    fn create(state: &UserState, parent: &str, name: &str) -> (FolderId, UserState) {
        let (events, state) =
            run_and_apply(state, "folder.Create", json!({ "parent": parent, "name": name }))
                .unwrap();
        let EventPayload::FolderCreated(created) = &events[0].payload else {
            panic!("expected FolderCreated");
        };
        (created.id.clone(), state)
    }

    #[test]
    fn test_create_and_rename() {
        let (id, state) = create(&BASE, "fld1", "Sub");
        assert_eq!(state.folder(&id).unwrap().parent_id, Some(FolderId::new("fld1")));

        let (_, state) = run_and_apply(
            &state,
            "folder.Rename",
            json!({ "id": id.as_str(), "name": "Renamed" }),
        )
        .unwrap();
        assert_eq!(state.folder(&id).unwrap().name, "Renamed");
    }

    #[test]
    fn test_create_under_missing_parent() {
        let err = run(&BASE, "folder.Create", json!({ "parent": "nope", "name": "x" })).unwrap_err();
        assert_eq!(err.to_string(), "Folder not found");
    }

    #[test]
    fn test_delete_non_empty_folder() {
        // fld1 holds acc1
        let err = run(&BASE, "folder.Delete", json!({ "id": "fld1" })).unwrap_err();
        assert_eq!(err.to_string(), "folder not empty");

        let (_, state) = run_and_apply(&BASE, "account.Delete", json!({ "account": "acc1" })).unwrap();
        let (sub, state) = create(&state, "fld1", "Sub");

        let err = run(&state, "folder.Delete", json!({ "id": "fld1" })).unwrap_err();
        assert_eq!(err.to_string(), "folder not empty");

        let (_, state) = run_and_apply(&state, "folder.Delete", json!({ "id": sub.as_str() })).unwrap();
        let (_, state) = run_and_apply(&state, "folder.Delete", json!({ "id": "fld1" })).unwrap();
        assert!(state.folder(&FolderId::new("fld1")).is_none());
    }

    #[test]
    fn test_root_is_permanent() {
        let err = run(&BASE, "folder.Delete", json!({ "id": "root" })).unwrap_err();
        assert!(matches!(err, CommandError::DeleteRootFolder));

        let err = run(&BASE, "folder.Move", json!({ "id": "root", "new_parent": "fld1" })).unwrap_err();
        assert!(matches!(err, CommandError::MoveRootFolder));
    }

    #[test]
    fn test_move_rejects_cycles() {
        let (sub, state) = create(&BASE, "fld1", "Sub");

        let err = run(&state, "folder.Move", json!({ "id": "fld1", "new_parent": sub.as_str() }))
            .unwrap_err();
        assert!(matches!(err, CommandError::FolderCycle));

        let err = run(&state, "folder.Move", json!({ "id": "fld1", "new_parent": "fld1" })).unwrap_err();
        assert!(matches!(err, CommandError::FolderCycle));

        let (_, state) = run_and_apply(
            &state,
            "folder.Move",
            json!({ "id": sub.as_str(), "new_parent": "root" }),
        )
        .unwrap();
        assert_eq!(state.folder(&sub).unwrap().parent_id, Some(FolderId::root()));
    }
}
