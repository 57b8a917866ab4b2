//! # Log Replay Flows
//!
//! Event model, event log and state projector together, on real files.
//!
//! 1. **Scenario**: an account created in root with a username shows up in
//!    the root folder view
//! 2. **Determinism**: replaying the same file twice yields the same state
//! 3. **Batch boundary**: an empty batch changes neither file nor state
//! 4. **Corruption**: a damaged log refuses to open

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use kf_02_event_model::{
        AccountCreated, AccountUsernameChanged, Event, EventMeta, EventPayload, FolderCreated,
        UserCreated,
    };
    use kf_03_event_log::{EventLog, EventLogError, FileLogStore};
    use kf_04_state_projector::UserState;
    use shared_types::{AccountId, FolderId, Timestamp};
    use tempfile::TempDir;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn at(minute: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2021, 6, 1, 9, minute, 0).unwrap()
    }

    fn ev(minute: u32, payload: impl Into<EventPayload>) -> Event {
        Event::new(EventMeta::new(at(minute), "1"), payload)
    }

    fn history() -> Vec<Event> {
        vec![
            ev(
                0,
                UserCreated {
                    id: "1".into(),
                    username: "joonas".into(),
                },
            ),
            ev(
                1,
                AccountCreated {
                    id: AccountId::new("acc1"),
                    folder_id: FolderId::root(),
                    title: "google.com".into(),
                },
            ),
            ev(
                2,
                AccountUsernameChanged {
                    id: AccountId::new("acc1"),
                    username: "joonas".into(),
                },
            ),
        ]
    }

    fn open(dir: &TempDir) -> EventLog<FileLogStore, UserState> {
        let store = FileLogStore::open(dir.path().join("1.log")).unwrap();
        EventLog::open(store, UserState::new()).unwrap()
    }

    // =============================================================================
    // SCENARIOS
    // =============================================================================

    #[test]
    fn test_root_folder_lists_created_account() {
        let dir = TempDir::new().unwrap();
        let mut log = open(&dir);
        log.append(&history()).unwrap();

        let view = log.state().folder_view(&FolderId::root()).unwrap();

        assert_eq!(view.accounts.len(), 1);
        assert_eq!(view.accounts[0].title, "google.com");
        assert_eq!(view.accounts[0].username, "joonas");
        assert!(view.parents.is_empty());
    }

    #[test]
    fn test_replay_is_deterministic() {
        let dir = TempDir::new().unwrap();
        {
            let mut log = open(&dir);
            log.append(&history()[..1]).unwrap();
            log.append(&history()[1..]).unwrap();
            log.append(&[ev(
                3,
                FolderCreated {
                    id: FolderId::new("fld1"),
                    parent_id: FolderId::root(),
                    name: "Work".into(),
                },
            )])
            .unwrap();
        }

        let first = open(&dir);
        let second = open(&dir);

        assert_eq!(first.len(), 4);
        assert_eq!(first.state(), second.state());
        assert_eq!(first.state().subfolders(&FolderId::root()).len(), 1);
    }

    #[test]
    fn test_empty_batch_is_noop() {
        let dir = TempDir::new().unwrap();
        let mut log = open(&dir);
        log.append(&history()).unwrap();
        let bytes = log.store().len();
        let state = log.state().clone();

        log.append(&[]).unwrap();

        assert_eq!(log.store().len(), bytes);
        assert_eq!(log.len(), 3);
        assert_eq!(log.state(), &state);
    }

    #[test]
    fn test_corrupt_log_refuses_to_open() {
        let dir = TempDir::new().unwrap();
        {
            let mut log = open(&dir);
            log.append(&history()).unwrap();
        }
        let path = dir.path().join("1.log");
        let mut contents = std::fs::read_to_string(&path).unwrap();
        contents = contents.replacen("AccountCreated", "AccountExploded", 1);
        std::fs::write(&path, contents).unwrap();

        let store = FileLogStore::open(&path).unwrap();
        let err = EventLog::open(store, UserState::new()).err().unwrap();

        assert!(matches!(err, EventLogError::Corrupt { line: 2, .. }));
        assert!(err.is_fatal());
    }
}
