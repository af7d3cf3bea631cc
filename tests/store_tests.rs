//! Persistence properties of the encrypted store

use chrono::Utc;
use moodlog::domain::{Entry, EntryCollection, EntryDraft, Username};
use moodlog::infrastructure::EntryStore;
use moodlog::JournalError;
use std::fs;
use std::time::{Duration, Instant};
use tempfile::TempDir;

mod common;
use common::test_store;

fn alice() -> Username {
    "alice".parse().unwrap()
}

fn collection(bodies: &[&str]) -> EntryCollection {
    bodies
        .iter()
        .enumerate()
        .map(|(i, body)| {
            Entry::from_draft(
                EntryDraft::new(*body, (i % 10) as i64 + 1)
                    .with_mood("steady")
                    .with_tags(["test"]),
                Utc::now(),
            )
            .unwrap()
        })
        .collect()
}

#[test]
fn test_round_trip() {
    let temp = TempDir::new().unwrap();
    let store = test_store(temp.path());
    store.create_user(&alice(), "pw123").unwrap();

    let original = collection(&["one", "two", "three"]);
    store.save(&alice(), "pw123", &original).unwrap();

    assert_eq!(store.load(&alice(), "pw123").unwrap(), original);
}

#[test]
fn test_wrong_password() {
    let temp = TempDir::new().unwrap();
    let store = test_store(temp.path());
    store.create_user(&alice(), "pw123").unwrap();
    store.save(&alice(), "pw123", &collection(&["secret"])).unwrap();

    let err = store.load(&alice(), "pw124").unwrap_err();
    assert!(matches!(err, JournalError::Authentication(_)));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_file_does_not_contain_plaintext() {
    let temp = TempDir::new().unwrap();
    let store = test_store(temp.path());
    store.create_user(&alice(), "pw123").unwrap();
    store
        .save(&alice(), "pw123", &collection(&["my very private thought"]))
        .unwrap();

    let raw = fs::read(store.journal_path(&alice())).unwrap();
    assert!(raw.starts_with(b"MLOG"));
    let haystack = String::from_utf8_lossy(&raw);
    assert!(!haystack.contains("private thought"));
}

#[test]
fn test_corrupted_file_is_authentication_error() {
    let temp = TempDir::new().unwrap();
    let store = test_store(temp.path());
    store.create_user(&alice(), "pw123").unwrap();

    let path = store.journal_path(&alice());
    let mut raw = fs::read(&path).unwrap();
    let last = raw.len() - 1;
    raw[last] ^= 0xff;
    fs::write(&path, &raw).unwrap();

    assert!(matches!(
        store.load(&alice(), "pw123"),
        Err(JournalError::Authentication(_))
    ));

    fs::write(&path, b"MLOG").unwrap();
    assert!(matches!(
        store.load(&alice(), "pw123"),
        Err(JournalError::Authentication(_))
    ));
}

#[test]
fn test_damaged_cost_header_fails_fast() {
    let temp = TempDir::new().unwrap();
    let store = test_store(temp.path());
    store.create_user(&alice(), "pw123").unwrap();

    let path = store.journal_path(&alice());
    let pristine = fs::read(&path).unwrap();

    // memory_kib, iterations, parallelism
    for offset in [5, 9, 13] {
        let mut raw = pristine.clone();
        raw[offset..offset + 4].copy_from_slice(&u32::MAX.to_le_bytes());
        fs::write(&path, &raw).unwrap();

        let started = Instant::now();
        let result = store.load(&alice(), "pw123");
        assert!(matches!(result, Err(JournalError::Authentication(_))));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    let mut raw = pristine.clone();
    raw[9..13].copy_from_slice(&200_000u32.to_le_bytes());
    fs::write(&path, &raw).unwrap();
    assert!(matches!(
        store.load(&alice(), "pw123"),
        Err(JournalError::Authentication(_))
    ));
}

#[test]
fn test_backup_holds_previous_contents() {
    let temp = TempDir::new().unwrap();
    let store = test_store(temp.path());
    store.create_user(&alice(), "pw123").unwrap();

    let first = collection(&["first"]);
    store.save(&alice(), "pw123", &first).unwrap();
    store
        .save(&alice(), "pw123", &collection(&["first", "second"]))
        .unwrap();

    let backup = store.latest_backup(&alice()).unwrap().unwrap();
    assert_eq!(store.load_from(&backup, "pw123").unwrap(), first);
}

#[test]
fn test_backup_retention() {
    let temp = TempDir::new().unwrap();
    let store = test_store(temp.path()).with_backup_retention(2);
    store.create_user(&alice(), "pw123").unwrap();

    let mut snapshots = Vec::new();
    for i in 0..5 {
        let snapshot = collection(&vec!["entry"; i + 1]);
        store.save(&alice(), "pw123", &snapshot).unwrap();
        snapshots.push(snapshot);
    }

    let backups = store.backups(&alice()).unwrap();
    assert_eq!(backups.len(), 2);
    // oldest first: the files saved third and fourth
    assert_eq!(store.load_from(&backups[0], "pw123").unwrap(), snapshots[2]);
    assert_eq!(store.load_from(&backups[1], "pw123").unwrap(), snapshots[3]);
}

#[test]
fn test_users_are_isolated() {
    let temp = TempDir::new().unwrap();
    let store = test_store(temp.path());
    let bob: Username = "bob".parse().unwrap();

    store.create_user(&alice(), "pw-a").unwrap();
    store.create_user(&bob, "pw-b").unwrap();
    store.save(&alice(), "pw-a", &collection(&["alice's"])).unwrap();

    assert!(store.load(&bob, "pw-b").unwrap().is_empty());
    assert!(store.backups(&bob).unwrap().is_empty());
    assert!(matches!(
        store.load(&bob, "pw-a"),
        Err(JournalError::Authentication(_))
    ));
}
