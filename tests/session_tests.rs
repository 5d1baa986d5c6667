// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session persistence tests.

use getsetride::models::UserPatch;
use getsetride::session::{FileStorage, Session, SessionStorage, SessionStore};
use std::sync::Arc;
use tempfile::TempDir;

mod common;

fn session() -> Session {
    Session {
        token: common::VALID_TOKEN.to_string(),
        user: common::test_user(),
    }
}

fn file_store(dir: &TempDir) -> (Arc<FileStorage>, SessionStore) {
    let storage = Arc::new(FileStorage::new(dir.path().join("nested").join("session.json")));
    let store = SessionStore::restore(storage.clone());
    (storage, store)
}

#[test]
fn test_session_survives_restart() {
    let dir = TempDir::new().unwrap();

    let (storage, store) = file_store(&dir);
    assert!(!store.check_auth());
    store.establish(session()).unwrap();
    assert!(storage.path().exists());

    let (_, restored) = file_store(&dir);
    assert!(restored.check_auth());
    assert_eq!(restored.snapshot(), Some(session()));
}

#[test]
fn test_persisted_format_keeps_token_and_user_together() {
    let dir = TempDir::new().unwrap();
    let (storage, store) = file_store(&dir);
    store.establish(session()).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(storage.path()).unwrap()).unwrap();
    assert_eq!(raw["authToken"], common::VALID_TOKEN);
    assert_eq!(raw["user"]["email"], "asha@example.com");
}

#[test]
fn test_logout_clears_both_halves() {
    let dir = TempDir::new().unwrap();
    let (storage, store) = file_store(&dir);
    store.establish(session()).unwrap();

    store.logout();

    assert!(!store.check_auth());
    assert!(store.token().is_none());
    assert!(store.current_user().is_none());
    assert!(!storage.path().exists());
    assert!(storage.load().unwrap().is_none());

    // Logging out again is fine.
    store.logout();
}

#[test]
fn test_null_record_is_logged_out() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, "null").unwrap();

    let storage = Arc::new(FileStorage::new(&path));
    assert!(storage.load().unwrap().is_none());
    assert!(!SessionStore::restore(storage).check_auth());
}

#[cfg(unix)]
#[test]
fn test_logout_sticks_when_file_cannot_be_removed() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");
    let store = SessionStore::restore(Arc::new(FileStorage::new(&path)));
    store.establish(session()).unwrap();

    // Unlinking needs write access to the directory; the file itself stays writable.
    std::fs::set_permissions(dir.path(), std::fs::Permissions::from_mode(0o555)).unwrap();
    store.logout();
    std::fs::set_permissions(dir.path(), std::fs::Permissions::from_mode(0o755)).unwrap();

    assert!(!store.check_auth());
    let restored = SessionStore::restore(Arc::new(FileStorage::new(&path)));
    assert!(!restored.check_auth());
    assert!(restored.snapshot().is_none());
}

#[test]
fn test_corrupt_record_starts_logged_out() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, "{\"authToken\": \"tok-123\"").unwrap();

    let storage = Arc::new(FileStorage::new(&path));
    assert!(storage.load().is_err());

    let store = SessionStore::restore(storage);
    assert!(!store.check_auth());
    assert!(!path.exists());
}

#[test]
fn test_token_without_user_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, r#"{"authToken": "tok-123"}"#).unwrap();

    let store = SessionStore::restore(Arc::new(FileStorage::new(&path)));
    assert!(store.token().is_none());
}

#[test]
fn test_profile_updates_are_persisted() {
    let dir = TempDir::new().unwrap();
    let (storage, store) = file_store(&dir);

    // No session: nothing to update.
    store
        .update_user(&UserPatch {
            name: Some("Nobody".to_string()),
            phone: None,
        })
        .unwrap();
    assert!(!storage.path().exists());

    store.establish(session()).unwrap();
    store
        .update_user(&UserPatch {
            name: Some("Asha R.".to_string()),
            phone: Some("9876543210".to_string()),
        })
        .unwrap();

    let persisted = storage.load().unwrap().unwrap();
    assert_eq!(persisted.token, common::VALID_TOKEN);
    assert_eq!(persisted.user.name, "Asha R.");
    assert_eq!(store.current_user().unwrap().phone.as_deref(), Some("9876543210"));
}

#[test]
fn test_rejection_of_replaced_token_keeps_new_session() {
    let dir = TempDir::new().unwrap();
    let (storage, store) = file_store(&dir);
    store.establish(session()).unwrap();

    // A 401 for a request sent before the re-login.
    assert!(!store.invalidate_token("tok-old", "Token expired"));
    assert_eq!(store.token().as_deref(), Some(common::VALID_TOKEN));
    assert!(storage.load().unwrap().is_some());

    assert!(store.invalidate_token(common::VALID_TOKEN, "Token expired"));
    assert!(!store.check_auth());
    assert!(storage.load().unwrap().is_none());

    assert!(!store.invalidate_token(common::VALID_TOKEN, "Token expired"));
}

#[test]
fn test_invalidate_shared_between_clones() {
    let store = common::logged_in_session();
    let reader = store.clone();

    store.invalidate("Token expired");

    assert!(!reader.check_auth());
}
