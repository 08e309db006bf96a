// crates/session-gate-core/tests/store_fixtures.rs
// ============================================================================
// Module: Session Store Fixture Tests
// Description: In-memory store lookup and fixture loading.
// Purpose: Verify cookie lookup rules and fail-closed fixture parsing.
// ============================================================================

//! Tests for [`session_gate_core::MemorySessionStore`] and its factories.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::fs;

use serde_json::json;
use session_gate_core::FixtureStoreFactory;
use session_gate_core::MemorySessionStore;
use session_gate_core::MemoryStoreFactory;
use session_gate_core::RequestContext;
use session_gate_core::SessionError;
use session_gate_core::SessionStore;
use session_gate_core::SessionStoreFactory;
use session_gate_core::SessionValues;
use session_gate_core::store::MAX_FIXTURE_BYTES;
use session_gate_core::store::MAX_SESSION_ID_LENGTH;

const FIXTURE: &str = r#"{
    "default": {
        "alice": {"authed": true, "user": "alice"},
        "bob": {"authed": false}
    },
    "admin": {
        "root_1": {"loggedIn": true}
    }
}"#;

#[test]
fn fixture_sessions_are_looked_up_by_cookie() {
    let store = MemorySessionStore::from_fixture_json(FIXTURE.as_bytes()).unwrap();
    let request = RequestContext::new("User.Get").with_cookie("default", "alice");
    let session = store.get(&request, "default").unwrap();
    assert_eq!(session.name(), "default");
    assert_eq!(session.get("authed"), Some(&json!(true)));
    assert_eq!(session.get("user"), Some(&json!("alice")));

    let admin = RequestContext::new("Admin.Get").with_cookie("admin", "root_1");
    let session = store.get(&admin, "admin").unwrap();
    assert_eq!(session.get("loggedIn"), Some(&json!(true)));
}

#[test]
fn missing_cookie_or_unknown_id_yields_empty_session() {
    let store = MemorySessionStore::from_fixture_json(FIXTURE.as_bytes()).unwrap();
    let no_cookie = store.get(&RequestContext::new("User.Get"), "default").unwrap();
    assert!(no_cookie.is_empty());

    let unknown = RequestContext::new("User.Get").with_cookie("default", "carol");
    assert!(store.get(&unknown, "default").unwrap().is_empty());

    let other_name = RequestContext::new("User.Get").with_cookie("default", "alice");
    assert!(store.get(&other_name, "admin").unwrap().is_empty());
}

#[test]
fn malformed_cookie_is_rejected() {
    let store = MemorySessionStore::new();
    let too_long = "a".repeat(MAX_SESSION_ID_LENGTH + 1);
    for id in ["", "has space", "semi;colon", "dot.ted", too_long.as_str()] {
        let request = RequestContext::new("User.Get").with_cookie("default", id);
        let err = store.get(&request, "default").unwrap_err();
        assert!(matches!(err, SessionError::Malformed(_)), "id {id:?} gave {err:?}");
    }
}

#[test]
fn insert_and_remove_update_shared_state() {
    let store = MemorySessionStore::new();
    let clone = store.clone();
    let mut values = SessionValues::new();
    values.insert("authed".to_string(), json!(true));
    store.insert("default", "sid-9", values).unwrap();

    let request = RequestContext::new("User.Get").with_cookie("default", "sid-9");
    assert_eq!(clone.get(&request, "default").unwrap().get("authed"), Some(&json!(true)));
    assert!(store.remove("default", "sid-9").unwrap());
    assert!(!store.remove("default", "sid-9").unwrap());
    assert!(clone.get(&request, "default").unwrap().is_empty());

    let err = store.insert("default", "bad id", SessionValues::new()).unwrap_err();
    assert!(matches!(err, SessionError::Malformed(_)));
}

#[test]
fn malformed_fixture_is_rejected() {
    for document in ["not json", r#"{"default": []}"#, r#"{"default": {"bad id": {}}}"#] {
        let err = MemorySessionStore::from_fixture_json(document.as_bytes()).unwrap_err();
        assert!(matches!(err, SessionError::Unavailable(_)), "{document} gave {err:?}");
    }
}

#[test]
fn oversized_fixture_is_rejected() {
    let document = vec![b' '; MAX_FIXTURE_BYTES + 1];
    let err = MemorySessionStore::from_fixture_json(&document).unwrap_err();
    assert!(err.to_string().contains("size limit"));
}

#[test]
fn fixture_factory_reads_file_on_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sessions.json");
    fs::write(&path, FIXTURE).unwrap();

    let factory = FixtureStoreFactory::new(&path);
    assert_eq!(factory.path(), path.as_path());
    let store = factory.open_store().unwrap();
    let request = RequestContext::new("User.Get").with_cookie("default", "bob");
    assert_eq!(store.get(&request, "default").unwrap().get("authed"), Some(&json!(false)));
}

#[test]
fn fixture_factory_fails_for_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let factory = FixtureStoreFactory::new(dir.path().join("missing.json"));
    let err = factory.open_store().unwrap_err();
    assert!(matches!(err, SessionError::Unavailable(_)));
}

#[test]
fn memory_factory_shares_its_store() {
    let factory = MemoryStoreFactory::new(MemorySessionStore::new());
    let opened = factory.open_store().unwrap();
    let mut values = SessionValues::new();
    values.insert("authed".to_string(), json!(true));
    factory.store().insert("default", "late", values).unwrap();
    let request = RequestContext::new("User.Get").with_cookie("default", "late");
    assert_eq!(opened.get(&request, "default").unwrap().get("authed"), Some(&json!(true)));
}
