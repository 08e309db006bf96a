// crates/session-gate-core/src/store.rs
// ============================================================================
// Module: Session Gate In-Memory Store
// Description: Cookie-keyed in-memory session store and store factories.
// Purpose: Provide a concrete session store for servers, demos, and tests.
// Dependencies: crate::session, serde_json
// ============================================================================

//! ## Overview
//! [`MemorySessionStore`] keeps session values in memory, keyed by session
//! name and session id. The session id is read from the request cookie named
//! after the session. A missing cookie or an unknown id yields an empty
//! session (the request is simply not logged in); a cookie that is not a
//! well-formed id is a retrieval failure.
//!
//! Stores can be pre-populated from a JSON fixture file of the form
//! `{"<session name>": {"<session id>": {"<key>": <value>}}}`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::RwLock;

use crate::request::RequestContext;
use crate::session::Session;
use crate::session::SessionError;
use crate::session::SessionStore;
use crate::session::SessionStoreFactory;
use crate::session::SessionValues;
use crate::session::SharedSessionStore;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum fixture file size in bytes.
pub const MAX_FIXTURE_BYTES: usize = 1024 * 1024;
/// Maximum session id length.
pub const MAX_SESSION_ID_LENGTH: usize = 128;

/// Fixture layout: session name, then session id, then values.
type SessionTable = BTreeMap<String, BTreeMap<String, SessionValues>>;

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// In-memory session store keyed by cookie session id.
#[derive(Debug, Default, Clone)]
pub struct MemorySessionStore {
    /// Sessions by name and id, shared across clones.
    sessions: Arc<RwLock<SessionTable>>,
}

impl MemorySessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a fixture document into a store.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Unavailable`] when the document is too large
    /// or malformed, or holds an invalid session id.
    pub fn from_fixture_json(bytes: &[u8]) -> Result<Self, SessionError> {
        if bytes.len() > MAX_FIXTURE_BYTES {
            return Err(SessionError::Unavailable("session fixture exceeds size limit".to_string()));
        }
        let table: SessionTable = serde_json::from_slice(bytes)
            .map_err(|err| SessionError::Unavailable(format!("invalid session fixture: {err}")))?;
        for session_id in table.values().flat_map(BTreeMap::keys) {
            validate_session_id(session_id).map_err(|err| {
                SessionError::Unavailable(format!("invalid session fixture: {err}"))
            })?;
        }
        Ok(Self {
            sessions: Arc::new(RwLock::new(table)),
        })
    }

    /// Loads a fixture file into a store.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Unavailable`] when the file cannot be read or
    /// parsed.
    pub fn from_fixture_file(path: &Path) -> Result<Self, SessionError> {
        let bytes = fs::read(path).map_err(|err| {
            SessionError::Unavailable(format!("failed to read {}: {err}", path.display()))
        })?;
        Self::from_fixture_json(&bytes)
    }

    /// Stores `values` for the session `name` under `session_id`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when the id is malformed or the lock is
    /// poisoned.
    pub fn insert(
        &self,
        name: &str,
        session_id: &str,
        values: SessionValues,
    ) -> Result<(), SessionError> {
        validate_session_id(session_id)?;
        let mut guard = self
            .sessions
            .write()
            .map_err(|_| SessionError::Backend("session store lock poisoned".to_string()))?;
        guard.entry(name.to_string()).or_default().insert(session_id.to_string(), values);
        Ok(())
    }

    /// Removes the session `name` stored under `session_id`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Backend`] when the lock is poisoned.
    pub fn remove(&self, name: &str, session_id: &str) -> Result<bool, SessionError> {
        let mut guard = self
            .sessions
            .write()
            .map_err(|_| SessionError::Backend("session store lock poisoned".to_string()))?;
        Ok(guard.get_mut(name).and_then(|sessions| sessions.remove(session_id)).is_some())
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, request: &RequestContext, session_name: &str) -> Result<Session, SessionError> {
        let Some(session_id) = request.cookie(session_name) else {
            return Ok(Session::new(session_name));
        };
        validate_session_id(session_id)?;
        let guard = self
            .sessions
            .read()
            .map_err(|_| SessionError::Backend("session store lock poisoned".to_string()))?;
        let values = guard
            .get(session_name)
            .and_then(|sessions| sessions.get(session_id))
            .cloned()
            .unwrap_or_default();
        Ok(Session::with_values(session_name, values))
    }
}

// ============================================================================
// SECTION: Factories
// ============================================================================

/// Factory handing out a shared in-memory store.
#[derive(Debug, Default, Clone)]
pub struct MemoryStoreFactory {
    /// Store returned on every open.
    store: MemorySessionStore,
}

impl MemoryStoreFactory {
    /// Builds a factory around `store`.
    #[must_use]
    pub const fn new(store: MemorySessionStore) -> Self {
        Self {
            store,
        }
    }

    /// Returns the store handed out by this factory.
    #[must_use]
    pub const fn store(&self) -> &MemorySessionStore {
        &self.store
    }
}

impl SessionStoreFactory for MemoryStoreFactory {
    fn open_store(&self) -> Result<SharedSessionStore, SessionError> {
        Ok(SharedSessionStore::from_store(self.store.clone()))
    }
}

/// Factory loading an in-memory store from a fixture file on open.
#[derive(Debug, Clone)]
pub struct FixtureStoreFactory {
    /// Fixture file path.
    path: PathBuf,
}

impl FixtureStoreFactory {
    /// Builds a factory reading `path` on open.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
        }
    }

    /// Returns the fixture path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStoreFactory for FixtureStoreFactory {
    fn open_store(&self) -> Result<SharedSessionStore, SessionError> {
        MemorySessionStore::from_fixture_file(&self.path).map(SharedSessionStore::from_store)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Validates a session id taken from a cookie or fixture.
fn validate_session_id(session_id: &str) -> Result<(), SessionError> {
    if session_id.is_empty() {
        return Err(SessionError::Malformed("empty session id".to_string()));
    }
    if session_id.len() > MAX_SESSION_ID_LENGTH {
        return Err(SessionError::Malformed("session id too long".to_string()));
    }
    if !session_id.bytes().all(|byte| byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_')
    {
        return Err(SessionError::Malformed("session id has invalid characters".to_string()));
    }
    Ok(())
}
