// crates/session-gate-core/src/session.rs
// ============================================================================
// Module: Session Model
// Description: Opaque session mapping and the session store interfaces.
// Purpose: Define the contract surfaces the gate uses to read session state.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! A [`Session`] is an opaque mapping from string keys to tagged JSON values,
//! scoped to one request and one session name. The gate only ever asks it for
//! the auth flag via [`Session::flag`], which keeps "missing", "not a
//! boolean", and "boolean" apart.
//!
//! Session stores are external collaborators. [`SessionStoreFactory`] models
//! the application handing out its store at initialization time; a factory
//! failure leaves the gate unconfigured instead of aborting startup.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::request::RequestContext;

// ============================================================================
// SECTION: Session
// ============================================================================

/// Session values keyed by entry name.
pub type SessionValues = BTreeMap<String, Value>;

/// Session state for one (request, session name) pair.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Session {
    /// Session name the state was loaded for.
    name: String,
    /// Stored session entries.
    values: SessionValues,
}

impl Session {
    /// Builds an empty session.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: SessionValues::new(),
        }
    }

    /// Builds a session from existing values.
    #[must_use]
    pub fn with_values(name: impl Into<String>, values: SessionValues) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Returns the session name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Stores `value` under `key`, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key.into(), value.into())
    }

    /// Returns true when the session holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Inspects the entry under `key` as an auth flag.
    #[must_use]
    pub fn flag(&self, key: &str) -> AuthFlag {
        match self.values.get(key) {
            None => AuthFlag::Missing,
            Some(Value::Bool(value)) => AuthFlag::Bool(*value),
            Some(_) => AuthFlag::NotBoolean,
        }
    }
}

/// Outcome of reading an auth flag from a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFlag {
    /// No entry under the key.
    Missing,
    /// Entry exists but is not a boolean.
    NotBoolean,
    /// Boolean entry.
    Bool(bool),
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Session store failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Store could not be opened or is not available.
    #[error("session store unavailable: {0}")]
    Unavailable(String),
    /// Session token in the request is malformed or tampered with.
    #[error("malformed session token: {0}")]
    Malformed(String),
    /// Backend failure while loading the session.
    #[error("session backend error: {0}")]
    Backend(String),
}

// ============================================================================
// SECTION: Store Interfaces
// ============================================================================

/// Backend-agnostic session store.
pub trait SessionStore: Send + Sync {
    /// Loads the session named `session_name` for `request`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when the session cannot be loaded.
    fn get(&self, request: &RequestContext, session_name: &str) -> Result<Session, SessionError>;
}

/// Shared session store backed by an `Arc` trait object.
#[derive(Clone)]
pub struct SharedSessionStore {
    /// Inner store implementation.
    inner: Arc<dyn SessionStore>,
}

impl SharedSessionStore {
    /// Wraps a session store in a shared, clonable wrapper.
    #[must_use]
    pub fn from_store(store: impl SessionStore + 'static) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }
}

impl std::fmt::Debug for SharedSessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedSessionStore").finish_non_exhaustive()
    }
}

impl SessionStore for SharedSessionStore {
    fn get(&self, request: &RequestContext, session_name: &str) -> Result<Session, SessionError> {
        self.inner.get(request, session_name)
    }
}

/// Source of the session store handed to the gate at initialization.
pub trait SessionStoreFactory: Send + Sync {
    /// Opens (or returns) the session store.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when no store is available.
    fn open_store(&self) -> Result<SharedSessionStore, SessionError>;
}

impl<F> SessionStoreFactory for F
where
    F: Fn() -> Result<SharedSessionStore, SessionError> + Send + Sync,
{
    fn open_store(&self) -> Result<SharedSessionStore, SessionError> {
        self()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
