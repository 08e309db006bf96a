// crates/session-gate-core/src/accessor.rs
// ============================================================================
// Module: Session Accessor
// Description: Request-scoped session lookup over an optional store handle.
// Purpose: Separate "store never available" from "store failed this request".
// Dependencies: crate::session, thiserror
// ============================================================================

//! ## Overview
//! The accessor wraps the store handle obtained at gate initialization. A
//! missing handle is a configuration failure surfaced lazily on first use;
//! a store error is a per-request retrieval failure. Neither is ever folded
//! into an unauthenticated outcome.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::request::RequestContext;
use crate::session::Session;
use crate::session::SessionError;
use crate::session::SessionStore;
use crate::session::SharedSessionStore;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Session access failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// No store handle was obtained during initialization.
    #[error("session store not initialized")]
    StoreUnavailable,
    /// The store failed to produce the session.
    #[error("session retrieval failed: {0}")]
    Retrieval(#[from] SessionError),
}

// ============================================================================
// SECTION: Accessor
// ============================================================================

/// Session accessor bound to the store handle chosen at initialization.
#[derive(Clone, Default)]
pub struct SessionAccessor {
    /// Store handle, absent when initialization failed.
    store: Option<SharedSessionStore>,
}

impl SessionAccessor {
    /// Builds an accessor over an optional store handle.
    #[must_use]
    pub const fn new(store: Option<SharedSessionStore>) -> Self {
        Self {
            store,
        }
    }

    /// Returns true when a store handle is present.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.store.is_some()
    }

    /// Loads the session named `session_name` for `request`.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::StoreUnavailable`] without a store handle and
    /// [`AccessError::Retrieval`] when the store fails.
    pub fn get(
        &self,
        request: &RequestContext,
        session_name: &str,
    ) -> Result<Session, AccessError> {
        let store = self.store.as_ref().ok_or(AccessError::StoreUnavailable)?;
        Ok(store.get(request, session_name)?)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only assertions.")]

    use super::*;

    /// Store that rejects every request.
    struct BrokenStore;

    impl SessionStore for BrokenStore {
        fn get(&self, _request: &RequestContext, _name: &str) -> Result<Session, SessionError> {
            Err(SessionError::Malformed("bad signature".to_string()))
        }
    }

    #[test]
    fn missing_store_is_unavailable() {
        let accessor = SessionAccessor::new(None);
        assert!(!accessor.is_available());
        let err = accessor.get(&RequestContext::new("Login"), "default").unwrap_err();
        assert_eq!(err, AccessError::StoreUnavailable);
    }

    #[test]
    fn store_errors_are_retrieval_failures() {
        let accessor = SessionAccessor::new(Some(SharedSessionStore::from_store(BrokenStore)));
        let err = accessor.get(&RequestContext::new("Login"), "default").unwrap_err();
        assert!(matches!(err, AccessError::Retrieval(SessionError::Malformed(_))));
    }
}
