// crates/session-gate-core/src/auth_key.rs
// ============================================================================
// Module: Auth Key Path
// Description: Parsing of the composite `<session>.<key>` auth flag location.
// Purpose: Resolve which session and which entry hold the auth flag.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! The auth key path names the session (by session name) and the boolean
//! entry inside it that marks the session as authenticated. Parsing splits on
//! the first `.` only; anything after it belongs to the key. A path without a
//! separator targets the [`DEFAULT_SESSION_NAME`] session.
//!
//! Parsing never fails. An empty component leaves the gate without a usable
//! key, which the gate treats as "feature off".

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Session name used when the auth key has no separator.
pub const DEFAULT_SESSION_NAME: &str = "default";
/// Default auth key path.
pub const DEFAULT_AUTH_KEY: &str = "default.authed";
/// Separator between session name and session key.
const SEPARATOR: char = '.';

// ============================================================================
// SECTION: Auth Key Path
// ============================================================================

/// Resolved session name and session key for the auth flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthKeyPath {
    /// Session name passed to the session store.
    session_name: String,
    /// Entry inside the session holding the auth flag.
    session_key: String,
}

impl AuthKeyPath {
    /// Parses `raw` by splitting on the first separator.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.split_once(SEPARATOR) {
            Some((name, key)) => Self {
                session_name: name.to_string(),
                session_key: key.to_string(),
            },
            None => Self {
                session_name: DEFAULT_SESSION_NAME.to_string(),
                session_key: raw.to_string(),
            },
        }
    }

    /// Returns the session name.
    #[must_use]
    pub fn session_name(&self) -> &str {
        &self.session_name
    }

    /// Returns the session key.
    #[must_use]
    pub fn session_key(&self) -> &str {
        &self.session_key
    }

    /// Returns true when both components are non-empty.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        !self.session_name.is_empty() && !self.session_key.is_empty()
    }
}

impl Default for AuthKeyPath {
    fn default() -> Self {
        Self::parse(DEFAULT_AUTH_KEY)
    }
}

impl fmt::Display for AuthKeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{SEPARATOR}{}", self.session_name, self.session_key)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
