// crates/session-gate-core/src/request.rs
// ============================================================================
// Module: Gate Request Context
// Description: Transport-neutral view of one inbound request.
// Purpose: Carry the action, cookies, and locale the gate needs to decide.
// Dependencies: crate::i18n
// ============================================================================

//! ## Overview
//! Transports build a [`RequestContext`] per inbound request. The gate reads
//! the action; session stores read the cookies; error rendering reads the
//! locale. The context is never mutated once built.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use crate::i18n::Locale;

// ============================================================================
// SECTION: Request Context
// ============================================================================

/// Per-request context used for gate decisions.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Logical action identifier resolved by upstream routing.
    pub action: String,
    /// Request cookies keyed by cookie name.
    pub cookies: BTreeMap<String, String>,
    /// Preferred locale for error messages.
    pub locale: Locale,
    /// Optional request identifier for auditing.
    pub request_id: Option<String>,
}

impl RequestContext {
    /// Builds a context for `action` with no cookies.
    #[must_use]
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            ..Self::default()
        }
    }

    /// Returns a copy with the cookie `name` set to `value`.
    #[must_use]
    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    /// Returns a copy with the locale set.
    #[must_use]
    pub const fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Returns a copy with the request identifier set.
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Returns the cookie value for `name`, if present.
    #[must_use]
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }
}
