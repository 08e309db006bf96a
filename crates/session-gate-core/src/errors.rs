// crates/session-gate-core/src/errors.rs
// ============================================================================
// Module: Gate Error Catalog
// Description: Deny error kinds, localized message tables, and error registry.
// Purpose: Turn gate denials into structured, locale-aware error payloads.
// Dependencies: crate::i18n, serde
// ============================================================================

//! ## Overview
//! Every deny outcome maps to one [`SessionErrorKind`] in the `session` error
//! group. An [`ErrorRegistry`] holds groups of [`ErrorDefine`]s (kind name,
//! numeric code, locale table) and renders them as [`LocalizedError`]s.
//!
//! ## Invariants
//! - Numeric codes are stable: init failure `0`, get failure `1`, not
//!   authenticated `2`.
//! - Lookups fall back to `en_us`, then to the kind name; they never fail.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::i18n::Locale;

// ============================================================================
// SECTION: Error Kinds
// ============================================================================

/// Error group for session gate denials.
pub const SESSION_ERROR_GROUP: &str = "session";

/// Reasons a request is denied by the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SessionErrorKind {
    /// The session store was never made available.
    SessionInitFailed,
    /// The session could not be retrieved for this request.
    SessionGetFailed,
    /// The session is not marked authenticated.
    SessionNotAuthed,
}

impl SessionErrorKind {
    /// All kinds in code order.
    pub const ALL: [Self; 3] =
        [Self::SessionInitFailed, Self::SessionGetFailed, Self::SessionNotAuthed];

    /// Returns the stable numeric code.
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::SessionInitFailed => 0,
            Self::SessionGetFailed => 1,
            Self::SessionNotAuthed => 2,
        }
    }

    /// Returns the stable kind name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SessionInitFailed => "SessionInitFailed",
            Self::SessionGetFailed => "SessionGetFailed",
            Self::SessionNotAuthed => "SessionNotAuthed",
        }
    }
}

impl fmt::Display for SessionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// SECTION: Error Defines
// ============================================================================

/// Definition of one error kind within a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorDefine {
    /// Kind name rendered in responses.
    pub name: &'static str,
    /// Numeric code, unique within the group.
    pub code: u32,
    /// Message per locale.
    pub messages: &'static [(Locale, &'static str)],
}

impl ErrorDefine {
    /// Returns the message for `locale`, falling back to English.
    #[must_use]
    pub fn message(&self, locale: Locale) -> Option<&'static str> {
        self.lookup(locale).or_else(|| self.lookup(Locale::EnUs))
    }

    /// Returns the message for exactly `locale`.
    fn lookup(&self, locale: Locale) -> Option<&'static str> {
        self.messages.iter().find(|(candidate, _)| *candidate == locale).map(|(_, text)| *text)
    }
}

/// Error definitions for the `session` group.
pub const SESSION_ERROR_DEFINES: &[ErrorDefine] = &[
    ErrorDefine {
        name: "SessionInitFailed",
        code: 0,
        messages: &[(Locale::EnUs, "Session init failed!"), (Locale::ZhCn, "会话初始化失败！")],
    },
    ErrorDefine {
        name: "SessionGetFailed",
        code: 1,
        messages: &[(Locale::EnUs, "Failed to get session!"), (Locale::ZhCn, "会话获取失败！")],
    },
    ErrorDefine {
        name: "SessionNotAuthed",
        code: 2,
        messages: &[(Locale::EnUs, "Session is not authed!"), (Locale::ZhCn, "会话未认证！")],
    },
];

// ============================================================================
// SECTION: Localized Errors
// ============================================================================

/// Structured, localized error payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalizedError {
    /// Error group (for example `session`).
    pub group: String,
    /// Kind name (for example `SessionNotAuthed`).
    pub kind: String,
    /// Numeric code within the group.
    pub code: u32,
    /// Localized message.
    pub message: String,
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Registry of error groups used to render localized errors.
#[derive(Debug, Clone, Default)]
pub struct ErrorRegistry {
    /// Error definitions keyed by group, then by code.
    groups: BTreeMap<String, BTreeMap<u32, ErrorDefine>>,
}

impl ErrorRegistry {
    /// Builds an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry with the `session` group registered.
    #[must_use]
    pub fn with_session_errors() -> Self {
        let mut registry = Self::new();
        registry.register_session_errors();
        registry
    }

    /// Registers (or replaces) the definitions of `group`.
    pub fn register_group(&mut self, group: &str, defines: &[ErrorDefine]) {
        let entries = defines.iter().map(|define| (define.code, *define)).collect();
        self.groups.insert(group.to_string(), entries);
    }

    /// Registers the `session` group.
    pub fn register_session_errors(&mut self) {
        self.register_group(SESSION_ERROR_GROUP, SESSION_ERROR_DEFINES);
    }

    /// Returns true when `group` is registered.
    #[must_use]
    pub fn has_group(&self, group: &str) -> bool {
        self.groups.contains_key(group)
    }

    /// Renders the error `code` of `group` for `locale`.
    #[must_use]
    pub fn localize(&self, group: &str, code: u32, locale: Locale) -> LocalizedError {
        let define = self.groups.get(group).and_then(|entries| entries.get(&code));
        match define {
            Some(define) => LocalizedError {
                group: group.to_string(),
                kind: define.name.to_string(),
                code,
                message: define.message(locale).unwrap_or(define.name).to_string(),
            },
            None => LocalizedError {
                group: group.to_string(),
                kind: format!("{group}.{code}"),
                code,
                message: format!("{group} error {code}"),
            },
        }
    }

    /// Renders a session gate error for `locale`.
    #[must_use]
    pub fn session_error(&self, kind: SessionErrorKind, locale: Locale) -> LocalizedError {
        self.localize(SESSION_ERROR_GROUP, kind.code(), locale)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
