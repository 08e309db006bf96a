// crates/session-gate-core/src/matcher.rs
// ============================================================================
// Module: Action Matcher
// Description: Whitelist/blacklist glob matching for action identifiers.
// Purpose: Decide whether an action is subject to the session gate.
// Dependencies: globset, thiserror
// ============================================================================

//! ## Overview
//! An action is gated if and only if it matches at least one whitelist entry
//! and no blacklist entry. Both lists are compiled once into [`GlobSet`]s;
//! the result is a set-membership test, so entry order never changes the
//! outcome. An empty whitelist gates nothing.
//!
//! Patterns use `globset` syntax (`*`, `?`, `[...]`, `{a,b}`). Separators are
//! not special, so `User.*` matches `User.Login` and `*` matches every action.
//! Metacharacters are syntax in every entry, including entries without `*`:
//! the literal action `Get[1]` is written `Get\[1\]`. Backslash escapes are
//! enabled on every platform.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;

use globset::GlobBuilder;
use globset::GlobSet;
use globset::GlobSetBuilder;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Pattern that matches every action.
pub const WILDCARD: &str = "*";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Pattern compilation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MatcherError {
    /// A whitelist or blacklist entry is not a valid glob.
    #[error("invalid {list} pattern `{pattern}`: {reason}")]
    InvalidPattern {
        /// List the pattern belongs to (`whitelist` or `blacklist`).
        list: &'static str,
        /// Offending pattern text.
        pattern: String,
        /// Compiler diagnostic.
        reason: String,
    },
}

// ============================================================================
// SECTION: Matcher
// ============================================================================

/// Compiled whitelist/blacklist pair for action identifiers.
#[derive(Debug, Clone)]
pub struct ActionMatcher {
    /// Actions the gate applies to.
    whitelist: PatternList,
    /// Actions exempt from the gate even when whitelisted.
    blacklist: PatternList,
}

impl ActionMatcher {
    /// Compiles whitelist and blacklist patterns.
    ///
    /// # Errors
    ///
    /// Returns [`MatcherError`] when any entry fails to compile.
    pub fn new<S: AsRef<str>>(whitelist: &[S], blacklist: &[S]) -> Result<Self, MatcherError> {
        Ok(Self {
            whitelist: PatternList::compile("whitelist", whitelist)?,
            blacklist: PatternList::compile("blacklist", blacklist)?,
        })
    }

    /// Returns true when `action` is subject to the gate.
    #[must_use]
    pub fn matches(&self, action: &str) -> bool {
        self.whitelist.is_match(action) && !self.blacklist.is_match(action)
    }

    /// Returns the whitelist patterns in configured order.
    #[must_use]
    pub fn whitelist(&self) -> &[String] {
        &self.whitelist.patterns
    }

    /// Returns the blacklist patterns in configured order.
    #[must_use]
    pub fn blacklist(&self) -> &[String] {
        &self.blacklist.patterns
    }
}

/// One compiled pattern list.
#[derive(Debug, Clone)]
struct PatternList {
    /// Source patterns, kept for diagnostics.
    patterns: Vec<String>,
    /// Compiled glob set.
    set: GlobSet,
    /// True when the list contains the bare wildcard.
    match_all: bool,
}

impl PatternList {
    /// Compiles a pattern list, tagging errors with `list`.
    fn compile<S: AsRef<str>>(list: &'static str, patterns: &[S]) -> Result<Self, MatcherError> {
        let mut builder = GlobSetBuilder::new();
        let mut sources = Vec::with_capacity(patterns.len());
        let mut match_all = false;
        for pattern in patterns {
            let pattern = pattern.as_ref();
            if pattern == WILDCARD {
                match_all = true;
            }
            let glob =
                GlobBuilder::new(pattern).backslash_escape(true).build().map_err(|err| {
                    MatcherError::InvalidPattern {
                        list,
                        pattern: pattern.to_string(),
                        reason: err.kind().to_string(),
                    }
                })?;
            builder.add(glob);
            sources.push(pattern.to_string());
        }
        let set = builder.build().map_err(|err| MatcherError::InvalidPattern {
            list,
            pattern: err.glob().unwrap_or_default().to_string(),
            reason: err.kind().to_string(),
        })?;
        Ok(Self {
            patterns: sources,
            set,
            match_all,
        })
    }

    /// Returns true when any pattern matches `action`.
    fn is_match(&self, action: &str) -> bool {
        if self.match_all {
            return true;
        }
        !self.patterns.is_empty() && self.set.is_match(Path::new(action))
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::use_debug, reason = "Test-only assertions.")]

    use super::*;

    fn matcher(whitelist: &[&str], blacklist: &[&str]) -> ActionMatcher {
        ActionMatcher::new(whitelist, blacklist).unwrap()
    }

    #[test]
    fn wildcard_gates_everything() {
        let matcher = matcher(&["*"], &[]);
        for action in ["", "Login", "User.Get", "a/b/c", "line\nbreak"] {
            assert!(matcher.matches(action), "{action:?} should be gated");
        }
    }

    #[test]
    fn empty_whitelist_gates_nothing() {
        let matcher = matcher(&[], &[]);
        assert!(!matcher.matches("Login"));
        assert!(!matcher.matches(""));
    }

    #[test]
    fn literal_entries_match_exactly() {
        let matcher = matcher(&["User.Get"], &[]);
        assert!(matcher.matches("User.Get"));
        assert!(!matcher.matches("User.GetAll"));
        assert!(!matcher.matches("user.get"));
    }

    #[test]
    fn metacharacters_are_glob_syntax() {
        let matcher = matcher(&["Get[1]", "List{A,B}"], &[]);
        assert!(matcher.matches("Get1"));
        assert!(!matcher.matches("Get[1]"));
        assert!(matcher.matches("ListB"));
    }

    #[test]
    fn escaped_metacharacters_match_literally() {
        let matcher = matcher(&[r"Get\[1\]", r"Find\?"], &[]);
        assert!(matcher.matches("Get[1]"));
        assert!(!matcher.matches("Get1"));
        assert!(matcher.matches("Find?"));
        assert!(!matcher.matches("FindX"));
    }

    #[test]
    fn blacklist_wins_over_whitelist() {
        let matcher = matcher(&["User.*"], &["User.Login"]);
        assert!(matcher.matches("User.Get"));
        assert!(!matcher.matches("User.Login"));
    }

    #[test]
    fn blacklist_wildcard_disables_gate() {
        let matcher = matcher(&["*"], &["*"]);
        assert!(!matcher.matches("Anything"));
    }

    #[test]
    fn invalid_pattern_names_list() {
        let err = ActionMatcher::new(&["ok"], &["[unclosed"]).unwrap_err();
        match err {
            MatcherError::InvalidPattern {
                list,
                pattern,
                ..
            } => {
                assert_eq!(list, "blacklist");
                assert_eq!(pattern, "[unclosed");
            }
        }
    }

    #[test]
    fn patterns_are_kept_in_order() {
        let matcher = matcher(&["b", "a"], &["z"]);
        assert_eq!(matcher.whitelist(), ["b".to_string(), "a".to_string()]);
        assert_eq!(matcher.blacklist(), ["z".to_string()]);
    }
}
