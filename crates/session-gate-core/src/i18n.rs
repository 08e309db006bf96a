// crates/session-gate-core/src/i18n.rs
// ============================================================================
// Module: Locale Selection
// Description: Supported locales for user-facing gate error messages.
// Purpose: Provide a stable locale type shared by the error catalog and CLI.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Locales are parsed leniently (case-insensitive, `-` or `_` region
//! separators) and rendered in the catalog's canonical `xx_yy` form.
//!
//! ## Invariants
//! - [`Locale::EnUs`] is the default fallback locale.
//! - Variants are stable for config parsing and catalog lookup.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Supported message locales.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Locale {
    /// English (default).
    #[default]
    #[serde(rename = "en_us")]
    EnUs,
    /// Simplified Chinese.
    #[serde(rename = "zh_cn")]
    ZhCn,
}

impl Locale {
    /// Returns the canonical locale label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EnUs => "en_us",
            Self::ZhCn => "zh_cn",
        }
    }

    /// Attempts to parse a locale value (case-insensitive, tolerant of region tags).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        let normalized = value.to_ascii_lowercase();
        let lang = normalized.split(['-', '_']).next().unwrap_or("");
        match lang {
            "en" => Some(Self::EnUs),
            "zh" => Some(Self::ZhCn),
            _ => None,
        }
    }

    /// Picks the first supported locale from an `Accept-Language` value.
    ///
    /// Quality weights are ignored; tags are considered in listed order.
    #[must_use]
    pub fn from_accept_language(header: &str) -> Option<Self> {
        header
            .split(',')
            .filter_map(|entry| entry.split(';').next())
            .find_map(Self::parse)
    }
}

/// Ordered list of supported locales.
pub const SUPPORTED_LOCALES: &[Locale] = &[Locale::EnUs, Locale::ZhCn];

// ============================================================================
// SECTION: Tests
// ============================================================================
