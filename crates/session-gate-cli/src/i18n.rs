// crates/session-gate-cli/src/i18n.rs
// ============================================================================
// Module: CLI Internationalization Helpers
// Description: Provides message catalog and translation utilities for the CLI.
// Purpose: Centralize user-facing strings in English and Simplified Chinese.
// Dependencies: session-gate-core locales, standard library collections.
// ============================================================================

//! ## Overview
//! The session gate CLI stores user-facing strings in a small translation
//! catalog to enforce consistent messaging across locales. All runtime output
//! should be routed through the [`t!`](crate::t) macro.
//!
//! ## Invariants
//! - The catalog is initialized once and read-only thereafter.
//! - Missing keys fall back to English and then to the key itself.
//! - Placeholder substitutions preserve deterministic order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

pub use session_gate_core::Locale;
pub use session_gate_core::i18n::SUPPORTED_LOCALES;

// ============================================================================
// SECTION: Types
// ============================================================================

/// A formatted message argument captured by the [`macro@crate::t`] macro.
///
/// # Invariants
/// - `key` matches a placeholder name without braces (for example, `path`).
/// - `value` is preformatted and should be safe for display.
#[derive(Clone)]
pub struct MessageArg {
    /// The placeholder name used in message templates (e.g., `"path"`).
    pub key: &'static str,
    /// The formatted string value to substitute for this placeholder.
    pub value: String,
}

impl MessageArg {
    /// Constructs a new [`MessageArg`] from a key and displayable value.
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Locale Selection
// ============================================================================

/// Global locale selection for CLI output.
static CURRENT_LOCALE: OnceLock<Locale> = OnceLock::new();

/// Sets the CLI locale. Only the first call wins.
pub fn set_locale(locale: Locale) {
    let _ = CURRENT_LOCALE.set(locale);
}

/// Returns the current CLI locale (defaults to English).
#[must_use]
pub fn current_locale() -> Locale {
    CURRENT_LOCALE.get().copied().unwrap_or(Locale::EnUs)
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// English catalog entries.
const CATALOG_EN: &[(&str, &str)] = &[
    ("main.version", "session-gate {version}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "output"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
    ("config.load_failed", "Failed to load config: {error}"),
    ("config.validate.ok", "Config valid."),
    (
        "config.validate.summary",
        "Gate {enabled}; auth key {auth_key}; {whitelist} whitelist and {blacklist} blacklist \
         patterns; {store} session store.",
    ),
    ("config.enabled", "enabled"),
    ("config.disabled", "disabled"),
    ("serve.starting", "Starting session gate server on {bind}."),
    ("serve.failed", "Session gate server failed: {error}"),
    ("check.settings_failed", "Failed to build gate settings: {error}"),
    ("check.auth_key", "Auth key: session {session}, key {key}."),
    ("check.auth_key_unset", "Auth key is unset; every action passes."),
    ("check.disabled", "Gate starts disabled; every action passes until it is enabled."),
    ("check.gated", "Action {action} is gated."),
    ("check.not_gated", "Action {action} is not gated."),
    ("i18n.lang.invalid_env", "Invalid value for {env}: {value}. Expected 'en' or 'zh'."),
    (
        "i18n.disclaimer.machine_translated",
        "Note: non-English output is machine-translated and may be inaccurate.",
    ),
];

/// Simplified Chinese catalog entries.
const CATALOG_ZH: &[(&str, &str)] = &[
    ("main.version", "session-gate {version}"),
    ("output.stream.stdout", "标准输出"),
    ("output.stream.stderr", "标准错误"),
    ("output.stream.unknown", "输出"),
    ("output.write_failed", "写入 {stream} 失败：{error}"),
    ("config.load_failed", "加载配置失败：{error}"),
    ("config.validate.ok", "配置有效。"),
    (
        "config.validate.summary",
        "网关{enabled}；认证键 {auth_key}；白名单 {whitelist} 条、\
         黑名单 {blacklist} 条模式；会话存储 {store}。",
    ),
    ("config.enabled", "已启用"),
    ("config.disabled", "已禁用"),
    ("serve.starting", "正在 {bind} 上启动会话网关服务。"),
    ("serve.failed", "会话网关服务失败：{error}"),
    ("check.settings_failed", "构建网关设置失败：{error}"),
    ("check.auth_key", "认证键：会话 {session}，键 {key}。"),
    ("check.auth_key_unset", "认证键未设置；所有操作均放行。"),
    ("check.disabled", "网关启动时处于禁用状态；启用前所有操作均放行。"),
    ("check.gated", "操作 {action} 受网关保护。"),
    ("check.not_gated", "操作 {action} 不受网关保护。"),
    ("i18n.lang.invalid_env", "{env} 的值无效：{value}。应为 'en' 或 'zh'。"),
    (
        "i18n.disclaimer.machine_translated",
        "注意：非英文输出为机器翻译，可能不准确。",
    ),
];

/// Returns the message catalog for the requested locale.
pub(crate) fn catalog_for(locale: Locale) -> &'static HashMap<&'static str, &'static str> {
    static CATALOG_EN_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    static CATALOG_ZH_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    match locale {
        Locale::EnUs => CATALOG_EN_MAP.get_or_init(|| CATALOG_EN.iter().copied().collect()),
        Locale::ZhCn => CATALOG_ZH_MAP.get_or_init(|| CATALOG_ZH.iter().copied().collect()),
    }
}

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Translates `key` using the selected locale while substituting `args`.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    translate_in(current_locale(), key, args)
}

/// Translates `key` for an explicit `locale` while substituting `args`.
#[must_use]
pub fn translate_in(locale: Locale, key: &str, args: Vec<MessageArg>) -> String {
    let template = catalog_for(locale)
        .get(key)
        .copied()
        .or_else(|| catalog_for(Locale::EnUs).get(key).copied())
        .unwrap_or(key);
    if args.is_empty() {
        return template.to_string();
    }

    let mut result = template.to_string();
    for arg in args {
        let placeholder = format!("{{{}}}", arg.key);
        result = result.replace(&placeholder, &arg.value);
    }
    result
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Formats a localized message from a key and named arguments.
///
/// # Arguments
///
/// - `$key` must match a catalog entry.
/// - Named arguments are substituted into `{placeholder}` positions.
///
/// # Returns
///
/// A localized [`String`] with placeholders substituted.
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args = ::std::vec![
            $(
                $crate::i18n::MessageArg::new(stringify!($name), $value.to_string()),
            )*
        ];
        $crate::i18n::translate($key, args)
    }};
}
