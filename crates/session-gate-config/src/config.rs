// crates/session-gate-config/src/config.rs
// ============================================================================
// Module: Session Gate Configuration
// Description: Configuration loading and validation for the session gate.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: session-gate-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Every section is optional; an empty file yields a gate that is enabled,
//! reads `default.authed`, and gates every action. Invalid action patterns,
//! oversized lists, and malformed server settings fail at load time, never at
//! request time.
//!
//! ```toml
//! [gate]
//! enabled = true
//! auth_key = "default.authed"
//!
//! [gate.actions]
//! whitelist = ["*"]
//! blacklist = ["User.Login", "Public.*"]
//!
//! [session_store]
//! type = "file"
//! path = "sessions.json"
//!
//! [server]
//! bind = "127.0.0.1:8080"
//! action_param = "api_action"
//! default_locale = "en_us"
//! ```

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;
use session_gate_core::ActionMatcher;
use session_gate_core::AuthGate;
use session_gate_core::DEFAULT_AUTH_KEY;
use session_gate_core::FixtureStoreFactory;
use session_gate_core::GateAuditSink;
use session_gate_core::GateSettings;
use session_gate_core::Locale;
use session_gate_core::MemorySessionStore;
use session_gate_core::MemoryStoreFactory;
use session_gate_core::SessionStoreFactory;
use session_gate_core::WILDCARD;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "session-gate.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "SESSION_GATE_CONFIG";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum number of patterns per action list.
pub const MAX_ACTION_RULES: usize = 128;
/// Maximum length of a single action pattern.
pub const MAX_ACTION_PATTERN_LENGTH: usize = 512;
/// Maximum length of the auth key path.
pub const MAX_AUTH_KEY_LENGTH: usize = 256;
/// Maximum length of the action query parameter name.
pub const MAX_ACTION_PARAM_LENGTH: usize = 64;
/// Default bind address for the demo server.
const DEFAULT_BIND: &str = "127.0.0.1:8080";
/// Default query parameter carrying the action name.
const DEFAULT_ACTION_PARAM: &str = "api_action";

// ============================================================================
// SECTION: Root Config
// ============================================================================

/// Session gate configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionGateConfig {
    /// Gate toggle, auth key, and action lists.
    #[serde(default)]
    pub gate: GateConfig,
    /// Session store backend.
    #[serde(default)]
    pub session_store: SessionStoreConfig,
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
}

impl SessionGateConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path, env::var(CONFIG_ENV_VAR).ok())?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved)
            .map_err(|err| ConfigError::Io(format!("{}: {err}", resolved.display())))?;
        Self::from_toml_bytes(&bytes)
    }

    /// Parses and validates configuration from raw file contents.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the contents are oversized, not utf-8,
    /// malformed, or invalid.
    pub fn from_toml_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.gate.validate()?;
        self.session_store.validate()?;
        self.server.validate()?;
        Ok(())
    }

    /// Builds compiled gate settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when an action pattern does not compile.
    pub fn gate_settings(&self) -> Result<GateSettings, ConfigError> {
        GateSettings::new(
            self.gate.enabled,
            &self.gate.auth_key,
            &self.gate.actions.whitelist,
            &self.gate.actions.blacklist,
        )
        .map_err(|err| ConfigError::Invalid(err.to_string()))
    }

    /// Builds the session store factory for the configured backend.
    #[must_use]
    pub fn store_factory(&self) -> Arc<dyn SessionStoreFactory> {
        self.session_store.factory()
    }

    /// Builds a gate from this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when gate settings cannot be built.
    pub fn build_gate(&self, audit: Arc<dyn GateAuditSink>) -> Result<AuthGate, ConfigError> {
        Ok(AuthGate::new(self.gate_settings()?, self.store_factory(), audit))
    }
}

// ============================================================================
// SECTION: Gate Config
// ============================================================================

/// Gate toggle, auth key, and action lists.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GateConfig {
    /// Whether the gate starts enabled.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// `<session name>.<session key>` path of the auth flag.
    #[serde(default = "default_auth_key")]
    pub auth_key: String,
    /// Action applicability lists.
    #[serde(default)]
    pub actions: ActionsConfig,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            auth_key: default_auth_key(),
            actions: ActionsConfig::default(),
        }
    }
}

impl GateConfig {
    /// Validates the auth key and action lists.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.auth_key.len() > MAX_AUTH_KEY_LENGTH {
            return Err(ConfigError::Invalid("gate.auth_key exceeds max length".to_string()));
        }
        self.actions.validate()
    }
}

/// Whitelist and blacklist of action patterns.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActionsConfig {
    /// Patterns selecting gated actions.
    #[serde(default = "default_whitelist")]
    pub whitelist: Vec<String>,
    /// Patterns exempting actions from the gate.
    #[serde(default)]
    pub blacklist: Vec<String>,
}

impl Default for ActionsConfig {
    fn default() -> Self {
        Self {
            whitelist: default_whitelist(),
            blacklist: Vec::new(),
        }
    }
}

impl ActionsConfig {
    /// Validates list sizes and compiles every pattern.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_pattern_list("gate.actions.whitelist", &self.whitelist)?;
        validate_pattern_list("gate.actions.blacklist", &self.blacklist)?;
        ActionMatcher::new(&self.whitelist, &self.blacklist)
            .map_err(|err| ConfigError::Invalid(err.to_string()))?;
        Ok(())
    }
}

// ============================================================================
// SECTION: Session Store Config
// ============================================================================

/// Session store backend type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStoreType {
    /// Empty in-memory store.
    #[default]
    Memory,
    /// In-memory store loaded from a JSON fixture file.
    File,
}

/// Session store configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionStoreConfig {
    /// Store backend type.
    #[serde(rename = "type", default)]
    pub store_type: SessionStoreType,
    /// Fixture path for the file backend.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl SessionStoreConfig {
    /// Validates backend-specific requirements.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.store_type, &self.path) {
            (SessionStoreType::Memory, None) => Ok(()),
            (SessionStoreType::Memory, Some(_)) => Err(ConfigError::Invalid(
                "session_store.path is only valid for the file store".to_string(),
            )),
            (SessionStoreType::File, None) => Err(ConfigError::Invalid(
                "file session_store requires path".to_string(),
            )),
            (SessionStoreType::File, Some(path)) => {
                validate_path_string("session_store.path", &path.to_string_lossy())
            }
        }
    }

    /// Builds the store factory for this backend.
    ///
    /// A file store reads its fixture when the gate initializes; a missing or
    /// malformed fixture leaves the gate unconfigured.
    #[must_use]
    pub fn factory(&self) -> Arc<dyn SessionStoreFactory> {
        match (self.store_type, &self.path) {
            (SessionStoreType::File, Some(path)) => Arc::new(FixtureStoreFactory::new(path)),
            _ => Arc::new(MemoryStoreFactory::new(MemorySessionStore::new())),
        }
    }
}

// ============================================================================
// SECTION: Server Config
// ============================================================================

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Bind address.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Query parameter carrying the action name.
    #[serde(default = "default_action_param")]
    pub action_param: String,
    /// Locale used when the request names none.
    #[serde(default)]
    pub default_locale: Locale,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            action_param: default_action_param(),
            default_locale: Locale::default(),
        }
    }
}

impl ServerConfig {
    /// Validates the bind address and action parameter.
    fn validate(&self) -> Result<(), ConfigError> {
        self.bind_addr()?;
        let param = self.action_param.as_str();
        if param.is_empty() {
            return Err(ConfigError::Invalid("server.action_param must be non-empty".to_string()));
        }
        if param.len() > MAX_ACTION_PARAM_LENGTH {
            return Err(ConfigError::Invalid("server.action_param exceeds max length".to_string()));
        }
        if !param.bytes().all(|byte| byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-') {
            return Err(ConfigError::Invalid(
                "server.action_param has invalid characters".to_string(),
            ));
        }
        Ok(())
    }

    /// Parses the bind address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the address does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid("invalid bind address".to_string()))
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from the CLI argument or environment override.
fn resolve_path(path: Option<&Path>, env_path: Option<String>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Some(env_path) = env_path {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates the size and entries of an action pattern list.
fn validate_pattern_list(field: &str, patterns: &[String]) -> Result<(), ConfigError> {
    if patterns.len() > MAX_ACTION_RULES {
        return Err(ConfigError::Invalid(format!("{field} exceeds max entries")));
    }
    for pattern in patterns {
        if pattern.trim().is_empty() {
            return Err(ConfigError::Invalid(format!("{field} entries must be non-empty")));
        }
        if pattern.len() > MAX_ACTION_PATTERN_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} entry exceeds max length")));
        }
    }
    Ok(())
}

/// Default gate toggle.
const fn default_enabled() -> bool {
    true
}

/// Default auth key path.
fn default_auth_key() -> String {
    DEFAULT_AUTH_KEY.to_string()
}

/// Default whitelist: every action is gated.
fn default_whitelist() -> Vec<String> {
    vec![WILDCARD.to_string()]
}

/// Default bind address.
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

/// Default action query parameter.
fn default_action_param() -> String {
    DEFAULT_ACTION_PARAM.to_string()
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only assertions are permitted."
    )]

    use super::*;

    #[test]
    fn resolve_path_prefers_explicit_argument() {
        let resolved =
            resolve_path(Some(Path::new("explicit.toml")), Some("env.toml".to_string())).unwrap();
        assert_eq!(resolved, PathBuf::from("explicit.toml"));
    }

    #[test]
    fn resolve_path_falls_back_to_env_then_default() {
        let from_env = resolve_path(None, Some("env.toml".to_string())).unwrap();
        assert_eq!(from_env, PathBuf::from("env.toml"));
        let fallback = resolve_path(None, None).unwrap();
        assert_eq!(fallback, PathBuf::from(DEFAULT_CONFIG_NAME));
    }

    #[test]
    fn resolve_path_rejects_oversized_env_value() {
        let long = "a".repeat(MAX_TOTAL_PATH_LENGTH + 1);
        assert!(resolve_path(None, Some(long)).is_err());
    }

    #[test]
    fn validate_path_rejects_long_component() {
        let long = "a".repeat(MAX_PATH_COMPONENT_LENGTH + 1);
        let err = validate_path(&PathBuf::from(long)).unwrap_err();
        assert!(err.to_string().contains("component too long"));
    }

    #[test]
    fn validate_path_string_rejects_whitespace_only() {
        let err = validate_path_string("session_store.path", "   ").unwrap_err();
        assert!(err.to_string().contains("session_store.path must be non-empty"));
    }

    #[test]
    fn pattern_list_rejects_blank_entry() {
        let err = validate_pattern_list("gate.actions.whitelist", &[" ".to_string()]).unwrap_err();
        assert!(err.to_string().contains("entries must be non-empty"));
    }
}
