// crates/session-gate-core/src/lib.rs
// ============================================================================
// Module: Session Gate Core Library
// Description: Public API surface for the session authentication gate.
// Purpose: Expose the matcher, session accessor, gate, and error catalog.
// Dependencies: globset, serde, serde_json, thiserror, tracing
// ============================================================================

//! ## Overview
//! Session Gate core decides, per request, whether a previously established
//! session is authenticated before the request reaches application logic.
//! The decision composes an action matcher (which actions are gated), a
//! session accessor (how session state is fetched), and a lifecycle
//! controller (enable/disable with idempotent initialization). It carries no
//! HTTP dependencies; transports adapt requests into [`RequestContext`].
//!
//! ## Invariants
//! - Gate state is read-only on the request path; only `enable`/`disable`
//!   mutate it.
//! - Infrastructure failures are never reported as "not authenticated".
//! - Invalid patterns fail at construction, never at request time.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod accessor;
pub mod audit;
pub mod auth_key;
pub mod errors;
pub mod gate;
pub mod i18n;
pub mod matcher;
pub mod request;
pub mod session;
pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use accessor::AccessError;
pub use accessor::SessionAccessor;
pub use audit::AUDIT_TARGET;
pub use audit::GateAuditEvent;
pub use audit::GateAuditSink;
pub use audit::NoopAuditSink;
pub use audit::TracingAuditSink;
pub use auth_key::AuthKeyPath;
pub use auth_key::DEFAULT_AUTH_KEY;
pub use auth_key::DEFAULT_SESSION_NAME;
pub use errors::ErrorDefine;
pub use errors::ErrorRegistry;
pub use errors::LocalizedError;
pub use errors::SESSION_ERROR_DEFINES;
pub use errors::SESSION_ERROR_GROUP;
pub use errors::SessionErrorKind;
pub use gate::AuthGate;
pub use gate::GateDecision;
pub use gate::GateDenial;
pub use gate::GateSettings;
pub use gate::GateStatus;
pub use gate::PassReason;
pub use i18n::Locale;
pub use matcher::ActionMatcher;
pub use matcher::MatcherError;
pub use matcher::WILDCARD;
pub use request::RequestContext;
pub use session::AuthFlag;
pub use session::Session;
pub use session::SessionError;
pub use session::SessionStore;
pub use session::SessionStoreFactory;
pub use session::SessionValues;
pub use session::SharedSessionStore;
pub use store::FixtureStoreFactory;
pub use store::MemorySessionStore;
pub use store::MemoryStoreFactory;
