// crates/session-gate-core/src/gate.rs
// ============================================================================
// Module: Auth Gate
// Description: Session authentication gate state machine and decision engine.
// Purpose: Decide pass/deny per request from matcher, session, and lifecycle.
// Dependencies: crate::{accessor, audit, auth_key, errors, matcher, session}
// ============================================================================

//! ## Overview
//! [`AuthGate`] owns the compiled action matcher, the resolved auth key, and
//! the session store handle obtained at initialization. Each request is
//! evaluated in a fixed order; the first terminal outcome wins:
//!
//! 1. gate disabled: pass
//! 2. auth key has an empty component: pass
//! 3. action not gated: pass
//! 4. no store handle: deny `SessionInitFailed`
//! 5. store error: deny `SessionGetFailed`
//! 6. flag missing, not boolean, or `false`: deny `SessionNotAuthed`
//! 7. flag `true`: pass
//!
//! ## Invariants
//! - Requests never write gate state and never take a lock in the gate.
//! - Initialization runs at most once; its outcome is an immutable snapshot.
//! - `enable`/`disable` may race with in-flight requests; a request observes
//!   either the old or the new toggle.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::OnceLock;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use crate::accessor::AccessError;
use crate::accessor::SessionAccessor;
use crate::audit::GateAuditEvent;
use crate::audit::GateAuditSink;
use crate::auth_key::AuthKeyPath;
use crate::errors::SessionErrorKind;
use crate::matcher::ActionMatcher;
use crate::matcher::MatcherError;
use crate::request::RequestContext;
use crate::session::AuthFlag;
use crate::session::SessionStoreFactory;

// ============================================================================
// SECTION: Settings
// ============================================================================

/// Validated gate settings.
#[derive(Debug, Clone)]
pub struct GateSettings {
    /// Whether the gate starts enabled.
    pub enabled: bool,
    /// Session name and key holding the auth flag.
    pub auth_key: AuthKeyPath,
    /// Compiled action matcher.
    pub matcher: ActionMatcher,
}

impl GateSettings {
    /// Builds settings, compiling the action patterns.
    ///
    /// # Errors
    ///
    /// Returns [`MatcherError`] when a pattern is invalid.
    pub fn new<S: AsRef<str>>(
        enabled: bool,
        auth_key: &str,
        whitelist: &[S],
        blacklist: &[S],
    ) -> Result<Self, MatcherError> {
        Ok(Self {
            enabled,
            auth_key: AuthKeyPath::parse(auth_key),
            matcher: ActionMatcher::new(whitelist, blacklist)?,
        })
    }
}

// ============================================================================
// SECTION: Decisions
// ============================================================================

/// Lifecycle state of the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateStatus {
    /// Every request passes.
    Disabled,
    /// Enabled, but no session store handle could be obtained.
    Unconfigured,
    /// Enabled with a session store handle.
    Configured,
}

impl GateStatus {
    /// Returns a stable label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::Unconfigured => "unconfigured",
            Self::Configured => "configured",
        }
    }
}

/// Why a request passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassReason {
    /// Gate is disabled.
    Disabled,
    /// Auth key has no usable session name or key.
    KeyUnset,
    /// Action is not subject to the gate.
    ActionNotGated,
    /// Session carries a `true` auth flag.
    Authenticated,
}

impl PassReason {
    /// Returns a stable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::KeyUnset => "key_unset",
            Self::ActionNotGated => "action_not_gated",
            Self::Authenticated => "authenticated",
        }
    }
}

/// Deny outcome with internal detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateDenial {
    /// Error kind reported to the client.
    pub kind: SessionErrorKind,
    /// Internal detail for logs; never sent to clients.
    pub detail: String,
}

/// Gate decision for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Forward the request unchanged.
    Pass(PassReason),
    /// Reject the request with a structured error.
    Deny(GateDenial),
}

impl GateDecision {
    /// Returns true for pass decisions.
    #[must_use]
    pub const fn is_pass(&self) -> bool {
        matches!(self, Self::Pass(_))
    }

    /// Returns the deny kind, if denied.
    #[must_use]
    pub const fn error_kind(&self) -> Option<SessionErrorKind> {
        match self {
            Self::Pass(_) => None,
            Self::Deny(denial) => Some(denial.kind),
        }
    }

    /// Builds a deny decision.
    fn deny(kind: SessionErrorKind, detail: impl Into<String>) -> Self {
        Self::Deny(GateDenial {
            kind,
            detail: detail.into(),
        })
    }
}

// ============================================================================
// SECTION: Gate
// ============================================================================

/// Snapshot produced by initialization.
struct GateRuntime {
    /// Session accessor over the store handle (if any).
    accessor: SessionAccessor,
}

/// Session authentication gate.
pub struct AuthGate {
    /// Disabled toggle; flipped by `enable`/`disable`.
    disabled: AtomicBool,
    /// Initialization snapshot, set at most once.
    runtime: OnceLock<GateRuntime>,
    /// Session name and key holding the auth flag.
    auth_key: AuthKeyPath,
    /// Compiled action matcher.
    matcher: ActionMatcher,
    /// Source of the session store handle.
    stores: Arc<dyn SessionStoreFactory>,
    /// Decision audit sink.
    audit: Arc<dyn GateAuditSink>,
}

impl AuthGate {
    /// Builds a gate. Enabled gates initialize immediately; disabled gates
    /// initialize on the first [`AuthGate::enable`].
    #[must_use]
    pub fn new(
        settings: GateSettings,
        stores: Arc<dyn SessionStoreFactory>,
        audit: Arc<dyn GateAuditSink>,
    ) -> Self {
        let gate = Self {
            disabled: AtomicBool::new(!settings.enabled),
            runtime: OnceLock::new(),
            auth_key: settings.auth_key,
            matcher: settings.matcher,
            stores,
            audit,
        };
        if settings.enabled {
            gate.init();
        }
        gate
    }

    /// Initializes the gate once; later calls are no-ops.
    ///
    /// A store failure is logged and leaves the gate unconfigured.
    pub fn init(&self) {
        let _ = self.runtime.get_or_init(|| self.open_runtime());
    }

    /// Enables the gate, initializing it first if needed.
    pub fn enable(&self) {
        self.init();
        self.disabled.store(false, Ordering::Release);
        tracing::info!(status = self.status().as_str(), "session gate enabled");
    }

    /// Disables the gate. The store handle and matcher are kept.
    pub fn disable(&self) {
        self.disabled.store(true, Ordering::Release);
        tracing::info!("session gate disabled");
    }

    /// Returns true when the gate is enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.disabled.load(Ordering::Acquire)
    }

    /// Returns true when initialization has run.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.runtime.get().is_some()
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub fn status(&self) -> GateStatus {
        if !self.is_enabled() {
            return GateStatus::Disabled;
        }
        match self.runtime.get() {
            Some(runtime) if runtime.accessor.is_available() => GateStatus::Configured,
            _ => GateStatus::Unconfigured,
        }
    }

    /// Returns the resolved auth key.
    #[must_use]
    pub const fn auth_key(&self) -> &AuthKeyPath {
        &self.auth_key
    }

    /// Evaluates `request` and records the decision with the audit sink.
    #[must_use]
    pub fn evaluate(&self, request: &RequestContext) -> GateDecision {
        let decision = self.decide(request);
        let event = GateAuditEvent::from_decision(request, self.auth_key.session_name(), &decision);
        self.audit.record(&event);
        decision
    }

    /// Runs the ordered decision procedure.
    fn decide(&self, request: &RequestContext) -> GateDecision {
        if !self.is_enabled() {
            return GateDecision::Pass(PassReason::Disabled);
        }
        if !self.auth_key.is_usable() {
            return GateDecision::Pass(PassReason::KeyUnset);
        }
        if !self.matcher.matches(&request.action) {
            return GateDecision::Pass(PassReason::ActionNotGated);
        }
        let lookup = self.runtime.get().map_or(Err(AccessError::StoreUnavailable), |runtime| {
            runtime.accessor.get(request, self.auth_key.session_name())
        });
        let session = match lookup {
            Ok(session) => session,
            Err(AccessError::StoreUnavailable) => {
                return GateDecision::deny(
                    SessionErrorKind::SessionInitFailed,
                    "session store not initialized",
                );
            }
            Err(AccessError::Retrieval(err)) => {
                return GateDecision::deny(SessionErrorKind::SessionGetFailed, err.to_string());
            }
        };
        match session.flag(self.auth_key.session_key()) {
            AuthFlag::Bool(true) => GateDecision::Pass(PassReason::Authenticated),
            AuthFlag::Bool(false) => {
                GateDecision::deny(SessionErrorKind::SessionNotAuthed, "auth flag is false")
            }
            AuthFlag::Missing => {
                GateDecision::deny(SessionErrorKind::SessionNotAuthed, "auth flag missing")
            }
            AuthFlag::NotBoolean => {
                GateDecision::deny(SessionErrorKind::SessionNotAuthed, "auth flag is not a boolean")
            }
        }
    }

    /// Obtains the session store handle for the initialization snapshot.
    fn open_runtime(&self) -> GateRuntime {
        let store = match self.stores.open_store() {
            Ok(store) => Some(store),
            Err(err) => {
                tracing::error!(
                    error = %err,
                    session = self.auth_key.session_name(),
                    "session store init failed; session gate not configured"
                );
                None
            }
        };
        GateRuntime {
            accessor: SessionAccessor::new(store),
        }
    }
}
