// crates/session-gate-core/src/audit.rs
// ============================================================================
// Module: Gate Audit
// Description: Audit events and sinks for session gate decisions.
// Purpose: Record every pass/deny decision with its reason.
// Dependencies: serde, tracing
// ============================================================================

//! ## Overview
//! The gate emits exactly one [`GateAuditEvent`] per decision. Sinks decide
//! where events go; [`TracingAuditSink`] forwards them to `tracing` so the
//! host's subscriber controls formatting and filtering.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

use crate::gate::GateDecision;
use crate::request::RequestContext;

// ============================================================================
// SECTION: Audit Events
// ============================================================================

/// Audit event payload for one gate decision.
#[derive(Debug, Clone, Serialize)]
pub struct GateAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Decision outcome (`pass` or `deny`).
    pub decision: &'static str,
    /// Pass reason or deny kind.
    pub reason: &'static str,
    /// Action identifier from the request.
    pub action: String,
    /// Session name consulted (or that would have been consulted).
    pub session_name: String,
    /// Internal failure detail for denials.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Request identifier (if provided).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl GateAuditEvent {
    /// Builds an event describing `decision` for `request`.
    #[must_use]
    pub fn from_decision(
        request: &RequestContext,
        session_name: &str,
        decision: &GateDecision,
    ) -> Self {
        let (outcome, reason, detail) = match decision {
            GateDecision::Pass(reason) => ("pass", reason.label(), None),
            GateDecision::Deny(denial) => ("deny", denial.kind.name(), Some(denial.detail.clone())),
        };
        Self {
            event: "session_gate",
            decision: outcome,
            reason,
            action: request.action.clone(),
            session_name: session_name.to_string(),
            detail,
            request_id: request.request_id.clone(),
        }
    }

    /// Returns true for deny events.
    #[must_use]
    pub fn is_deny(&self) -> bool {
        self.decision == "deny"
    }
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink for gate decisions.
pub trait GateAuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &GateAuditEvent);
}

/// `tracing` target used by [`TracingAuditSink`].
pub const AUDIT_TARGET: &str = "session_gate::audit";

/// Audit sink that forwards events to `tracing`.
///
/// Denials log at `info`, passes at `debug`.
pub struct TracingAuditSink;

impl GateAuditSink for TracingAuditSink {
    fn record(&self, event: &GateAuditEvent) {
        if event.is_deny() {
            tracing::info!(
                target: AUDIT_TARGET,
                reason = event.reason,
                action = %event.action,
                session = %event.session_name,
                detail = event.detail.as_deref(),
                request_id = event.request_id.as_deref(),
                "session gate denied request"
            );
        } else {
            tracing::debug!(
                target: AUDIT_TARGET,
                reason = event.reason,
                action = %event.action,
                session = %event.session_name,
                request_id = event.request_id.as_deref(),
                "session gate passed request"
            );
        }
    }
}

/// No-op audit sink for tests.
pub struct NoopAuditSink;

impl GateAuditSink for NoopAuditSink {
    fn record(&self, _event: &GateAuditEvent) {}
}
