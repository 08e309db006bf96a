// crates/session-gate-http/src/lib.rs
// ============================================================================
// Module: Session Gate HTTP Library
// Description: axum adapter for the session authentication gate.
// Purpose: Mount the gate as request middleware and serve a demo application.
// Dependencies: axum, session-gate-core, session-gate-config, tokio, tracing
// ============================================================================

//! ## Overview
//! `session-gate-http` adapts HTTP requests into
//! [`session_gate_core::RequestContext`] values, runs the gate, and either
//! forwards the request or answers with a structured, localized error. The
//! demo server mounts the middleware in front of a single application route.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod middleware;
pub mod server;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use middleware::LOCALE_PARAM;
pub use middleware::GateLayerState;
pub use middleware::REQUEST_ID_HEADER;
pub use middleware::ResolvedAction;
pub use middleware::SESSION_CHALLENGE;
pub use middleware::deny_response;
pub use middleware::session_gate;
pub use middleware::status_for;
pub use server::ServerError;
pub use server::build_app;
pub use server::serve;
