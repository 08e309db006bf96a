// crates/session-gate-http/src/server.rs
// ============================================================================
// Module: Session Gate Demo Server
// Description: HTTP application with the session gate mounted as middleware.
// Purpose: Serve a gated application route and an ungated liveness check.
// Dependencies: axum, tokio, session-gate-config
// ============================================================================

//! ## Overview
//! [`build_app`] mounts [`crate::middleware::session_gate`] on `GET|POST /api`
//! only; `GET /healthz` bypasses the gate and reports its lifecycle state.
//! [`serve`] binds the configured address and runs until the listener fails.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Extension;
use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::middleware;
use axum::routing::get;
use serde::Serialize;
use session_gate_config::SessionGateConfig;
use session_gate_core::TracingAuditSink;

use crate::middleware::GateLayerState;
use crate::middleware::ResolvedAction;
use crate::middleware::session_gate;

// ============================================================================
// SECTION: Router
// ============================================================================

/// Application route response.
#[derive(Debug, Serialize)]
struct ApiResponse {
    /// Outcome marker.
    status: &'static str,
    /// Action the request was dispatched as.
    action: String,
}

/// Liveness response.
#[derive(Debug, Serialize)]
struct HealthResponse {
    /// Outcome marker.
    status: &'static str,
    /// Gate lifecycle state.
    gate: &'static str,
}

/// Builds the demo router with the gate in front of `/api`.
pub fn build_app(state: GateLayerState) -> Router {
    let gated = Router::new()
        .route("/api", get(handle_api).post(handle_api))
        .route_layer(middleware::from_fn_with_state(state.clone(), session_gate));
    Router::new().merge(gated).route("/healthz", get(handle_health)).with_state(state)
}

/// Echoes the dispatched action.
async fn handle_api(
    Extension(ResolvedAction(action)): Extension<ResolvedAction>,
) -> Json<ApiResponse> {
    Json(ApiResponse {
        status: "ok",
        action,
    })
}

/// Reports liveness and gate state.
async fn handle_health(State(state): State<GateLayerState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        gate: state.gate().status().as_str(),
    })
}

// ============================================================================
// SECTION: Serve
// ============================================================================

/// Builds the gate from `config` and serves the demo application.
///
/// # Errors
///
/// Returns [`ServerError`] when the config is invalid or the listener fails.
pub async fn serve(config: &SessionGateConfig) -> Result<(), ServerError> {
    let addr = config.server.bind_addr().map_err(|err| ServerError::Config(err.to_string()))?;
    let gate = config
        .build_gate(Arc::new(TracingAuditSink))
        .map_err(|err| ServerError::Config(err.to_string()))?;
    let status = gate.status();
    let auth_key = gate.auth_key().to_string();
    let state = GateLayerState::new(
        Arc::new(gate),
        &config.server.action_param,
        config.server.default_locale,
    );
    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| ServerError::Transport(format!("http bind failed: {err}")))?;
    tracing::info!(
        %addr,
        gate = status.as_str(),
        auth_key = %auth_key,
        "session gate server listening"
    );
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .map_err(|err| ServerError::Transport(format!("http server failed: {err}")))
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Demo server errors.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration errors.
    #[error("config error: {0}")]
    Config(String),
    /// Transport errors.
    #[error("transport error: {0}")]
    Transport(String),
}
