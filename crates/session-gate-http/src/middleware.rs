// crates/session-gate-http/src/middleware.rs
// ============================================================================
// Module: Session Gate Middleware
// Description: axum middleware running the session gate per request.
// Purpose: Translate HTTP requests into gate contexts and deny responses.
// Dependencies: axum, serde_json, session-gate-core
// ============================================================================

//! ## Overview
//! [`session_gate`] resolves the action, locale, cookies, and request id from
//! the incoming request, asks the gate for a decision, and then either calls
//! the next service exactly once or writes a JSON error body:
//!
//! ```json
//! {"error": {"group": "session", "kind": "SessionNotAuthed", "code": 2,
//!            "message": "Session is not authed!"}}
//! ```
//!
//! Action resolution: a [`ResolvedAction`] extension set by upstream routing
//! wins, then the configured query parameter, then the empty action. Locale
//! resolution: the `api_lang` query parameter, then `Accept-Language`, then
//! the configured default.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::Arc;

use axum::Json;
use axum::extract::Query;
use axum::extract::Request;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum::http::header::ACCEPT_LANGUAGE;
use axum::http::header::COOKIE;
use axum::http::header::WWW_AUTHENTICATE;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use serde_json::json;
use session_gate_core::AuthGate;
use session_gate_core::ErrorRegistry;
use session_gate_core::GateDecision;
use session_gate_core::GateDenial;
use session_gate_core::Locale;
use session_gate_core::RequestContext;
use session_gate_core::SessionErrorKind;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Query parameter selecting the response locale.
pub const LOCALE_PARAM: &str = "api_lang";
/// Header carrying the caller's request identifier.
pub const REQUEST_ID_HEADER: &str = "x-request-id";
/// Challenge sent with `401` responses; the session cookie is the credential.
pub const SESSION_CHALLENGE: &str = "Session";
/// Maximum accepted request id length.
const MAX_REQUEST_ID_LENGTH: usize = 128;

// ============================================================================
// SECTION: State
// ============================================================================

/// Action identifier resolved by upstream routing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAction(pub String);

/// Shared middleware state.
#[derive(Clone)]
pub struct GateLayerState {
    /// Gate consulted for every request.
    gate: Arc<AuthGate>,
    /// Localized error catalog with the `session` group registered.
    registry: Arc<ErrorRegistry>,
    /// Query parameter carrying the action name.
    action_param: Arc<str>,
    /// Locale used when the request names none.
    default_locale: Locale,
}

impl GateLayerState {
    /// Builds middleware state, registering the session error group.
    #[must_use]
    pub fn new(gate: Arc<AuthGate>, action_param: &str, default_locale: Locale) -> Self {
        Self {
            gate,
            registry: Arc::new(ErrorRegistry::with_session_errors()),
            action_param: Arc::from(action_param),
            default_locale,
        }
    }

    /// Returns the gate.
    #[must_use]
    pub const fn gate(&self) -> &Arc<AuthGate> {
        &self.gate
    }

    /// Builds the gate context for an HTTP request.
    #[must_use]
    pub fn request_context(&self, request: &Request) -> RequestContext {
        let query = Query::<HashMap<String, String>>::try_from_uri(request.uri())
            .map(|Query(params)| params)
            .unwrap_or_default();
        let headers = request.headers();
        let action = request
            .extensions()
            .get::<ResolvedAction>()
            .map(|ResolvedAction(action)| action.clone())
            .or_else(|| query.get(self.action_param.as_ref()).cloned())
            .unwrap_or_default();
        let locale = query
            .get(LOCALE_PARAM)
            .and_then(|value| Locale::parse(value))
            .or_else(|| {
                headers
                    .get(ACCEPT_LANGUAGE)
                    .and_then(|value| value.to_str().ok())
                    .and_then(Locale::from_accept_language)
            })
            .unwrap_or(self.default_locale);
        let mut context = RequestContext::new(action).with_locale(locale);
        context.cookies = parse_cookies(headers).into_iter().collect();
        context.request_id = request_id(headers);
        context
    }
}

// ============================================================================
// SECTION: Middleware
// ============================================================================

/// Runs the session gate in front of the wrapped routes.
pub async fn session_gate(
    State(state): State<GateLayerState>,
    mut request: Request,
    next: Next,
) -> Response {
    let context = state.request_context(&request);
    match state.gate.evaluate(&context) {
        GateDecision::Pass(_) => {
            request.extensions_mut().insert(ResolvedAction(context.action));
            next.run(request).await
        }
        GateDecision::Deny(denial) => deny_response(&state.registry, &denial, context.locale),
    }
}

/// Renders a deny decision as a JSON error response.
///
/// `SessionNotAuthed` carries a [`SESSION_CHALLENGE`] `WWW-Authenticate`
/// header; infrastructure failures carry none.
#[must_use]
pub fn deny_response(registry: &ErrorRegistry, denial: &GateDenial, locale: Locale) -> Response {
    let error = registry.session_error(denial.kind, locale);
    let mut response = (status_for(denial.kind), Json(json!({ "error": error }))).into_response();
    if denial.kind == SessionErrorKind::SessionNotAuthed {
        response
            .headers_mut()
            .insert(WWW_AUTHENTICATE, HeaderValue::from_static(SESSION_CHALLENGE));
    }
    response
}

/// Maps a deny kind to its HTTP status.
#[must_use]
pub const fn status_for(kind: SessionErrorKind) -> StatusCode {
    match kind {
        SessionErrorKind::SessionInitFailed => StatusCode::SERVICE_UNAVAILABLE,
        SessionErrorKind::SessionGetFailed => StatusCode::BAD_REQUEST,
        SessionErrorKind::SessionNotAuthed => StatusCode::UNAUTHORIZED,
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Parses every `Cookie` header into name/value pairs.
///
/// Later duplicates overwrite earlier ones when collected into a map.
fn parse_cookies(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.split_once('='))
        .map(|(name, value)| (name.trim(), value.trim().trim_matches('"')))
        .filter(|(name, _)| !name.is_empty())
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

/// Extracts a bounded request id header.
fn request_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty() && value.len() <= MAX_REQUEST_ID_LENGTH)
        .map(ToString::to_string)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
