// crates/session-gate-core/tests/common/mod.rs
// =============================================================================
// Module: Core Test Helpers
// Description: Shared fixtures for session gate integration tests.
// Purpose: Provide recording sinks, counting factories, and gate builders.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]
#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Test-only fixture setup.")]

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use serde_json::Value;
use session_gate_core::AuthGate;
use session_gate_core::GateAuditEvent;
use session_gate_core::GateAuditSink;
use session_gate_core::GateSettings;
use session_gate_core::MemorySessionStore;
use session_gate_core::NoopAuditSink;
use session_gate_core::Session;
use session_gate_core::SessionError;
use session_gate_core::SessionStore;
use session_gate_core::SessionStoreFactory;
use session_gate_core::SharedSessionStore;
use session_gate_core::SessionValues;

/// Session id used by fixtures.
pub const SESSION_ID: &str = "sid-1";

/// Audit sink capturing events in memory.
#[derive(Default)]
pub struct RecordingAuditSink {
    pub events: Mutex<Vec<GateAuditEvent>>,
}

impl RecordingAuditSink {
    pub fn snapshot(&self) -> Vec<GateAuditEvent> {
        self.events.lock().expect("audit lock").clone()
    }
}

impl GateAuditSink for RecordingAuditSink {
    fn record(&self, event: &GateAuditEvent) {
        self.events.lock().expect("audit lock").push(event.clone());
    }
}

/// Factory that counts opens and hands out a fixed store.
pub struct CountingFactory {
    pub opens: AtomicUsize,
    pub store: MemorySessionStore,
}

impl CountingFactory {
    pub fn new(store: MemorySessionStore) -> Self {
        Self {
            opens: AtomicUsize::new(0),
            store,
        }
    }

    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

impl SessionStoreFactory for CountingFactory {
    fn open_store(&self) -> Result<SharedSessionStore, SessionError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        Ok(SharedSessionStore::from_store(self.store.clone()))
    }
}

/// Factory that never yields a store.
pub struct UnavailableFactory;

impl SessionStoreFactory for UnavailableFactory {
    fn open_store(&self) -> Result<SharedSessionStore, SessionError> {
        Err(SessionError::Unavailable("no session secret configured".to_string()))
    }
}

/// Store that fails every lookup.
pub struct FailingStore;

impl SessionStore for FailingStore {
    fn get(
        &self,
        _request: &session_gate_core::RequestContext,
        _session_name: &str,
    ) -> Result<Session, SessionError> {
        Err(SessionError::Backend("backend unreachable".to_string()))
    }
}

/// Builds session values with a single entry.
pub fn values(key: &str, value: Value) -> SessionValues {
    let mut values = SessionValues::new();
    values.insert(key.to_string(), value);
    values
}

/// Builds settings with explicit patterns.
pub fn settings(
    enabled: bool,
    auth_key: &str,
    whitelist: &[&str],
    blacklist: &[&str],
) -> GateSettings {
    GateSettings::new(enabled, auth_key, whitelist, blacklist).unwrap()
}

/// Builds a gate over a memory store holding `values` for `default` / [`SESSION_ID`].
pub fn gate_with_values(values: SessionValues) -> AuthGate {
    let store = MemorySessionStore::new();
    store.insert("default", SESSION_ID, values).unwrap();
    AuthGate::new(
        settings(true, "default.authed", &["*"], &[]),
        Arc::new(CountingFactory::new(store)),
        Arc::new(NoopAuditSink),
    )
}
