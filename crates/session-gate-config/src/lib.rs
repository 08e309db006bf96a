// crates/session-gate-config/src/lib.rs
// ============================================================================
// Module: Session Gate Config Library
// Description: Canonical config model and validation.
// Purpose: Single source of truth for session-gate.toml semantics.
// Dependencies: session-gate-core, serde, toml
// ============================================================================

//! ## Overview
//! `session-gate-config` defines the configuration model for the session
//! gate: the gate toggle, the auth key path, the action whitelist and
//! blacklist, the session store backend, and the demo server settings. It
//! provides strict, fail-closed validation and builds gate settings and
//! store factories from a validated config.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
