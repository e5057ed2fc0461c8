//! End-to-end integration tests.
//!
//! These tests drive the identity providers through the HTTP account client
//! against a json-server stand-in listening on an ephemeral local port.

mod admin_flows;
mod common;
mod session_reload;
mod user_flows;
