//! # portal-session
//!
//! Session management for the portal identity client.
//!
//! [`SessionManager`] is the single authority for moving the process into
//! an authenticated state and back out of it. It owns the in-memory
//! [`Session`], mirrors it into a [`portal_cache::SessionStore`], and
//! rehydrates it from that store at start-up.
//!
//! ## Invariants
//!
//! - An authenticated session holds exactly one profile, matching its role.
//! - The in-memory session and the persisted cache are written together.
//! - Derived queries read the in-memory session only.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use portal_cache::MemorySessionStore;
//! use portal_session::SessionManager;
//!
//! let manager = SessionManager::with_mock_tokens(Arc::new(MemorySessionStore::new()));
//! manager.commit_session(&account, Role::User);
//! assert!(manager.is_authenticated());
//! manager.logout();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod keys;
pub mod manager;
pub mod session;
pub mod token;

pub use manager::SessionManager;
pub use session::Session;
pub use token::{MockTokenIssuer, TokenIssuer};
