//! # portal-core
//!
//! Core utilities, configuration, and error handling for the portal
//! identity client.
//!
//! This crate provides foundational types shared by the session and
//! provider crates: the client configuration, the shared error type, and
//! structured audit events for security-relevant account activity.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod event;

pub use config::PortalConfig;
pub use error::{CoreError, CoreResult};
pub use event::{Event, EventOutcome, EventType};
