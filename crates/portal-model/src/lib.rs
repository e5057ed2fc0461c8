//! # portal-model
//!
//! Domain models for the portal identity client.
//!
//! This crate defines the account record exchanged with the remote resource
//! API, the profile projection kept in the session, the two session roles,
//! and the caller-supplied credential and payload types.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod account;
pub mod credentials;
pub mod profile;
pub mod role;

pub use account::{
    Account, AccountId, AccountName, AccountPatch, Address, Geolocation, NewAccount, PENDING_FIELD,
};
pub use credentials::{LoginCredentials, NewAdmin, PasswordChange, ProfileUpdate, Registration};
pub use profile::Profile;
pub use role::Role;
