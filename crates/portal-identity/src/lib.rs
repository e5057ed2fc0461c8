//! # portal-identity
//!
//! Role-specific identity providers for the portal identity client.
//!
//! - [`UserProvider`] - registration, login, profile update, password change
//!   and account deletion for ordinary users
//! - [`AdminProvider`] - administrator login, roster listing and
//!   administrator creation
//!
//! Both providers talk to the remote API through
//! [`portal_api::AccountApi`] and, on success, hand the authenticated
//! account to [`portal_session::SessionManager::commit_session`].
//!
//! ## Error reporting
//!
//! Every operation returns an [`IdentityResult`] and also records the
//! error text in the provider's sticky `last_error`, for display. Each
//! provider exposes a `loading` flag that is set for the duration of an
//! operation and cleared on every exit path.
//!
//! ## Example
//!
//! ```ignore
//! let session = Arc::new(SessionManager::with_mock_tokens(store));
//! let users = UserProvider::new(api.clone(), session.clone());
//!
//! users.login(&LoginCredentials::new("ada@x.com", "p")).await?;
//! assert!(session.is_authenticated());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod admin;
pub mod error;
pub mod status;
pub mod user;
pub mod username;

pub use admin::{AdminProvider, CreatedAdmin};
pub use error::{IdentityError, IdentityResult};
pub use status::ProviderStatus;
pub use user::UserProvider;
