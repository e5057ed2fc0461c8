//! Caller-supplied credentials and mutation payloads.
//!
//! Types holding passwords implement `Debug` by hand so secrets never reach
//! logs.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::account::{AccountName, Address};

/// Email and password submitted at login.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginCredentials {
    /// Email address.
    pub email: String,
    /// Password.
    pub password: String,
}

impl LoginCredentials {
    /// Creates login credentials.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Self-service registration form for a user account.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    /// First name.
    pub firstname: String,
    /// Last name.
    pub lastname: String,
    /// Email address.
    pub email: String,
    /// Chosen password.
    pub password: String,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("firstname", &self.firstname)
            .field("lastname", &self.lastname)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Details of an administrator created by another administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAdmin {
    /// Full name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Phone number.
    #[serde(default)]
    pub phone: Option<String>,
}

/// Editable profile fields submitted by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    /// Username.
    pub username: String,
    /// Name.
    pub name: AccountName,
    /// Phone number.
    pub phone: Option<String>,
    /// Postal address.
    pub address: Option<Address>,
}

/// Password change form.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordChange {
    /// Current password.
    pub old_password: String,
    /// New password.
    pub new_password: String,
    /// New password, repeated.
    pub confirm_password: String,
}

impl PasswordChange {
    /// Creates a password change form.
    #[must_use]
    pub fn new(
        old_password: impl Into<String>,
        new_password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Self {
            old_password: old_password.into(),
            new_password: new_password.into(),
            confirm_password: confirm_password.into(),
        }
    }

    /// Checks that the new password was typed the same way twice.
    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        self.new_password == self.confirm_password
    }
}

impl fmt::Debug for PasswordChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordChange").finish_non_exhaustive()
    }
}
