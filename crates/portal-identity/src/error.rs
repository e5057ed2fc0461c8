//! Identity provider error types.

use portal_api::ApiError;
use portal_model::Role;
use thiserror::Error;

/// Errors returned by the identity providers.
///
/// Display strings are written for end users; they end up in the
/// providers' `last_error`.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// An account with the email already exists.
    #[error("Email is already registered")]
    DuplicateAccount,

    /// The server did not create the user account.
    #[error("{0}")]
    RegistrationFailed(String),

    /// No account matched the submitted email and password.
    #[error("Invalid {} credentials.", role_label(.0))]
    InvalidCredentials(Role),

    /// The current session may not perform the operation.
    #[error("{0}")]
    Forbidden(&'static str),

    /// Fetching or submitting an account update failed.
    #[error("{0}")]
    UpdateFailed(String),

    /// The new password and its confirmation differ.
    #[error("New passwords do not match.")]
    PasswordMismatch,

    /// The current password was wrong.
    #[error("Incorrect old password.")]
    IncorrectPassword,

    /// The administrator roster could not be fetched.
    #[error("Failed to fetch administrator list.")]
    RosterFetchFailed(#[source] ApiError),

    /// The server did not create the administrator account.
    #[error("{0}")]
    AdminCreationFailed(String),

    /// Uncategorized transport or API error.
    #[error("{0}")]
    RequestFailed(#[from] ApiError),
}

fn role_label(role: &Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Admin => "administrator",
    }
}

/// Result type for identity operations.
pub type IdentityResult<T> = Result<T, IdentityError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_messages_name_the_role() {
        assert_eq!(
            IdentityError::InvalidCredentials(Role::User).to_string(),
            "Invalid user credentials."
        );
        assert_eq!(
            IdentityError::InvalidCredentials(Role::Admin).to_string(),
            "Invalid administrator credentials."
        );
    }

    #[test]
    fn roster_failure_keeps_source() {
        let err = IdentityError::RosterFetchFailed(ApiError::Unavailable("down".to_string()));
        assert_eq!(err.to_string(), "Failed to fetch administrator list.");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn request_failed_wraps_api_error() {
        let err: IdentityError = ApiError::Status {
            status: 500,
            message: "boom".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "API error: 500 - boom");
    }
}
