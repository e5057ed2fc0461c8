//! The in-memory session value.

use portal_model::{Profile, Role};

/// The authenticated half of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Authenticated {
    token: String,
    role: Role,
    profile: Profile,
}

/// The process-wide identity state.
///
/// A session is either anonymous or authenticated with exactly one role,
/// one token and one profile. Only [`SessionManager`](crate::SessionManager)
/// can construct an authenticated session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    auth: Option<Authenticated>,
}

impl Session {
    /// Creates an anonymous session.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { auth: None }
    }

    pub(crate) fn authenticated(token: String, role: Role, profile: Profile) -> Self {
        Self {
            auth: Some(Authenticated {
                token,
                role,
                profile,
            }),
        }
    }

    /// Checks if the session holds a token.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.auth.is_some()
    }

    /// Checks if the session belongs to an administrator.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role().is_some_and(Role::is_admin)
    }

    /// Returns the session token.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.auth.as_ref().map(|a| a.token.as_str())
    }

    /// Returns the session role, `None` when anonymous.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.auth.as_ref().map(|a| a.role)
    }

    /// Returns the profile of the current role.
    #[must_use]
    pub fn current_profile(&self) -> Option<&Profile> {
        self.auth.as_ref().map(|a| &a.profile)
    }

    /// Returns the profile if the session belongs to a user.
    #[must_use]
    pub fn user_profile(&self) -> Option<&Profile> {
        self.profile_for(Role::User)
    }

    /// Returns the profile if the session belongs to an administrator.
    #[must_use]
    pub fn admin_profile(&self) -> Option<&Profile> {
        self.profile_for(Role::Admin)
    }

    fn profile_for(&self, role: Role) -> Option<&Profile> {
        self.auth
            .as_ref()
            .filter(|a| a.role == role)
            .map(|a| &a.profile)
    }
}
