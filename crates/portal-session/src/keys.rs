//! Well-known session cache keys.

use portal_model::Role;

/// The session token.
pub const TOKEN: &str = "token";
/// The role marker (`user` or `admin`).
pub const ROLE: &str = "role";
/// JSON profile projection of a user session.
pub const USER_PROFILE: &str = "userProfile";
/// JSON profile projection of an administrator session.
pub const ADMIN_PROFILE: &str = "adminProfile";

/// Every key owned by the session manager.
pub const ALL: [&str; 4] = [TOKEN, ROLE, USER_PROFILE, ADMIN_PROFILE];

/// Returns the profile key used for a role.
#[must_use]
pub const fn profile_key(role: Role) -> &'static str {
    match role {
        Role::User => USER_PROFILE,
        Role::Admin => ADMIN_PROFILE,
    }
}
