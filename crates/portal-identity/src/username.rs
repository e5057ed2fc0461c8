//! Username derivation for new accounts.

/// Suffix appended to generated administrator usernames.
pub const ADMIN_USERNAME_SUFFIX: &str = "88";

/// Username used when an administrator's name has no usable tokens.
pub const DEFAULT_ADMIN_USERNAME: &str = "newadmin88";

/// Derives a user's username: lowercase first and last name concatenated,
/// followed by the character count of that concatenation.
///
/// ```
/// use portal_identity::username::user_username;
///
/// assert_eq!(user_username("Ada", "Lovelace"), "adalovelace11");
/// ```
#[must_use]
pub fn user_username(firstname: &str, lastname: &str) -> String {
    let base = format!("{firstname}{lastname}");
    format!("{}{}", base.to_lowercase(), base.chars().count())
}

/// Derives an administrator's username from the first two words of their
/// name.
///
/// ```
/// use portal_identity::username::admin_username;
///
/// assert_eq!(admin_username("Grace Brewster Hopper"), "gracebrewster88");
/// assert_eq!(admin_username("   "), "newadmin88");
/// ```
#[must_use]
pub fn admin_username(full_name: &str) -> String {
    let base: String = full_name
        .to_lowercase()
        .split_whitespace()
        .take(2)
        .collect();

    if base.is_empty() {
        DEFAULT_ADMIN_USERNAME.to_string()
    } else {
        format!("{base}{ADMIN_USERNAME_SUFFIX}")
    }
}
