//! Profile projection.

use serde::{Deserialize, Serialize};

use crate::account::{Account, AccountId, AccountName, Address};

/// The subset of an account exposed as the current identity and persisted
/// in the session cache. It never carries the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Account identifier.
    pub id: AccountId,
    /// Email address.
    pub email: String,
    /// Username.
    pub username: String,
    /// Account holder's name.
    pub name: AccountName,
    /// Phone number, `null` when unset or empty.
    pub phone: Option<String>,
    /// Postal address, `null` when unset.
    pub address: Option<Address>,
    /// Forced password change flag, absent for accounts that never had one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub must_change_password: Option<bool>,
}

impl From<&Account> for Profile {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.clone(),
            email: account.email.clone(),
            username: account.username.clone(),
            name: account.name.clone(),
            phone: account.phone.clone().filter(|p| !p.is_empty()),
            address: account.address.clone(),
            must_change_password: account.must_change_password,
        }
    }
}
