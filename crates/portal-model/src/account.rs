//! Account records.
//!
//! Accounts are owned by the remote resource API. Users carry a structured
//! `{firstname, lastname}` name and a postal address; administrators carry a
//! plain full name, a creation timestamp and a `mustChangePassword` flag.
//! Both shapes share one record type.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Server-assigned account identifier.
///
/// json-server style backends hand out either numeric or string ids, so both
/// are accepted and written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AccountId {
    /// Numeric identifier.
    Number(u64),
    /// String identifier.
    Text(String),
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for AccountId {
    fn from(id: u64) -> Self {
        Self::Number(id)
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

impl From<String> for AccountId {
    fn from(id: String) -> Self {
        Self::Text(id)
    }
}

/// An account holder's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AccountName {
    /// Structured name used by user accounts.
    Parts {
        /// First name.
        #[serde(default, deserialize_with = "null_as_default")]
        firstname: String,
        /// Last name.
        #[serde(default, deserialize_with = "null_as_default")]
        lastname: String,
    },
    /// Single full name used by administrator accounts.
    Full(String),
}

impl AccountName {
    /// Creates a structured name.
    #[must_use]
    pub fn parts(firstname: impl Into<String>, lastname: impl Into<String>) -> Self {
        Self::Parts {
            firstname: firstname.into(),
            lastname: lastname.into(),
        }
    }
}

impl Default for AccountName {
    fn default() -> Self {
        Self::Full(String::new())
    }
}

/// Geographic coordinates attached to an address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geolocation {
    /// Latitude.
    #[serde(default)]
    pub lat: String,
    /// Longitude.
    #[serde(default)]
    pub long: String,
}

/// Postal address of a user account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Coordinates.
    #[serde(default)]
    pub geolocation: Geolocation,
    /// City.
    #[serde(default)]
    pub city: String,
    /// Street name.
    #[serde(default)]
    pub street: String,
    /// House number. Stored records sometimes carry it as a string.
    #[serde(default, deserialize_with = "number_or_numeric_string")]
    pub number: u32,
    /// Postal code.
    #[serde(default)]
    pub zipcode: String,
}

impl Address {
    /// Address stored on freshly registered accounts until the user fills it in.
    #[must_use]
    pub fn placeholder() -> Self {
        Self {
            geolocation: Geolocation {
                lat: "0".to_string(),
                long: "0".to_string(),
            },
            city: PENDING_FIELD.to_string(),
            street: PENDING_FIELD.to_string(),
            number: 0,
            zipcode: PENDING_FIELD.to_string(),
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn number_or_numeric_string<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u32),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(0),
        Some(Raw::Number(n)) => Ok(n),
        Some(Raw::Text(s)) if s.trim().is_empty() => Ok(0),
        Some(Raw::Text(s)) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid house number {s:?}"))),
    }
}

/// Placeholder written into user fields that are collected after registration.
pub const PENDING_FIELD: &str = "yet needed to add";

/// A full account record as stored by the remote API.
///
/// The password travels in plaintext because the remote API stores it that
/// way; it is never copied into the session cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Server-assigned identifier.
    pub id: AccountId,
    /// Email address (the login identifier).
    #[serde(default)]
    pub email: String,
    /// Username.
    #[serde(default)]
    pub username: String,
    /// Stored password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Account holder's name; `null` reads as an empty name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: AccountName,
    /// Phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Postal address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    /// Whether the holder must pick a new password at next login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub must_change_password: Option<bool>,
    /// When the account was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_on: Option<DateTime<Utc>>,
    /// Server-side version counter.
    #[serde(
        rename = "__v",
        alias = "__version",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub version: Option<u64>,
}

/// Payload for creating an account; the server assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    /// Email address.
    pub email: String,
    /// Username.
    pub username: String,
    /// Initial password.
    pub password: String,
    /// Account holder's name.
    pub name: AccountName,
    /// Phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Postal address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    /// Whether the holder must pick a new password at first login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub must_change_password: Option<bool>,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_on: Option<DateTime<Utc>>,
    /// Initial version counter.
    #[serde(rename = "__v", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
}

impl NewAccount {
    /// Attaches a server-assigned id, producing the stored record.
    #[must_use]
    pub fn with_id(self, id: AccountId) -> Account {
        Account {
            id,
            email: self.email,
            username: self.username,
            password: Some(self.password),
            name: self.name,
            phone: self.phone,
            address: self.address,
            must_change_password: self.must_change_password,
            created_on: self.created_on,
            version: self.version,
        }
    }
}

/// Partial update applied with `PATCH`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountPatch {
    /// New password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// New value of the forced-change flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub must_change_password: Option<bool>,
}

impl AccountPatch {
    /// Patch that sets a new password and clears the forced-change flag.
    #[must_use]
    pub fn password(new_password: impl Into<String>) -> Self {
        Self {
            password: Some(new_password.into()),
            must_change_password: Some(false),
        }
    }

    /// Applies the patch to a stored record.
    pub fn apply(&self, account: &mut Account) {
        if let Some(password) = &self.password {
            account.password = Some(password.clone());
        }
        if let Some(flag) = self.must_change_password {
            account.must_change_password = Some(flag);
        }
    }
}
