//! Account API trait and request types.

use std::fmt;

use async_trait::async_trait;
use portal_model::{Account, AccountId, AccountPatch, NewAccount, Role};

use crate::error::ApiResult;

/// A collection of accounts on the remote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// Ordinary user accounts (`/users`).
    Users,
    /// Administrator accounts (`/admin`).
    Admins,
}

impl Collection {
    /// Returns the collection holding accounts of a role.
    #[must_use]
    pub const fn for_role(role: Role) -> Self {
        match role {
            Role::User => Self::Users,
            Role::Admin => Self::Admins,
        }
    }

    /// Returns the collection path.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Users => "/users",
            Self::Admins => "/admin",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path().trim_start_matches('/'))
    }
}

/// Exact-match lookup filter.
///
/// The password filter compares plaintext on the server; this mirrors how
/// the remote API stores credentials and is not a safe verification scheme.
#[derive(Clone, PartialEq, Eq)]
pub struct AccountQuery {
    email: String,
    password: Option<String>,
}

impl AccountQuery {
    /// Matches accounts with this email.
    #[must_use]
    pub fn email(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: None,
        }
    }

    /// Additionally matches the stored password.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Renders the percent-encoded query string (without `?`).
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut query = vec![format!("email={}", urlencoding::encode(&self.email))];
        if let Some(password) = &self.password {
            query.push(format!("password={}", urlencoding::encode(password)));
        }
        query.join("&")
    }

    /// Checks whether an account satisfies the filter.
    #[must_use]
    pub fn matches(&self, account: &Account) -> bool {
        account.email == self.email
            && self
                .password
                .as_ref()
                .map_or(true, |p| account.password.as_deref() == Some(p.as_str()))
    }
}

impl fmt::Debug for AccountQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountQuery")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Response to a create request.
///
/// The status is kept because only `201 Created` counts as success.
#[derive(Debug, Clone, PartialEq)]
pub struct Created {
    /// HTTP status of the response.
    pub status: u16,
    /// The created record, if the body held one.
    pub account: Option<Account>,
}

impl Created {
    /// Returns the created record if the server answered `201` with a body.
    #[must_use]
    pub fn into_created(self) -> Option<Account> {
        if self.status == 201 {
            self.account
        } else {
            None
        }
    }
}

/// Operations on the remote account collections.
#[async_trait]
pub trait AccountApi: Send + Sync {
    /// Finds accounts matching a query.
    async fn find(&self, collection: Collection, query: &AccountQuery)
        -> ApiResult<Vec<Account>>;

    /// Lists every account of a collection.
    async fn list(&self, collection: Collection) -> ApiResult<Vec<Account>>;

    /// Gets one account by id.
    async fn get(&self, collection: Collection, id: &AccountId) -> ApiResult<Account>;

    /// Creates an account.
    async fn create(&self, collection: Collection, account: &NewAccount) -> ApiResult<Created>;

    /// Replaces an account wholesale (`PUT`).
    async fn replace(&self, collection: Collection, account: &Account) -> ApiResult<Account>;

    /// Applies a partial update (`PATCH`).
    async fn patch(
        &self,
        collection: Collection,
        id: &AccountId,
        patch: &AccountPatch,
    ) -> ApiResult<Account>;

    /// Deletes an account.
    async fn delete(&self, collection: Collection, id: &AccountId) -> ApiResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(email: &str, password: &str) -> Account {
        serde_json::from_value(serde_json::json!({
            "id": 1,
            "email": email,
            "password": password
        }))
        .unwrap()
    }

    #[test]
    fn query_string_is_encoded() {
        let query = AccountQuery::email("ada+test@x.com").with_password("p&q=r");
        assert_eq!(
            query.to_query_string(),
            "email=ada%2Btest%40x.com&password=p%26q%3Dr"
        );
    }

    #[test]
    fn email_only_query_ignores_password() {
        let query = AccountQuery::email("ada@x.com");
        assert!(query.matches(&account("ada@x.com", "anything")));
        assert!(!query.matches(&account("bob@x.com", "anything")));
    }

    #[test]
    fn password_query_is_exact() {
        let query = AccountQuery::email("ada@x.com").with_password("p");
        assert!(query.matches(&account("ada@x.com", "p")));
        assert!(!query.matches(&account("ada@x.com", "P")));
    }

    #[test]
    fn debug_hides_password() {
        let query = AccountQuery::email("ada@x.com").with_password("hunter2");
        assert!(!format!("{query:?}").contains("hunter2"));
    }

    #[test]
    fn only_201_counts_as_created() {
        let record = account("ada@x.com", "p");
        let created = Created {
            status: 201,
            account: Some(record.clone()),
        };
        assert_eq!(created.into_created(), Some(record.clone()));

        let ok = Created {
            status: 200,
            account: Some(record),
        };
        assert_eq!(ok.into_created(), None);
    }

    #[test]
    fn collection_paths() {
        assert_eq!(Collection::for_role(Role::User).path(), "/users");
        assert_eq!(Collection::for_role(Role::Admin).path(), "/admin");
        assert_eq!(Collection::Admins.to_string(), "admin");
    }
}
