//! Administrator identity provider.

use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use portal_api::{AccountApi, AccountQuery, ApiError, Collection};
use portal_core::{Event, EventType};
use portal_model::{Account, AccountName, LoginCredentials, NewAccount, NewAdmin, Role};
use portal_session::SessionManager;

use crate::error::{IdentityError, IdentityResult};
use crate::status::{ProviderStatus, StatusCell};
use crate::username::admin_username;

/// Password given to every newly created administrator. The account is
/// flagged so the holder must replace it at first login.
pub const TEMPORARY_PASSWORD: &str = "temp12345";

/// Phone stored on new administrators created without one.
pub const UNSET_PHONE: &str = "yet to be set";

const CREATION_FAILED: &str = "Failed to create new administrator.";

/// Result of [`AdminProvider::create_admin`].
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedAdmin {
    /// The stored administrator record.
    pub account: Account,
    /// Password to hand to the new administrator.
    pub temp_password: String,
}

/// Administrator login, roster and creation.
pub struct AdminProvider {
    api: Arc<dyn AccountApi>,
    session: Arc<SessionManager>,
    status: StatusCell,
    roster: RwLock<Vec<Account>>,
}

impl std::fmt::Debug for AdminProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminProvider")
            .field("session", &self.session)
            .field("status", &self.status.snapshot())
            .field("roster", &self.roster.read().len())
            .finish_non_exhaustive()
    }
}

impl AdminProvider {
    /// Creates a provider with an empty roster.
    pub fn new(api: Arc<dyn AccountApi>, session: Arc<SessionManager>) -> Self {
        Self {
            api,
            session,
            status: StatusCell::default(),
            roster: RwLock::new(Vec::new()),
        }
    }

    /// Returns the shared session manager.
    #[must_use]
    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    /// Returns the loading flag and last error.
    #[must_use]
    pub fn status(&self) -> ProviderStatus {
        self.status.snapshot()
    }

    /// Checks if an operation is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.status.snapshot().loading
    }

    /// Returns the message of the most recent failure.
    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.status.snapshot().last_error
    }

    /// Returns the roster from the last successful [`list_admins`](Self::list_admins).
    #[must_use]
    pub fn admins(&self) -> Vec<Account> {
        self.roster.read().clone()
    }

    /// Signs an administrator in.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidCredentials`] unless exactly one
    /// administrator matches, and [`IdentityError::RequestFailed`] if the
    /// lookup fails.
    pub async fn login(&self, credentials: &LoginCredentials) -> IdentityResult<Account> {
        let _loading = self.status.begin();
        let result = self.try_login(credentials).await;
        self.status.record(EventType::Login, Role::Admin, result)
    }

    async fn try_login(&self, credentials: &LoginCredentials) -> IdentityResult<Account> {
        let query = AccountQuery::email(&credentials.email).with_password(&credentials.password);
        let mut matches = self.api.find(Collection::Admins, &query).await?;

        if matches.len() != 1 {
            if matches.len() > 1 {
                tracing::warn!(
                    email = %credentials.email,
                    count = matches.len(),
                    "ambiguous administrator login"
                );
            }
            return Err(IdentityError::InvalidCredentials(Role::Admin));
        }
        let account = matches.remove(0);

        self.session.commit_session(&account, Role::Admin);

        Event::builder(EventType::Login)
            .role(Role::Admin.as_str())
            .account(account.id.to_string())
            .email(account.email.clone())
            .emit();

        Ok(account)
    }

    /// Fetches every administrator and replaces the cached roster.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::RosterFetchFailed`] if the request fails;
    /// the previous roster is kept.
    pub async fn list_admins(&self) -> IdentityResult<Vec<Account>> {
        let _loading = self.status.begin();
        let result = self.refresh_roster().await;
        self.status.record(EventType::ListAdmins, Role::Admin, result)
    }

    async fn refresh_roster(&self) -> IdentityResult<Vec<Account>> {
        let admins = self
            .api
            .list(Collection::Admins)
            .await
            .map_err(IdentityError::RosterFetchFailed)?;

        *self.roster.write() = admins.clone();
        tracing::debug!(count = admins.len(), "administrator roster refreshed");
        Ok(admins)
    }

    /// Creates an administrator with a temporary password and refreshes
    /// the roster.
    ///
    /// A failed roster refresh is logged and recorded in `last_error`, but
    /// the creation still succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::AdminCreationFailed`] unless the server
    /// answers `201 Created` with the new record.
    pub async fn create_admin(&self, details: &NewAdmin) -> IdentityResult<CreatedAdmin> {
        let _loading = self.status.begin();
        let result = self.try_create_admin(details).await;
        let created = self
            .status
            .record(EventType::AdminCreated, Role::Admin, result)?;

        if let Err(e) = self.refresh_roster().await {
            tracing::warn!(
                account_id = %created.account.id,
                "administrator created but roster refresh failed: {}",
                e
            );
            self.status.set_error(e.to_string());
        }

        Ok(created)
    }

    async fn try_create_admin(&self, details: &NewAdmin) -> IdentityResult<CreatedAdmin> {
        let payload = new_admin_account(details);

        let created = self
            .api
            .create(Collection::Admins, &payload)
            .await
            .map_err(|e| creation_failed(&e))?;
        if created.status != 201 {
            tracing::warn!(status = created.status, "unexpected administrator creation status");
        }
        let account = created
            .into_created()
            .ok_or_else(|| IdentityError::AdminCreationFailed(CREATION_FAILED.to_string()))?;

        Event::builder(EventType::AdminCreated)
            .role(Role::Admin.as_str())
            .account(account.id.to_string())
            .email(account.email.clone())
            .detail("username", account.username.clone())
            .emit();

        Ok(CreatedAdmin {
            account,
            temp_password: TEMPORARY_PASSWORD.to_string(),
        })
    }
}

fn new_admin_account(details: &NewAdmin) -> NewAccount {
    NewAccount {
        email: details.email.clone(),
        username: admin_username(&details.name),
        password: TEMPORARY_PASSWORD.to_string(),
        name: AccountName::Full(details.name.clone()),
        phone: Some(
            details
                .phone
                .clone()
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| UNSET_PHONE.to_string()),
        ),
        address: None,
        must_change_password: Some(true),
        created_on: Some(Utc::now()),
        version: None,
    }
}

fn creation_failed(err: &ApiError) -> IdentityError {
    IdentityError::AdminCreationFailed(err.server_message().unwrap_or(CREATION_FAILED).to_string())
}
