//! User identity provider.

use std::sync::Arc;

use portal_api::{AccountApi, AccountQuery, ApiError, Collection};
use portal_core::{Event, EventType};
use portal_model::{
    Account, AccountId, AccountName, AccountPatch, Address, LoginCredentials, NewAccount,
    PasswordChange, ProfileUpdate, Registration, Role, PENDING_FIELD,
};
use portal_session::SessionManager;

use crate::error::{IdentityError, IdentityResult};
use crate::status::{ProviderStatus, StatusCell};
use crate::username::user_username;

const REGISTRATION_FAILED: &str = "Server failed to create user record.";
const PROFILE_FETCH_FAILED: &str = "Could not fetch current user data for update.";
const PROFILE_UPDATE_FAILED: &str = "Failed to update user details on server.";
const PASSWORD_UPDATE_FAILED: &str = "Failed to update password.";
const USERS_ONLY: &str = "Action limited to authenticated clients.";
const SESSION_REQUIRED: &str = "Action requires an authenticated session.";

/// Account lifecycle for ordinary users.
///
/// Successful operations commit the resulting account to the shared
/// [`SessionManager`]. `change_password`, `delete_account` and `logout` act
/// on whichever role is signed in.
pub struct UserProvider {
    api: Arc<dyn AccountApi>,
    session: Arc<SessionManager>,
    status: StatusCell,
}

impl std::fmt::Debug for UserProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserProvider")
            .field("session", &self.session)
            .field("status", &self.status.snapshot())
            .finish_non_exhaustive()
    }
}

impl UserProvider {
    /// Creates a provider over the remote API and the shared session.
    pub fn new(api: Arc<dyn AccountApi>, session: Arc<SessionManager>) -> Self {
        Self {
            api,
            session,
            status: StatusCell::default(),
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

    /// Registers a new user account and signs it in.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::DuplicateAccount`] if the email is taken and
    /// [`IdentityError::RegistrationFailed`] if the server does not answer
    /// `201 Created` with the new record.
    pub async fn register(&self, registration: &Registration) -> IdentityResult<Account> {
        let _loading = self.status.begin();
        let result = self.try_register(registration).await;
        self.status.record(EventType::Register, Role::User, result)
    }

    async fn try_register(&self, registration: &Registration) -> IdentityResult<Account> {
        let existing = self
            .api
            .find(Collection::Users, &AccountQuery::email(&registration.email))
            .await
            .map_err(registration_failed)?;
        if !existing.is_empty() {
            return Err(IdentityError::DuplicateAccount);
        }

        let created = self
            .api
            .create(Collection::Users, &new_user_account(registration))
            .await
            .map_err(registration_failed)?;
        let account = created
            .into_created()
            .ok_or_else(|| IdentityError::RegistrationFailed(REGISTRATION_FAILED.to_string()))?;

        self.session.commit_session(&account, Role::User);

        Event::builder(EventType::Register)
            .role(Role::User.as_str())
            .account(account.id.to_string())
            .email(account.email.clone())
            .emit();

        Ok(account)
    }

    /// Signs a user in with email and password.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidCredentials`] if no account matches
    /// and [`IdentityError::RequestFailed`] if the lookup fails.
    pub async fn login(&self, credentials: &LoginCredentials) -> IdentityResult<Account> {
        let _loading = self.status.begin();
        let result = self.try_login(credentials).await;
        self.status.record(EventType::Login, Role::User, result)
    }

    async fn try_login(&self, credentials: &LoginCredentials) -> IdentityResult<Account> {
        let query = AccountQuery::email(&credentials.email).with_password(&credentials.password);
        let account = self
            .api
            .find(Collection::Users, &query)
            .await?
            .into_iter()
            .next()
            .ok_or(IdentityError::InvalidCredentials(Role::User))?;

        self.session.commit_session(&account, Role::User);

        Event::builder(EventType::Login)
            .role(Role::User.as_str())
            .account(account.id.to_string())
            .email(account.email.clone())
            .emit();

        Ok(account)
    }

    /// Replaces the signed-in user's editable profile fields.
    ///
    /// Id, email, password and version are taken from the stored record, not
    /// from the caller.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Forbidden`] unless a user (not an
    /// administrator) is signed in, and [`IdentityError::UpdateFailed`] if
    /// the record cannot be fetched or replaced.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> IdentityResult<Account> {
        let _loading = self.status.begin();
        let result = self.try_update_profile(update).await;
        self.status.record(EventType::UpdateProfile, Role::User, result)
    }

    async fn try_update_profile(&self, update: &ProfileUpdate) -> IdentityResult<Account> {
        let session = self.session.snapshot();
        let id = match (session.role(), session.current_profile()) {
            (Some(Role::User), Some(profile)) => profile.id.clone(),
            _ => return Err(IdentityError::Forbidden(USERS_ONLY)),
        };

        let current = self
            .api
            .get(Collection::Users, &id)
            .await
            .map_err(|e| {
                tracing::debug!(account_id = %id, "profile fetch failed: {}", e);
                IdentityError::UpdateFailed(PROFILE_FETCH_FAILED.to_string())
            })?;

        let merged = Account {
            username: update.username.clone(),
            name: update.name.clone(),
            phone: update.phone.clone(),
            address: update.address.clone(),
            version: Some(current.version.unwrap_or(0)),
            ..current
        };

        let updated = self
            .api
            .replace(Collection::Users, &merged)
            .await
            .map_err(|e| update_failed(&e, PROFILE_UPDATE_FAILED))?;

        self.session.commit_session(&updated, Role::User);

        Event::builder(EventType::UpdateProfile)
            .role(Role::User.as_str())
            .account(updated.id.to_string())
            .emit();

        Ok(updated)
    }

    /// Changes the signed-in account's password.
    ///
    /// Works for either role; the record is read from and patched in the
    /// collection of the current role.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::PasswordMismatch`] without sending a request
    /// if the confirmation differs, [`IdentityError::Forbidden`] if nobody is
    /// signed in, [`IdentityError::IncorrectPassword`] if the old password is
    /// wrong and [`IdentityError::UpdateFailed`] if a request fails.
    pub async fn change_password(&self, change: &PasswordChange) -> IdentityResult<Account> {
        let _loading = self.status.begin();
        let role = self.session.role().unwrap_or(Role::User);
        let result = self.try_change_password(change).await;
        self.status.record(EventType::UpdatePassword, role, result)
    }

    async fn try_change_password(&self, change: &PasswordChange) -> IdentityResult<Account> {
        if !change.is_confirmed() {
            return Err(IdentityError::PasswordMismatch);
        }

        let (role, id) = self.signed_in()?;
        let collection = Collection::for_role(role);

        let current = self
            .api
            .get(collection, &id)
            .await
            .map_err(|e| update_failed(&e, PASSWORD_UPDATE_FAILED))?;
        if current.password.as_deref() != Some(change.old_password.as_str()) {
            return Err(IdentityError::IncorrectPassword);
        }

        let updated = self
            .api
            .patch(collection, &id, &AccountPatch::password(&change.new_password))
            .await
            .map_err(|e| update_failed(&e, PASSWORD_UPDATE_FAILED))?;

        self.session.commit_session(&updated, role);

        Event::builder(EventType::UpdatePassword)
            .role(role.as_str())
            .account(id.to_string())
            .emit();

        Ok(updated)
    }

    /// Deletes the signed-in account and signs out.
    ///
    /// A failed delete request is recorded in `last_error` and logged, but
    /// still returns `Ok(())` and leaves the session signed in.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Forbidden`] if nobody is signed in.
    pub async fn delete_account(&self) -> IdentityResult<()> {
        let _loading = self.status.begin();

        let (role, id) = match self.signed_in() {
            Ok(identity) => identity,
            Err(e) => return self.status.record(EventType::DeleteAccount, Role::User, Err(e)),
        };

        match self.api.delete(Collection::for_role(role), &id).await {
            Ok(()) => {
                Event::builder(EventType::DeleteAccount)
                    .role(role.as_str())
                    .account(id.to_string())
                    .emit();
                self.session.logout();
            }
            Err(e) => {
                let err = IdentityError::RequestFailed(e);
                tracing::warn!(account_id = %id, role = %role, "account deletion failed: {}", err);
                let _ = self
                    .status
                    .record::<()>(EventType::DeleteAccount, role, Err(err));
            }
        }

        Ok(())
    }

    /// Signs out. Idempotent.
    pub fn logout(&self) {
        self.session.logout();
    }

    fn signed_in(&self) -> IdentityResult<(Role, AccountId)> {
        let session = self.session.snapshot();
        match (session.role(), session.current_profile()) {
            (Some(role), Some(profile)) => Ok((role, profile.id.clone())),
            _ => Err(IdentityError::Forbidden(SESSION_REQUIRED)),
        }
    }
}

fn new_user_account(registration: &Registration) -> NewAccount {
    NewAccount {
        email: registration.email.clone(),
        username: user_username(&registration.firstname, &registration.lastname),
        password: registration.password.clone(),
        name: AccountName::parts(&registration.firstname, &registration.lastname),
        phone: Some(PENDING_FIELD.to_string()),
        address: Some(Address::placeholder()),
        must_change_password: None,
        created_on: None,
        version: Some(0),
    }
}

fn registration_failed(err: ApiError) -> IdentityError {
    tracing::debug!("registration request failed: {}", err);
    IdentityError::RegistrationFailed(
        err.server_message()
            .unwrap_or(REGISTRATION_FAILED)
            .to_string(),
    )
}

fn update_failed(err: &ApiError, default: &str) -> IdentityError {
    IdentityError::UpdateFailed(err.server_message().unwrap_or(default).to_string())
}
