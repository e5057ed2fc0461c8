//! The session manager.

use std::sync::Arc;

use parking_lot::RwLock;
use portal_cache::{CacheResult, SessionStore};
use portal_core::event::{Event, EventType};
use portal_model::{Account, Profile, Role};

use crate::keys;
use crate::session::Session;
use crate::token::{MockTokenIssuer, TokenIssuer};

/// Single authority over the authenticated identity.
///
/// All transitions go through [`commit_session`](Self::commit_session) and
/// [`logout`](Self::logout). Each replaces the whole in-memory [`Session`]
/// under one write lock and mirrors it into the session store, so readers
/// never observe a half-updated identity.
///
/// Cache failures never surface as errors: unreadable entries are purged on
/// start-up, and a failed write purges the persisted keys so a reload comes
/// back anonymous instead of resurrecting a stale identity.
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    issuer: Arc<dyn TokenIssuer>,
    session: RwLock<Session>,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("session", &*self.session.read())
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    /// Creates the manager, rehydrating the session from `store`.
    ///
    /// Never fails. A role marker without a token, an unknown role marker,
    /// or a missing or unparseable profile blob all yield an anonymous
    /// session, and the persisted keys are purged.
    pub fn initialize(store: Arc<dyn SessionStore>, issuer: Arc<dyn TokenIssuer>) -> Self {
        let session = restore(store.as_ref());
        Self {
            store,
            issuer,
            session: RwLock::new(session),
        }
    }

    /// Creates the manager with the placeholder [`MockTokenIssuer`].
    pub fn with_mock_tokens(store: Arc<dyn SessionStore>) -> Self {
        Self::initialize(store, Arc::new(MockTokenIssuer::new()))
    }

    /// Records a successful authentication or profile refresh.
    ///
    /// Mints a fresh token, projects the account into a profile, replaces
    /// the session (last commit wins) and persists token, role marker and
    /// profile blob. The other role's profile blob is removed.
    ///
    /// Callers must have validated the remote API's response first; this
    /// method has no failure mode of its own.
    pub fn commit_session(&self, account: &Account, role: Role) -> Session {
        let token = self.issuer.issue(account, role);
        let profile = Profile::from(account);
        let session = Session::authenticated(token, role, profile);

        *self.session.write() = session.clone();

        if let Err(e) = persist(self.store.as_ref(), &session) {
            tracing::warn!(
                account_id = %account.id,
                role = %role,
                "failed to persist session, clearing session cache: {}",
                e
            );
            purge(self.store.as_ref());
        }

        tracing::debug!(account_id = %account.id, role = %role, "session committed");
        session
    }

    /// Tears the session down. Idempotent.
    pub fn logout(&self) {
        purge(self.store.as_ref());

        let previous = std::mem::take(&mut *self.session.write());

        if let (Some(role), Some(profile)) = (previous.role(), previous.current_profile()) {
            Event::builder(EventType::Logout)
                .role(role.as_str())
                .account(profile.id.to_string())
                .emit();
        }
    }

    /// Returns a copy of the current session.
    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.session.read().clone()
    }

    /// Checks if a session token is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.read().is_authenticated()
    }

    /// Checks if the session belongs to an administrator.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.session.read().is_admin()
    }

    /// Returns the current role, `None` when anonymous.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.session.read().role()
    }

    /// Returns the current session token.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.session.read().token().map(str::to_string)
    }

    /// Returns the profile matching the current role.
    #[must_use]
    pub fn current_profile(&self) -> Option<Profile> {
        self.session.read().current_profile().cloned()
    }

    /// Returns the profile of a user session.
    #[must_use]
    pub fn user_profile(&self) -> Option<Profile> {
        self.session.read().user_profile().cloned()
    }

    /// Returns the profile of an administrator session.
    #[must_use]
    pub fn admin_profile(&self) -> Option<Profile> {
        self.session.read().admin_profile().cloned()
    }
}

fn persist(store: &dyn SessionStore, session: &Session) -> CacheResult<()> {
    let (Some(token), Some(role), Some(profile)) =
        (session.token(), session.role(), session.current_profile())
    else {
        return Ok(());
    };

    let blob = serde_json::to_string(profile)?;
    let other = match role {
        Role::User => Role::Admin,
        Role::Admin => Role::User,
    };

    store.set(keys::TOKEN, token)?;
    store.set(keys::ROLE, role.as_str())?;
    store.set(keys::profile_key(role), &blob)?;
    store.remove(keys::profile_key(other))?;
    Ok(())
}

/// Removes the session keys. If any removal fails the whole store is
/// cleared instead.
fn purge(store: &dyn SessionStore) {
    let mut failed = false;
    for key in keys::ALL {
        if let Err(e) = store.remove(key) {
            tracing::warn!(key, "failed to remove session cache entry: {}", e);
            failed = true;
        }
    }

    if failed {
        if let Err(e) = store.clear() {
            tracing::error!("failed to clear session cache, a stale session may be restored: {}", e);
        }
    }
}

fn read(store: &dyn SessionStore, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key, "failed to read session cache entry: {}", e);
            None
        }
    }
}

fn restore(store: &dyn SessionStore) -> Session {
    let token = read(store, keys::TOKEN);
    let Some(tag) = read(store, keys::ROLE) else {
        if token.is_some() {
            tracing::debug!("session token without role marker, clearing session cache");
            purge(store);
        }
        return Session::anonymous();
    };

    let Some(role) = Role::from_tag(&tag) else {
        tracing::warn!(role = %tag, "unknown role marker in session cache, clearing it");
        purge(store);
        return Session::anonymous();
    };

    let profile_key = keys::profile_key(role);
    let profile = read(store, profile_key).and_then(|blob| {
        match serde_json::from_str::<Profile>(&blob) {
            Ok(profile) => Some(profile),
            Err(e) => {
                tracing::warn!(key = profile_key, "discarding corrupt profile blob: {}", e);
                if let Err(e) = store.remove(profile_key) {
                    tracing::warn!(key = profile_key, "failed to remove corrupt profile blob: {}", e);
                }
                None
            }
        }
    });

    match (token, profile) {
        (Some(token), Some(profile)) => {
            Event::builder(EventType::SessionRestored)
                .role(role.as_str())
                .account(profile.id.to_string())
                .emit();
            Session::authenticated(token, role, profile)
        }
        _ => {
            tracing::debug!(role = %role, "incomplete session in cache, clearing it");
            purge(store);
            Session::anonymous()
        }
    }
}
