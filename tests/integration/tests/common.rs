//! Common test utilities and fixtures.

use std::sync::Arc;

use portal_api::{Collection, HttpAccountApi, MemoryAccountApi};
use portal_cache::{MemorySessionStore, SessionStore};
use portal_core::PortalConfig;
use portal_identity::{AdminProvider, UserProvider};
use portal_integration_tests::StubServer;
use portal_model::{Account, AccountName, NewAccount};
use portal_session::SessionManager;

/// Test environment: a stub server plus providers wired to it over HTTP.
pub struct TestEnv {
    /// Records behind the stub server.
    pub backend: Arc<MemoryAccountApi>,
    /// HTTP client pointed at the stub server.
    pub api: Arc<HttpAccountApi>,
    /// Shared session.
    pub session: Arc<SessionManager>,
    /// User provider.
    pub users: UserProvider,
    /// Administrator provider.
    pub admins: AdminProvider,
    /// Kept alive for the duration of the test.
    _server: StubServer,
}

impl TestEnv {
    /// Starts a stub server and builds providers over an in-memory cache.
    pub async fn new() -> anyhow::Result<Self> {
        Self::with_store(Arc::new(MemorySessionStore::new())).await
    }

    /// Starts a stub server and builds providers over `store`.
    pub async fn with_store(store: Arc<dyn SessionStore>) -> anyhow::Result<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("portal=debug,portal_api=debug")
            .with_test_writer()
            .try_init();

        let backend = Arc::new(MemoryAccountApi::new());
        let server = StubServer::start(backend.clone()).await?;

        let config = PortalConfig::for_testing(&server.base_url());
        let api = Arc::new(HttpAccountApi::new(&config)?);
        let session = Arc::new(SessionManager::with_mock_tokens(store));

        Ok(Self {
            users: UserProvider::new(api.clone(), session.clone()),
            admins: AdminProvider::new(api.clone(), session.clone()),
            backend,
            api,
            session,
            _server: server,
        })
    }

    /// Seeds a user record directly into the backend.
    pub fn seed_user(&self, email: &str, password: &str) -> Account {
        self.backend.seed(
            Collection::Users,
            NewAccount {
                email: email.to_string(),
                username: "seeded".to_string(),
                password: password.to_string(),
                name: AccountName::parts("Seeded", "User"),
                phone: Some("555-0100".to_string()),
                address: None,
                must_change_password: None,
                created_on: None,
                version: Some(0),
            },
        )
    }

    /// Seeds an administrator record directly into the backend.
    pub fn seed_admin(&self, email: &str, password: &str) -> Account {
        self.backend.seed(
            Collection::Admins,
            NewAccount {
                email: email.to_string(),
                username: "root88".to_string(),
                password: password.to_string(),
                name: AccountName::Full("Root Admin".to_string()),
                phone: None,
                address: None,
                must_change_password: Some(false),
                created_on: None,
                version: None,
            },
        )
    }
}
