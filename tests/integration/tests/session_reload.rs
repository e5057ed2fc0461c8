//! Session persistence across restarts.

use std::sync::Arc;

use portal_cache::{FileSessionStore, SessionStore};
use portal_model::{LoginCredentials, Role};
use portal_session::{keys, SessionManager};

use crate::common::TestEnv;

#[tokio::test]
async fn test_session_survives_restart() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("session.json");

    let env = TestEnv::with_store(Arc::new(FileSessionStore::open(&path)?)).await?;
    let seeded = env.seed_user("bob@x.com", "pw");
    env.users
        .login(&LoginCredentials::new("bob@x.com", "pw"))
        .await?;
    let token = env.session.token();

    let reloaded = SessionManager::with_mock_tokens(Arc::new(FileSessionStore::open(&path)?));
    assert!(reloaded.is_authenticated());
    assert_eq!(reloaded.role(), Some(Role::User));
    assert_eq!(reloaded.token(), token);
    assert_eq!(reloaded.current_profile().map(|p| p.id), Some(seeded.id));

    Ok(())
}

#[tokio::test]
async fn test_logout_clears_persisted_session() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("session.json");

    let env = TestEnv::with_store(Arc::new(FileSessionStore::open(&path)?)).await?;
    env.seed_admin("root@x.com", "r");
    env.admins
        .login(&LoginCredentials::new("root@x.com", "r"))
        .await?;
    env.admins.session().logout();

    let store = FileSessionStore::open(&path)?;
    for key in keys::ALL {
        assert_eq!(store.get(key)?, None, "{key} should be cleared");
    }
    assert!(!SessionManager::with_mock_tokens(Arc::new(store)).is_authenticated());

    Ok(())
}

#[tokio::test]
async fn test_corrupt_profile_starts_anonymous() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("session.json");
    {
        let store = FileSessionStore::open(&path)?;
        store.set(keys::TOKEN, "fake-jwt-1-user-1")?;
        store.set(keys::ROLE, "user")?;
        store.set(keys::USER_PROFILE, "{not json")?;
    }

    let manager = SessionManager::with_mock_tokens(Arc::new(FileSessionStore::open(&path)?));
    assert!(!manager.is_authenticated());

    let store = FileSessionStore::open(&path)?;
    assert_eq!(store.get(keys::TOKEN)?, None);

    Ok(())
}
