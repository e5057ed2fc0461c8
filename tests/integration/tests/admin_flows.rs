//! Administrator flows over HTTP.

use portal_api::{Collection, Operation};
use portal_identity::admin::TEMPORARY_PASSWORD;
use portal_identity::IdentityError;
use portal_model::{LoginCredentials, NewAdmin, PasswordChange};

use crate::common::TestEnv;

#[tokio::test]
async fn test_admin_login_and_roster() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    let root = env.seed_admin("root@x.com", "r");
    env.seed_admin("second@x.com", "s");

    let account = env
        .admins
        .login(&LoginCredentials::new("root@x.com", "r"))
        .await?;
    assert_eq!(account.id, root.id);
    assert!(env.session.is_admin());
    assert!(env.session.user_profile().is_none());

    let roster = env.admins.list_admins().await?;
    assert_eq!(roster.len(), 2);
    assert_eq!(env.admins.admins().len(), 2);

    Ok(())
}

#[tokio::test]
async fn test_admin_does_not_log_in_as_user() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    env.seed_admin("root@x.com", "r");

    let err = env
        .users
        .login(&LoginCredentials::new("root@x.com", "r"))
        .await
        .unwrap_err();
    assert!(matches!(err, IdentityError::InvalidCredentials(_)));

    Ok(())
}

#[tokio::test]
async fn test_created_admin_must_change_password() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    env.seed_admin("root@x.com", "r");
    env.admins
        .login(&LoginCredentials::new("root@x.com", "r"))
        .await?;

    let created = env
        .admins
        .create_admin(&NewAdmin {
            name: "Grace Hopper".to_string(),
            email: "grace@x.com".to_string(),
            phone: None,
        })
        .await?;
    assert_eq!(created.account.username, "gracehopper88");
    assert_eq!(env.admins.admins().len(), 2);
    env.users.logout();

    // The new administrator signs in with the temporary password and
    // replaces it.
    let account = env
        .admins
        .login(&LoginCredentials::new("grace@x.com", &created.temp_password))
        .await?;
    assert_eq!(account.must_change_password, Some(true));

    env.users
        .change_password(&PasswordChange::new(TEMPORARY_PASSWORD, "hopper!", "hopper!"))
        .await?;

    let stored = env
        .backend
        .account(Collection::Admins, &account.id)
        .expect("admin exists");
    assert_eq!(stored.password.as_deref(), Some("hopper!"));
    assert_eq!(stored.must_change_password, Some(false));
    assert_eq!(
        env.session
            .admin_profile()
            .expect("signed in")
            .must_change_password,
        Some(false)
    );

    Ok(())
}

#[tokio::test]
async fn test_roster_failure_keeps_roster() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    env.seed_admin("root@x.com", "r");
    env.admins.list_admins().await?;

    env.backend.fail_on(Operation::List);
    let err = env.admins.list_admins().await.unwrap_err();

    assert!(matches!(err, IdentityError::RosterFetchFailed(_)));
    assert_eq!(env.admins.admins().len(), 1);

    Ok(())
}
