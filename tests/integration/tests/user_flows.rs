//! User account flows over HTTP.

use portal_api::{AccountApi, Collection, Operation};
use portal_identity::IdentityError;
use portal_model::{
    AccountName, Address, LoginCredentials, PasswordChange, ProfileUpdate, Registration, Role,
};

use crate::common::TestEnv;

fn ada() -> Registration {
    Registration {
        firstname: "Ada".to_string(),
        lastname: "Lovelace".to_string(),
        email: "ada+test@x.com".to_string(),
        password: "p&q=r".to_string(),
    }
}

#[tokio::test]
async fn test_register_then_login() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    let created = env.users.register(&ada()).await?;
    assert_eq!(created.username, "adalovelace11");
    assert_eq!(created.address, Some(Address::placeholder()));
    assert!(env.session.is_authenticated());

    env.users.logout();
    assert!(!env.session.is_authenticated());

    // Special characters in email and password survive query encoding.
    let account = env
        .users
        .login(&LoginCredentials::new("ada+test@x.com", "p&q=r"))
        .await?;
    assert_eq!(account.id, created.id);
    assert_eq!(env.session.role(), Some(Role::User));

    Ok(())
}

#[tokio::test]
async fn test_duplicate_registration() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    env.users.register(&ada()).await?;
    env.users.logout();

    let err = env.users.register(&ada()).await.unwrap_err();
    assert!(matches!(err, IdentityError::DuplicateAccount));
    assert_eq!(env.backend.accounts(Collection::Users).len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_registration_server_error_message() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    env.backend.fail_on(Operation::Create);

    let err = env.users.register(&ada()).await.unwrap_err();
    assert!(matches!(err, IdentityError::RegistrationFailed(_)));
    assert_eq!(err.to_string(), "API unavailable: Create failed");
    assert!(!env.session.is_authenticated());

    Ok(())
}

#[tokio::test]
async fn test_invalid_login() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    env.seed_user("bob@x.com", "right");

    let err = env
        .users
        .login(&LoginCredentials::new("bob@x.com", "wrong"))
        .await
        .unwrap_err();
    assert!(matches!(err, IdentityError::InvalidCredentials(Role::User)));
    assert!(env.users.last_error().is_some());
    assert!(!env.users.is_loading());

    Ok(())
}

#[tokio::test]
async fn test_profile_update_round_trip() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    let seeded = env.seed_user("bob@x.com", "pw");
    env.users
        .login(&LoginCredentials::new("bob@x.com", "pw"))
        .await?;

    let mut address = Address::placeholder();
    address.city = "kilcoole".to_string();
    let update = ProfileUpdate {
        username: "bobby".to_string(),
        name: AccountName::parts("Robert", "Tables"),
        phone: None,
        address: Some(address.clone()),
    };
    env.users.update_profile(&update).await?;

    let stored = env.api.get(Collection::Users, &seeded.id).await?;
    assert_eq!(stored.username, "bobby");
    assert_eq!(stored.email, "bob@x.com");
    assert_eq!(stored.password.as_deref(), Some("pw"));
    assert_eq!(stored.address, Some(address));

    let profile = env.session.current_profile().expect("signed in");
    assert_eq!(profile.name, AccountName::parts("Robert", "Tables"));
    assert_eq!(profile.phone, None);

    Ok(())
}

#[tokio::test]
async fn test_password_change_then_relogin() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    env.seed_user("bob@x.com", "old");
    env.users
        .login(&LoginCredentials::new("bob@x.com", "old"))
        .await?;

    let err = env
        .users
        .change_password(&PasswordChange::new("bad", "new", "new"))
        .await
        .unwrap_err();
    assert!(matches!(err, IdentityError::IncorrectPassword));

    env.users
        .change_password(&PasswordChange::new("old", "new", "new"))
        .await?;
    env.users.logout();

    assert!(env
        .users
        .login(&LoginCredentials::new("bob@x.com", "old"))
        .await
        .is_err());
    env.users
        .login(&LoginCredentials::new("bob@x.com", "new"))
        .await?;

    Ok(())
}

#[tokio::test]
async fn test_delete_account() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    let seeded = env.seed_user("bob@x.com", "pw");
    env.users
        .login(&LoginCredentials::new("bob@x.com", "pw"))
        .await?;

    env.users.delete_account().await?;

    assert!(!env.session.is_authenticated());
    let err = env.api.get(Collection::Users, &seeded.id).await.unwrap_err();
    assert!(err.is_not_found());

    Ok(())
}
