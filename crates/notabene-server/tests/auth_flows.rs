//! Authentication flow tests against the in-memory store.
//!
//! These tests run the real signup/login/bearer-resolution code paths with
//! the in-memory repository backing, so they cover the credential and
//! token decisions without a running database.

use axum::http::StatusCode;
use notabene_postgres::mock::MemoryStore;
use notabene_postgres::model::NewNote;
use notabene_postgres::query::{NoteRepository, UserRepository};
use notabene_server::handler::ErrorKind;
use notabene_server::service::{
    AuthService, IssuedToken, PasswordHasher, SessionKeys, SessionKeysConfig,
};

fn auth_service() -> anyhow::Result<AuthService> {
    let hasher = PasswordHasher::new()?;
    let keys = SessionKeys::from_config(&SessionKeysConfig {
        auth_secret: "integration-test-secret".to_owned(),
        auth_algorithm: "HS256".to_owned(),
        auth_token_ttl_minutes: 30,
    })?;
    Ok(AuthService::new(hasher, keys))
}

#[tokio::test]
async fn signup_returns_public_view_and_stores_a_hash() -> anyhow::Result<()> {
    let auth = auth_service()?;
    let mut store = MemoryStore::new();

    let user = auth.signup(&mut store, "Al", "al@x.com", "pw1").await?;

    assert_eq!(user.display_name, "Al");
    assert_eq!(user.email_address, "al@x.com");
    assert_ne!(user.password_hash, "pw1");
    assert!(user.password_hash.starts_with("$argon2id$"));

    // The stored hash verifies against the original password
    assert!(
        auth.password_hasher()
            .verify_password("pw1", &user.password_hash)
            .is_ok()
    );

    Ok(())
}

#[tokio::test]
async fn duplicate_signup_fails_with_email_taken() -> anyhow::Result<()> {
    let auth = auth_service()?;
    let mut store = MemoryStore::new();

    auth.signup(&mut store, "Al", "al@x.com", "pw1").await?;

    let error = auth
        .signup(&mut store, "Al Again", "al@x.com", "pw2")
        .await
        .expect_err("second signup with the same email must fail");
    assert_eq!(error.kind(), ErrorKind::EmailTaken);
    assert_eq!(error.kind().status_code(), StatusCode::CONFLICT);

    // Email comparison is case-insensitive
    let error = auth
        .signup(&mut store, "Al Again", "AL@X.COM", "pw2")
        .await
        .expect_err("same email with different case must fail");
    assert_eq!(error.kind(), ErrorKind::EmailTaken);

    Ok(())
}

#[tokio::test]
async fn login_does_not_distinguish_unknown_email_from_wrong_password() -> anyhow::Result<()> {
    let auth = auth_service()?;
    let mut store = MemoryStore::new();

    auth.signup(&mut store, "Al", "al@x.com", "pw1").await?;

    let unknown_email = auth
        .login(&mut store, "nobody@x.com", "pw1")
        .await
        .expect_err("unknown email must not log in");
    let wrong_password = auth
        .login(&mut store, "al@x.com", "wrong")
        .await
        .expect_err("wrong password must not log in");

    assert_eq!(unknown_email.kind(), ErrorKind::InvalidCredentials);
    assert_eq!(wrong_password.kind(), unknown_email.kind());

    // Identical wire responses as well
    let a = unknown_email.kind().response();
    let b = wrong_password.kind().response();
    assert_eq!(a.name, b.name);
    assert_eq!(a.message, b.message);
    assert_eq!(a.status, b.status);

    Ok(())
}

#[tokio::test]
async fn login_issues_a_resolvable_bearer_token() -> anyhow::Result<()> {
    let auth = auth_service()?;
    let mut store = MemoryStore::new();

    let created = auth.signup(&mut store, "Al", "al@x.com", "pw1").await?;
    let (user, issued) = auth.login(&mut store, "al@x.com", "pw1").await?;

    assert_eq!(user.id, created.id);
    assert_eq!(IssuedToken::TOKEN_TYPE, "Bearer");
    assert!(issued.expires_at > issued.issued_at);

    let resolved = auth
        .authorize_bearer(&mut store, Some(&issued.access_token))
        .await?;
    assert_eq!(resolved.id, created.id);

    Ok(())
}

#[tokio::test]
async fn corrupted_and_missing_tokens_collapse_to_unauthenticated() -> anyhow::Result<()> {
    let auth = auth_service()?;
    let mut store = MemoryStore::new();

    auth.signup(&mut store, "Al", "al@x.com", "pw1").await?;
    let (_, issued) = auth.login(&mut store, "al@x.com", "pw1").await?;

    // Reversed token: structurally broken
    let reversed: String = issued.access_token.chars().rev().collect();
    let error = auth
        .authorize_bearer(&mut store, Some(&reversed))
        .await
        .expect_err("reversed token must not resolve");
    assert_eq!(error.kind().status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(error.kind().response().name, "unauthenticated");

    // Missing token
    let error = auth
        .authorize_bearer(&mut store, None)
        .await
        .expect_err("absent token must not resolve");
    assert_eq!(error.kind().status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(error.kind().response().name, "unauthenticated");

    Ok(())
}

#[tokio::test]
async fn token_for_deleted_account_does_not_resolve() -> anyhow::Result<()> {
    let auth = auth_service()?;
    let mut store = MemoryStore::new();

    let user = auth.signup(&mut store, "Al", "al@x.com", "pw1").await?;
    let (_, issued) = auth.login(&mut store, "al@x.com", "pw1").await?;

    assert!(store.delete_user(user.id).await?);

    let error = auth
        .authorize_bearer(&mut store, Some(&issued.access_token))
        .await
        .expect_err("token for a deleted account must not resolve");
    assert_eq!(error.kind().status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(error.kind().response().name, "unauthenticated");

    Ok(())
}

#[tokio::test]
async fn note_lifecycle_is_scoped_to_its_author() -> anyhow::Result<()> {
    let auth = auth_service()?;
    let mut store = MemoryStore::new();

    let al = auth.signup(&mut store, "Al", "al@x.com", "pw1").await?;
    let bob = auth.signup(&mut store, "Bob", "bob@x.com", "pw2").await?;

    let note = store
        .create_note(NewNote {
            author_id: al.id,
            title: "T".to_owned(),
            content: "B".to_owned(),
            ..Default::default()
        })
        .await?;

    assert_eq!(note.author_id, al.id);
    assert!(jiff::Timestamp::from(note.created_at) > jiff::Timestamp::UNIX_EPOCH);

    // Bob cannot see or delete Al's note
    assert!(store.find_note(bob.id, note.id).await?.is_none());
    assert!(!store.delete_note(bob.id, note.id).await?);

    // Al can delete it, after which it is gone
    assert!(store.delete_note(al.id, note.id).await?);
    assert!(store.find_note(al.id, note.id).await?.is_none());

    Ok(())
}
