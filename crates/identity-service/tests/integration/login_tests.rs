//! E2E tests for password login and token issuance.

use identity_test_utils::{
    SessionTokenAssertions, TestAccountBuilder, TestIdentityServer, TEST_EMAIL_ALICE,
    TEST_EMAIL_BOB, TEST_PASSWORD,
};
use reqwest::StatusCode;
use serde_json::{json, Value};

async fn post_login(
    server: &TestIdentityServer,
    email: &str,
    password: &str,
) -> Result<reqwest::Response, anyhow::Error> {
    Ok(server
        .client()
        .post(format!("{}/api/v1/user/login", server.url()))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await?)
}

#[tokio::test]
async fn test_login_happy_path_returns_session_token() -> Result<(), anyhow::Error> {
    let server = TestIdentityServer::spawn().await?;
    let account = server.register(&TestAccountBuilder::alice().build()).await?;
    let account_id = account["id"].as_i64().unwrap_or_default();

    let token = server.login(TEST_EMAIL_ALICE, TEST_PASSWORD).await?;

    token
        .assert_valid_jwt()
        .assert_for_account(account_id)
        .assert_for_email(TEST_EMAIL_ALICE)
        .assert_no_expiry();

    Ok(())
}

#[tokio::test]
async fn test_login_with_ttl_sets_expiry() -> Result<(), anyhow::Error> {
    let server = TestIdentityServer::spawn_with_ttl(1200).await?;
    server.register(&TestAccountBuilder::alice().build()).await?;

    let token = server.login(TEST_EMAIL_ALICE, TEST_PASSWORD).await?;

    token.assert_valid_jwt().assert_expires_in(1200);

    Ok(())
}

#[tokio::test]
async fn test_login_email_is_normalized() -> Result<(), anyhow::Error> {
    let server = TestIdentityServer::spawn().await?;
    server.register(&TestAccountBuilder::alice().build()).await?;

    let token = server.login("  Alice@EXAMPLE.com ", TEST_PASSWORD).await?;
    token.assert_for_email(TEST_EMAIL_ALICE);

    Ok(())
}

#[tokio::test]
async fn test_login_wrong_password_rejected() -> Result<(), anyhow::Error> {
    let server = TestIdentityServer::spawn().await?;
    server.register(&TestAccountBuilder::alice().build()).await?;

    let response = post_login(&server, TEST_EMAIL_ALICE, "not-the-password").await?;

    assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
    let body: Value = response.json().await?;
    assert_eq!(body["error"]["code"], "PASSWORD_INCORRECT");
    assert_eq!(body["error"]["message"], "Incorrect password provided");
    assert!(body.get("token").is_none());

    Ok(())
}

#[tokio::test]
async fn test_login_unknown_email_rejected() -> Result<(), anyhow::Error> {
    let server = TestIdentityServer::spawn().await?;
    server.register(&TestAccountBuilder::alice().build()).await?;

    let response = post_login(&server, TEST_EMAIL_BOB, TEST_PASSWORD).await?;

    assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
    let body: Value = response.json().await?;
    assert_eq!(body["error"]["code"], "EMAIL_NOT_FOUND");
    assert_eq!(body["error"]["message"], "Email not found");

    Ok(())
}

#[tokio::test]
async fn test_login_malformed_email_rejected() -> Result<(), anyhow::Error> {
    let server = TestIdentityServer::spawn().await?;

    let response = post_login(&server, "garbage", TEST_PASSWORD).await?;

    assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
    let body: Value = response.json().await?;
    assert_eq!(body["error"]["code"], "EMAIL_INVALID");

    Ok(())
}

#[tokio::test]
async fn test_login_missing_password_is_incorrect() -> Result<(), anyhow::Error> {
    let server = TestIdentityServer::spawn().await?;
    server.register(&TestAccountBuilder::alice().build()).await?;

    let response = server
        .client()
        .post(format!("{}/api/v1/user/login", server.url()))
        .json(&json!({ "email": TEST_EMAIL_ALICE }))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
    let body: Value = response.json().await?;
    assert_eq!(body["error"]["code"], "PASSWORD_INCORRECT");

    Ok(())
}
