//! E2E tests for self-service account updates and deletion.

use identity_test_utils::{
    SessionTokenAssertions, TestAccountBuilder, TestIdentityServer, TEST_EMAIL_ALICE,
    TEST_EMAIL_BOB, TEST_EMAIL_CHARLIE, TEST_PASSWORD, TEST_SHORT_PASSWORD,
};
use reqwest::StatusCode;
use serde_json::{json, Value};

async fn put_account(
    server: &TestIdentityServer,
    token: &str,
    body: &Value,
) -> Result<reqwest::Response, anyhow::Error> {
    Ok(server
        .client()
        .put(format!("{}/api/v1/user", server.url()))
        .bearer_auth(token)
        .json(body)
        .send()
        .await?)
}

async fn delete_account(
    server: &TestIdentityServer,
    token: &str,
) -> Result<reqwest::Response, anyhow::Error> {
    Ok(server
        .client()
        .delete(format!("{}/api/v1/user", server.url()))
        .bearer_auth(token)
        .send()
        .await?)
}

async fn error_code(response: reqwest::Response) -> Result<String, anyhow::Error> {
    let body: Value = response.json().await?;
    Ok(body["error"]["code"].as_str().unwrap_or_default().to_string())
}

/// Register alice and return a session token for her.
async fn alice_session(server: &TestIdentityServer) -> Result<String, anyhow::Error> {
    server.register(&TestAccountBuilder::alice().build()).await?;
    server.login(TEST_EMAIL_ALICE, TEST_PASSWORD).await
}

#[tokio::test]
async fn test_update_name_keeps_credentials() -> Result<(), anyhow::Error> {
    let server = TestIdentityServer::spawn().await?;
    let token = alice_session(&server).await?;

    let response = put_account(&server, &token, &json!({ "name": "Alice Renamed" })).await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await?;
    assert_eq!(body["name"], "Alice Renamed");
    assert_eq!(body["email"], TEST_EMAIL_ALICE);
    assert!(body.get("password_hash").is_none());

    // Old password still works
    server.login(TEST_EMAIL_ALICE, TEST_PASSWORD).await?;

    Ok(())
}

#[tokio::test]
async fn test_update_password_changes_login() -> Result<(), anyhow::Error> {
    let server = TestIdentityServer::spawn().await?;
    let token = alice_session(&server).await?;

    let response = put_account(
        &server,
        &token,
        &json!({ "password": "a-brand-new-passphrase" }),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::OK);

    assert!(
        server.login(TEST_EMAIL_ALICE, TEST_PASSWORD).await.is_err(),
        "Old password must stop working"
    );
    server
        .login(TEST_EMAIL_ALICE, "a-brand-new-passphrase")
        .await?
        .assert_for_email(TEST_EMAIL_ALICE);

    Ok(())
}

#[tokio::test]
async fn test_update_short_password_rejected() -> Result<(), anyhow::Error> {
    let server = TestIdentityServer::spawn().await?;
    let token = alice_session(&server).await?;

    let response = put_account(&server, &token, &json!({ "password": TEST_SHORT_PASSWORD })).await?;

    assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
    assert_eq!(error_code(response).await?, "PASSWORD_TOO_SHORT");

    server.login(TEST_EMAIL_ALICE, TEST_PASSWORD).await?;

    Ok(())
}

#[tokio::test]
async fn test_update_email_is_normalized() -> Result<(), anyhow::Error> {
    let server = TestIdentityServer::spawn().await?;
    let token = alice_session(&server).await?;

    let response = put_account(
        &server,
        &token,
        &json!({ "email": " Charlie@Example.com " }),
    )
    .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await?;
    assert_eq!(body["email"], TEST_EMAIL_CHARLIE);

    server.login(TEST_EMAIL_CHARLIE, TEST_PASSWORD).await?;

    Ok(())
}

#[tokio::test]
async fn test_update_to_another_accounts_email_rejected() -> Result<(), anyhow::Error> {
    let server = TestIdentityServer::spawn().await?;
    server.register(&TestAccountBuilder::bob().build()).await?;
    let token = alice_session(&server).await?;

    let response = put_account(&server, &token, &json!({ "email": "BOB@example.com" })).await?;

    assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
    assert_eq!(error_code(response).await?, "EMAIL_TAKEN");

    Ok(())
}

#[tokio::test]
async fn test_update_keeping_own_email_is_allowed() -> Result<(), anyhow::Error> {
    let server = TestIdentityServer::spawn().await?;
    let token = alice_session(&server).await?;

    let response = put_account(&server, &token, &json!({ "email": TEST_EMAIL_ALICE })).await?;

    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn test_update_requires_session() -> Result<(), anyhow::Error> {
    let server = TestIdentityServer::spawn().await?;

    let response = server
        .client()
        .put(format!("{}/api/v1/user", server.url()))
        .json(&json!({ "name": "Nobody" }))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn test_delete_removes_account() -> Result<(), anyhow::Error> {
    let server = TestIdentityServer::spawn().await?;
    let token = alice_session(&server).await?;

    let response = delete_account(&server, &token).await?;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Token still verifies, but the account behind it is gone
    let response = server
        .client()
        .get(format!("{}/api/v1/user/check", server.url()))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
    assert_eq!(error_code(response).await?, "ID_INVALID");

    let response = server
        .client()
        .post(format!("{}/api/v1/user/login", server.url()))
        .json(&json!({ "email": TEST_EMAIL_ALICE, "password": TEST_PASSWORD }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
    assert_eq!(error_code(response).await?, "EMAIL_NOT_FOUND");

    Ok(())
}

#[tokio::test]
async fn test_delete_twice_is_id_invalid() -> Result<(), anyhow::Error> {
    let server = TestIdentityServer::spawn().await?;
    let token = alice_session(&server).await?;

    assert_eq!(
        delete_account(&server, &token).await?.status(),
        StatusCode::NO_CONTENT
    );

    let response = delete_account(&server, &token).await?;
    assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
    assert_eq!(error_code(response).await?, "ID_INVALID");

    Ok(())
}

#[tokio::test]
async fn test_deleted_email_can_be_registered_again() -> Result<(), anyhow::Error> {
    let server = TestIdentityServer::spawn().await?;
    let token = alice_session(&server).await?;
    delete_account(&server, &token).await?;

    let account = server.register(&TestAccountBuilder::alice().build()).await?;
    assert_eq!(account["email"], TEST_EMAIL_ALICE);

    // Other accounts are unaffected by the delete
    server.register(&TestAccountBuilder::bob().build()).await?;
    server.login(TEST_EMAIL_BOB, TEST_PASSWORD).await?;

    Ok(())
}
