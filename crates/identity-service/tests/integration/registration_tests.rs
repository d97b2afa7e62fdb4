//! E2E tests for account registration.
//!
//! ## Test Naming
//!
//! Tests follow the convention: `test_<feature>_<scenario>_<expected_result>`

use identity_test_utils::{
    TestAccountBuilder, TestIdentityServer, TEST_EMAIL_ALICE, TEST_SHORT_PASSWORD,
};
use reqwest::StatusCode;
use serde_json::Value;

async fn post_register(
    server: &TestIdentityServer,
    body: &Value,
) -> Result<reqwest::Response, anyhow::Error> {
    Ok(server
        .client()
        .post(format!("{}/api/v1/user/register", server.url()))
        .json(body)
        .send()
        .await?)
}

async fn assert_rejected(
    response: reqwest::Response,
    code: &str,
    message: &str,
) -> Result<(), anyhow::Error> {
    assert_eq!(
        response.status(),
        StatusCode::NOT_ACCEPTABLE,
        "Domain errors render as 406"
    );
    let body: Value = response.json().await?;
    assert_eq!(body["error"]["code"], code);
    assert_eq!(body["error"]["message"], message);
    Ok(())
}

#[tokio::test]
async fn test_register_happy_path() -> Result<(), anyhow::Error> {
    let server = TestIdentityServer::spawn().await?;

    let response = post_register(&server, &TestAccountBuilder::alice().build()).await?;

    assert_eq!(response.status(), StatusCode::OK, "Registration should succeed");

    let body: Value = response.json().await?;
    assert!(body["id"].as_i64().unwrap_or(0) > 0, "Account should get an id");
    assert_eq!(body["email"], TEST_EMAIL_ALICE);
    assert!(body.get("password").is_none(), "Plaintext must never be returned");
    assert!(body.get("password_hash").is_none(), "Hash must never be returned");

    Ok(())
}

#[tokio::test]
async fn test_register_normalizes_email() -> Result<(), anyhow::Error> {
    let server = TestIdentityServer::spawn().await?;

    let body = server
        .register(
            &TestAccountBuilder::new()
                .with_email("  Mixed.Case@Example.COM ")
                .build(),
        )
        .await?;

    assert_eq!(body["email"], "mixed.case@example.com");

    Ok(())
}

#[tokio::test]
async fn test_register_short_password_rejected() -> Result<(), anyhow::Error> {
    let server = TestIdentityServer::spawn().await?;

    let response = post_register(
        &server,
        &TestAccountBuilder::alice()
            .with_password(TEST_SHORT_PASSWORD)
            .build(),
    )
    .await?;
    assert_rejected(
        response,
        "PASSWORD_TOO_SHORT",
        "Password must be at least 8 characters long",
    )
    .await?;

    // Nothing was stored, so the same email is still free
    server.register(&TestAccountBuilder::alice().build()).await?;

    Ok(())
}

#[tokio::test]
async fn test_register_missing_password_rejected() -> Result<(), anyhow::Error> {
    let server = TestIdentityServer::spawn().await?;

    let response =
        post_register(&server, &TestAccountBuilder::alice().without_password().build()).await?;
    assert_rejected(response, "PASSWORD_REQUIRED", "Password is required").await
}

#[tokio::test]
async fn test_register_invalid_email_rejected() -> Result<(), anyhow::Error> {
    let server = TestIdentityServer::spawn().await?;

    let response = post_register(
        &server,
        &TestAccountBuilder::new().with_email("not-an-email").build(),
    )
    .await?;
    assert_rejected(response, "EMAIL_INVALID", "Email address is not valid").await
}

#[tokio::test]
async fn test_register_blank_email_rejected() -> Result<(), anyhow::Error> {
    let server = TestIdentityServer::spawn().await?;

    let response =
        post_register(&server, &TestAccountBuilder::new().with_email("   ").build()).await?;
    assert_rejected(response, "EMAIL_REQUIRED", "Email address is required").await
}

#[tokio::test]
async fn test_register_duplicate_email_differing_by_case_rejected() -> Result<(), anyhow::Error> {
    let server = TestIdentityServer::spawn().await?;

    server.register(&TestAccountBuilder::alice().build()).await?;

    let response = post_register(
        &server,
        &TestAccountBuilder::new()
            .with_email(" ALICE@example.com")
            .build(),
    )
    .await?;
    assert_rejected(response, "EMAIL_TAKEN", "Email address is already taken").await
}

#[tokio::test]
async fn test_register_without_json_content_type_rejected() -> Result<(), anyhow::Error> {
    let server = TestIdentityServer::spawn().await?;

    let response = server
        .client()
        .post(format!("{}/api/v1/user/register", server.url()))
        .body(r#"{"email":"alice@example.com"}"#)
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

    Ok(())
}
