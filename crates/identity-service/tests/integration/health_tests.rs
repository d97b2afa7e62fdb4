//! Integration tests for the operational endpoints.

use identity_test_utils::{TestAccountBuilder, TestIdentityServer};
use reqwest::StatusCode;

#[tokio::test]
async fn test_health_endpoint_returns_ok() -> Result<(), anyhow::Error> {
    let server = TestIdentityServer::spawn().await?;

    let response = server
        .client()
        .get(format!("{}/health", server.url()))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await?, "OK");

    Ok(())
}

#[tokio::test]
async fn test_metrics_endpoint_is_public() -> Result<(), anyhow::Error> {
    let server = TestIdentityServer::spawn().await?;

    // Generate some traffic first
    server.register(&TestAccountBuilder::new().build()).await?;

    let response = server
        .client()
        .get(format!("{}/metrics", server.url()))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);

    // Metrics never carry personal data
    let body = response.text().await?;
    assert!(!body.contains("test@example.com"));

    Ok(())
}
