//! Test server harness for E2E testing
//!
//! Provides TestIdentityServer for spawning real identity server instances in
//! tests, backed by the in-memory store or a Postgres pool.

use crate::crypto_fixtures::{test_key_pems, test_password_hasher};
use crate::test_ids::TEST_KEY_SEED_SERVER;
use identity_service::handlers::AppState;
use identity_service::observability::metrics::init_metrics_recorder;
use identity_service::repositories::{CredentialStore, MemoryCredentialStore, PgCredentialStore};
use identity_service::routes;
use identity_service::services::{AccountService, TokenIssuer, TokenVerifier};
use serde_json::{json, Value};
use sqlx::PgPool;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Test harness for spawning the identity server in E2E tests
///
/// # Example
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_login_flow() -> anyhow::Result<()> {
///     let server = TestIdentityServer::spawn().await?;
///
///     let response = server
///         .client()
///         .post(format!("{}/api/v1/user/login", server.url()))
///         .json(&login_request)
///         .send()
///         .await?;
///
///     assert_eq!(response.status(), 200);
///     Ok(())
/// }
/// ```
pub struct TestIdentityServer {
    addr: SocketAddr,
    client: reqwest::Client,
    _handle: JoinHandle<()>,
}

impl TestIdentityServer {
    /// Spawn a server over a fresh in-memory store, issuing tokens without expiry.
    pub async fn spawn() -> Result<Self, anyhow::Error> {
        Self::spawn_with(Arc::new(MemoryCredentialStore::new()), None).await
    }

    /// Spawn a server over a fresh in-memory store with a session TTL.
    pub async fn spawn_with_ttl(ttl_seconds: i64) -> Result<Self, anyhow::Error> {
        Self::spawn_with(Arc::new(MemoryCredentialStore::new()), Some(ttl_seconds)).await
    }

    /// Spawn a server over a Postgres pool (typically from `#[sqlx::test]`).
    pub async fn spawn_with_pool(pool: PgPool) -> Result<Self, anyhow::Error> {
        Self::spawn_with(Arc::new(PgCredentialStore::new(pool)), None).await
    }

    /// Spawn a server over any credential store.
    ///
    /// The server will:
    /// - Bind to a random available port (127.0.0.1:0)
    /// - Load the deterministic server key pair from PEM
    /// - Hash with the test pepper at the minimum bcrypt cost
    pub async fn spawn_with(
        store: Arc<dyn CredentialStore>,
        ttl_seconds: Option<i64>,
    ) -> Result<Self, anyhow::Error> {
        let (signing_pem, verify_pem) = test_key_pems(TEST_KEY_SEED_SERVER)
            .map_err(|e| anyhow::anyhow!("Failed to build test keys: {}", e))?;

        let issuer = TokenIssuer::from_pem(&signing_pem, ttl_seconds)
            .map_err(|e| anyhow::anyhow!("Failed to load signing key: {}", e))?;
        let verifier = TokenVerifier::from_pem(&verify_pem)
            .map_err(|e| anyhow::anyhow!("Failed to load verification key: {}", e))?;

        let state = Arc::new(AppState {
            accounts: AccountService::new(store, test_password_hasher()),
            issuer: Arc::new(issuer),
        });

        // The global recorder can only be installed once per test process;
        // later servers get a standalone recorder.
        let metrics_handle = match init_metrics_recorder() {
            Ok(handle) => handle,
            Err(_) => {
                use metrics_exporter_prometheus::PrometheusBuilder;
                PrometheusBuilder::new().build_recorder().handle()
            }
        };

        let app = routes::build_routes(state, Arc::new(verifier), metrics_handle);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            client: reqwest::Client::new(),
            _handle: handle,
        })
    }

    /// Get the base URL of the test server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the socket address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Register an account and return the response JSON. Fails unless 200.
    pub async fn register(&self, body: &Value) -> Result<Value, anyhow::Error> {
        let response = self
            .client
            .post(format!("{}/api/v1/user/register", self.url()))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("register returned {}: {}", status, response.text().await?);
        }
        Ok(response.json().await?)
    }

    /// Log in and return the session token. Fails unless 200.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, anyhow::Error> {
        let response = self
            .client
            .post(format!("{}/api/v1/user/login", self.url()))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("login returned {}: {}", status, response.text().await?);
        }

        let body: Value = response.json().await?;
        body["token"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("login response has no token: {}", body))
    }
}

impl Drop for TestIdentityServer {
    fn drop(&mut self) {
        self._handle.abort();
    }
}
