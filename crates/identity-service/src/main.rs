use identity_service::config::Config;
use identity_service::crypto::PasswordHasher;
use identity_service::handlers::AppState;
use identity_service::observability::metrics::init_metrics_recorder;
use identity_service::repositories::{CredentialStore, MemoryCredentialStore, PgCredentialStore};
use identity_service::routes;
use identity_service::services::{AccountService, TokenIssuer, TokenVerifier};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "identity_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Identity Service");

    // Load configuration
    let config = Config::from_env().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!(
        bcrypt_cost = config.bcrypt_cost,
        session_ttl_seconds = ?config.session_ttl_seconds,
        "Configuration loaded successfully"
    );

    // Metrics recorder must exist before anything records
    let metrics_handle = init_metrics_recorder().map_err(|e| {
        error!("Failed to initialize metrics recorder: {}", e);
        e
    })?;

    // Load session keys
    let signing_pem = tokio::fs::read_to_string(&config.signing_key_path)
        .await
        .map_err(|e| {
            error!(path = %config.signing_key_path.display(), "Failed to read signing key: {}", e);
            e
        })?;
    let issuer = TokenIssuer::from_pem(&signing_pem, config.session_ttl_seconds).map_err(|e| {
        error!("Invalid signing key: {}", e);
        e
    })?;

    let verify_pem = tokio::fs::read_to_string(&config.verify_key_path)
        .await
        .map_err(|e| {
            error!(path = %config.verify_key_path.display(), "Failed to read verification key: {}", e);
            e
        })?;
    let verifier = TokenVerifier::from_pem(&verify_pem).map_err(|e| {
        error!("Invalid verification key: {}", e);
        e
    })?;

    info!("Session keys loaded");

    // Credential store
    let store: Arc<dyn CredentialStore> = match &config.database_url {
        Some(database_url) => {
            info!("Connecting to database...");
            let db_pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(5)
                .connect(database_url)
                .await
                .map_err(|e| {
                    error!("Failed to connect to database: {}", e);
                    e
                })?;

            sqlx::migrate!("../../migrations")
                .run(&db_pool)
                .await
                .map_err(|e| {
                    error!("Failed to run migrations: {}", e);
                    e
                })?;

            info!("Database connection established");
            Arc::new(PgCredentialStore::new(db_pool))
        }
        None => {
            warn!("DATABASE_URL not set, accounts are kept in memory and lost on restart");
            Arc::new(MemoryCredentialStore::new())
        }
    };

    let hasher = Arc::new(PasswordHasher::new(
        config.pepper.clone(),
        config.bcrypt_cost,
    ));

    let state = Arc::new(AppState {
        accounts: AccountService::new(store, hasher),
        issuer: Arc::new(issuer),
    });

    let app = routes::build_routes(state, Arc::new(verifier), metrics_handle);

    // Parse bind address
    let addr: SocketAddr = config.bind_address.parse().map_err(|e| {
        error!("Invalid bind address: {}", e);
        e
    })?;

    info!("Identity Service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Identity Service shutdown complete");

    Ok(())
}

/// Resolves on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received SIGINT, starting graceful shutdown..."),
            Err(e) => error!("Failed to listen for SIGINT: {}", e),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received SIGTERM, starting graceful shutdown...");
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
