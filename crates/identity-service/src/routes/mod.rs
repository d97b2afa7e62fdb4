//! HTTP routes for the identity service.
//!
//! Defines the Axum router.

use crate::handlers::{self, AppState};
use crate::middleware::{http_metrics_middleware, require_session, AuthState};
use crate::services::TokenVerifier;
use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Build the application routes.
///
/// - `/health`, `/metrics` - public, unversioned
/// - `POST /api/v1/user/register`, `POST /api/v1/user/login` - public
/// - `GET /api/v1/user/check`, `PUT /api/v1/user`, `DELETE /api/v1/user` -
///   require a session token
pub fn build_routes(
    state: Arc<AppState>,
    verifier: Arc<TokenVerifier>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let auth_state = Arc::new(AuthState { verifier });

    let public_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/v1/user/register", post(handlers::register))
        .route("/api/v1/user/login", post(handlers::login))
        .with_state(state.clone());

    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    let protected_routes = Router::new()
        .route("/api/v1/user/check", get(handlers::check))
        .route(
            "/api/v1/user",
            put(handlers::update_own).delete(handlers::delete_own),
        )
        .route_layer(middleware::from_fn_with_state(auth_state, require_session))
        .with_state(state);

    // Layer order (bottom-to-top execution):
    // 1. TraceLayer - Log request details (innermost)
    // 2. TimeoutLayer - Timeout the request
    // 3. http_metrics_middleware - Record ALL responses (outermost)
    public_routes
        .merge(metrics_routes)
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(middleware::from_fn(http_metrics_middleware))
}
