//! Session gate for protected routes.
//!
//! Extracts the Bearer token from the Authorization header, verifies it and
//! inserts the [`SessionClaims`] into request extensions. Handlers take
//! `SessionClaims` directly as an extractor.

use crate::crypto::SessionClaims;
use crate::errors::{ErrorKind, IdentityError};
use crate::services::TokenVerifier;
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::instrument;

#[derive(Clone)]
pub struct AuthState {
    pub verifier: Arc<TokenVerifier>,
}

/// Reject the request unless it carries a valid session token.
///
/// Missing header, wrong scheme, bad signature or issuer → 401
/// `TokenInvalid`; expired → 401 `TokenExpired`; verifier misconfiguration →
/// 500.
#[instrument(skip_all, name = "identity.middleware.session")]
pub async fn require_session(
    State(state): State<Arc<AuthState>>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, IdentityError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            tracing::debug!(target: "identity.middleware.session", "Missing Authorization header");
            IdentityError::new(ErrorKind::TokenInvalid, "Missing Authorization header")
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        tracing::debug!(target: "identity.middleware.session", "Invalid Authorization header format");
        IdentityError::new(ErrorKind::TokenInvalid, "Invalid Authorization header format")
    })?;

    let claims = state.verifier.verify(token)?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Claims attached by [`require_session`].
///
/// Extracting them on a route the gate does not cover is a wiring fault and
/// fails as an internal error.
#[async_trait]
impl<S> FromRequestParts<S> for SessionClaims
where
    S: Send + Sync,
{
    type Rejection = IdentityError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<SessionClaims>().cloned().ok_or_else(|| {
            IdentityError::new(
                ErrorKind::Internal,
                "Session claims missing: route is not behind the session gate",
            )
        })
    }
}
