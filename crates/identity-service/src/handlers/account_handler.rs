use crate::crypto::SessionClaims;
use crate::errors::IdentityError;
use crate::models::{Account, LoginRequest, RegisterRequest, TokenResponse, UpdateAccountRequest};
use crate::services::{AccountService, TokenIssuer};
use axum::{extract::State, http::StatusCode, Json};
use secrecy::ExposeSecret;
use std::sync::Arc;
use tracing::instrument;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountService,
    pub issuer: Arc<TokenIssuer>,
}

/// Handle account registration
///
/// POST /api/v1/user/register
#[instrument(skip_all, name = "identity.handler.register")]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<Account>, IdentityError> {
    let account = Account {
        name: payload.name,
        user_type: payload.user_type,
        email: payload.email,
        password: payload.password,
        ..Account::default()
    };

    let created = state.accounts.create(account).await?;

    Ok(Json(created))
}

/// Handle login
///
/// POST /api/v1/user/login
#[instrument(skip_all, name = "identity.handler.login")]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, IdentityError> {
    let password = payload
        .password
        .as_ref()
        .map(|p| p.expose_secret())
        .unwrap_or_default();

    let account = state.accounts.authenticate(&payload.email, password).await?;
    let token = state.issuer.issue(&account)?;

    Ok(Json(TokenResponse { token }))
}

/// Return the caller's own account
///
/// GET /api/v1/user/check
#[instrument(skip_all, name = "identity.handler.check", fields(account_id = claims.user_id))]
pub async fn check(
    State(state): State<Arc<AppState>>,
    claims: SessionClaims,
) -> Result<Json<Account>, IdentityError> {
    let account = state.accounts.by_id(claims.user_id).await?;
    Ok(Json(account))
}

/// Apply a partial update to the caller's own account
///
/// PUT /api/v1/user
#[instrument(skip_all, name = "identity.handler.update", fields(account_id = claims.user_id))]
pub async fn update_own(
    State(state): State<Arc<AppState>>,
    claims: SessionClaims,
    Json(payload): Json<UpdateAccountRequest>,
) -> Result<Json<Account>, IdentityError> {
    let mut account = state.accounts.by_id(claims.user_id).await?;

    if let Some(name) = payload.name {
        account.name = name;
    }
    if let Some(email) = payload.email {
        account.email = email;
    }
    if let Some(user_type) = payload.user_type {
        account.user_type = user_type;
    }
    if payload.password.is_some() {
        account.password = payload.password;
    }

    let updated = state.accounts.update(account).await?;

    Ok(Json(updated))
}

/// Delete the caller's own account
///
/// DELETE /api/v1/user
#[instrument(skip_all, name = "identity.handler.delete", fields(account_id = claims.user_id))]
pub async fn delete_own(
    State(state): State<Arc<AppState>>,
    claims: SessionClaims,
) -> Result<StatusCode, IdentityError> {
    state.accounts.delete(claims.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
