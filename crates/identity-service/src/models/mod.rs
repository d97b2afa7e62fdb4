use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Registered user account (maps to the accounts table).
///
/// `password` is transient plaintext and only ever set while a create or
/// update is in flight. It is never persisted or serialized. `password_hash`
/// is persisted but never serialized into responses.
#[derive(Debug, Clone, Default, Serialize, sqlx::FromRow)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub user_type: String,
    pub email: String,
    #[serde(skip)]
    #[sqlx(skip)]
    pub password: Option<SecretString>,
    #[serde(skip)]
    pub password_hash: String,
    pub password_reset: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Account {
    /// New, not yet persisted account carrying a plaintext password.
    pub fn new(
        name: impl Into<String>,
        user_type: impl Into<String>,
        email: impl Into<String>,
        password: SecretString,
    ) -> Self {
        Self {
            name: name.into(),
            user_type: user_type.into(),
            email: email.into(),
            password: Some(password),
            ..Self::default()
        }
    }

    /// Plaintext password, if a non-empty one is in flight.
    pub fn plaintext_password(&self) -> Option<&str> {
        self.password
            .as_ref()
            .map(|p| p.expose_secret())
            .filter(|p| !p.is_empty())
    }
}

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: Option<SecretString>,
    #[serde(default)]
    pub user_type: String,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: Option<SecretString>,
}

/// Partial update of the caller's own account. Absent fields are left as is.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateAccountRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<SecretString>,
    pub user_type: Option<String>,
}

/// Login response carrying the signed session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}
