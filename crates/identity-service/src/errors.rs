//! Error taxonomy for the identity core.
//!
//! Every failure carries an [`ErrorKind`]. The kind decides how the error is
//! rendered to a caller:
//!
//! - **public** kinds are domain errors safe to show. They render as
//!   406 Not Acceptable with a message derived mechanically from the kind's
//!   identifier (namespace prefix stripped, first word title-cased).
//! - **unauthorized** kinds come from the session gate and render as 401.
//! - **private** kinds never leave the process. They render as a generic 500
//!   and the detail is logged.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Namespace prefix shared by every error identifier.
const IDENTIFIER_PREFIX: &str = "identity: ";

/// Generic message sent for every private error.
const INTERNAL_MESSAGE: &str = "An internal error occurred";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    EmailNotFound,
    PasswordIncorrect,
    EmailRequired,
    EmailInvalid,
    EmailTaken,
    PasswordRequired,
    PasswordTooShort,
    IdInvalid,
    TokenExpired,
    TokenInvalid,
    /// Generic "no row matched" signal from a credential store.
    ResourceNotFound,
    /// Generic unique-constraint violation from a credential store.
    Conflict,
    Database,
    Crypto,
    Internal,
}

impl ErrorKind {
    /// Internal identifier. Public messages are derived from this string.
    pub fn identifier(&self) -> &'static str {
        match self {
            ErrorKind::EmailNotFound => "identity: email not found",
            ErrorKind::PasswordIncorrect => "identity: incorrect password provided",
            ErrorKind::EmailRequired => "identity: email address is required",
            ErrorKind::EmailInvalid => "identity: email address is not valid",
            ErrorKind::EmailTaken => "identity: email address is already taken",
            ErrorKind::PasswordRequired => "identity: password is required",
            ErrorKind::PasswordTooShort => {
                "identity: password must be at least 8 characters long"
            }
            ErrorKind::IdInvalid => "identity: ID provided was invalid",
            ErrorKind::TokenExpired => "identity: session token has expired",
            ErrorKind::TokenInvalid => "identity: session token is invalid",
            ErrorKind::ResourceNotFound => "identity: resource not found",
            ErrorKind::Conflict => "identity: unique constraint violated",
            ErrorKind::Database => "identity: database failure",
            ErrorKind::Crypto => "identity: cryptographic failure",
            ErrorKind::Internal => "identity: internal error",
        }
    }

    /// Machine-readable code placed in error response bodies.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::EmailNotFound => "EMAIL_NOT_FOUND",
            ErrorKind::PasswordIncorrect => "PASSWORD_INCORRECT",
            ErrorKind::EmailRequired => "EMAIL_REQUIRED",
            ErrorKind::EmailInvalid => "EMAIL_INVALID",
            ErrorKind::EmailTaken => "EMAIL_TAKEN",
            ErrorKind::PasswordRequired => "PASSWORD_REQUIRED",
            ErrorKind::PasswordTooShort => "PASSWORD_TOO_SHORT",
            ErrorKind::IdInvalid => "ID_INVALID",
            ErrorKind::TokenExpired => "TOKEN_EXPIRED",
            ErrorKind::TokenInvalid => "INVALID_TOKEN",
            ErrorKind::ResourceNotFound
            | ErrorKind::Conflict
            | ErrorKind::Database
            | ErrorKind::Crypto
            | ErrorKind::Internal => "INTERNAL_ERROR",
        }
    }

    /// Domain errors that may be rendered verbatim (after sanitization).
    pub fn is_public(&self) -> bool {
        matches!(
            self,
            ErrorKind::EmailNotFound
                | ErrorKind::PasswordIncorrect
                | ErrorKind::EmailRequired
                | ErrorKind::EmailInvalid
                | ErrorKind::EmailTaken
                | ErrorKind::PasswordRequired
                | ErrorKind::PasswordTooShort
                | ErrorKind::IdInvalid
        )
    }

    /// Session gate rejections caused by the client.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ErrorKind::TokenExpired | ErrorKind::TokenInvalid)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

/// Error returned by every fallible operation in the identity core.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct IdentityError {
    kind: ErrorKind,
    message: String,
}

impl IdentityError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Unexpected store failure. The detail is kept for logs only.
    pub fn database(detail: impl fmt::Display) -> Self {
        Self::new(ErrorKind::Database, format!("Database error: {}", detail))
    }

    /// Hashing, signing or key-configuration failure.
    pub fn crypto(detail: impl fmt::Display) -> Self {
        Self::new(ErrorKind::Crypto, format!("Cryptographic error: {}", detail))
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Sanitized message for public kinds, `None` for everything else.
    pub fn public_message(&self) -> Option<String> {
        self.kind
            .is_public()
            .then(|| sanitize_identifier(self.kind.identifier()))
    }
}

impl From<ErrorKind> for IdentityError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind, kind.identifier())
    }
}

/// Turn an internal identifier into a human-readable message.
///
/// `identity: email address is already taken` becomes
/// `Email address is already taken`.
pub fn sanitize_identifier(identifier: &str) -> String {
    let stripped = identifier
        .strip_prefix(IDENTIFIER_PREFIX)
        .unwrap_or(identifier);

    let (first, rest) = match stripped.split_once(' ') {
        Some((first, rest)) => (first, Some(rest)),
        None => (stripped, None),
    };

    let mut chars = first.chars();
    let mut message: String = match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };

    if let Some(rest) = rest {
        message.push(' ');
        message.push_str(rest);
    }

    message
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl IntoResponse for IdentityError {
    fn into_response(self) -> Response {
        let kind = self.kind;

        let (status, message) = if let Some(message) = self.public_message() {
            (StatusCode::NOT_ACCEPTABLE, message)
        } else if kind.is_unauthorized() {
            (
                StatusCode::UNAUTHORIZED,
                sanitize_identifier(kind.identifier()),
            )
        } else {
            tracing::error!(target: "identity.errors", kind = ?kind, error = %self.message, "Request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_MESSAGE.to_string(),
            )
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: kind.code().to_string(),
                message,
            },
        };

        let mut response = (status, Json(body)).into_response();

        if kind.is_unauthorized() {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static("Bearer"),
            );
        }

        response
    }
}
