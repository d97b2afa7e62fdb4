//! Session token issuance and verification.
//!
//! Keys are loaded once at startup and are read-only afterwards. Both types
//! are cheap to share behind an `Arc`.

use crate::crypto::{self, SessionClaims, SESSION_ISSUER};
use crate::errors::IdentityError;
use crate::models::Account;
use crate::observability::{metrics, outcome_label};
use chrono::{TimeDelta, Utc};
use ring::signature::Ed25519KeyPair;
use secrecy::{ExposeSecret, SecretBox};
use std::time::Instant;
use tracing::instrument;

/// Signs session tokens with the service's Ed25519 private key.
pub struct TokenIssuer {
    private_key: SecretBox<Vec<u8>>,
    ttl_seconds: Option<i64>,
}

impl TokenIssuer {
    /// Issuer over raw PKCS#8 bytes. The key is only checked when signing.
    pub fn new(private_key_pkcs8: Vec<u8>, ttl_seconds: Option<i64>) -> Self {
        Self {
            private_key: SecretBox::new(Box::new(private_key_pkcs8)),
            ttl_seconds,
        }
    }

    /// Issuer from a PEM-armored PKCS#8 key, rejecting unusable keys up front.
    pub fn from_pem(pem: &str, ttl_seconds: Option<i64>) -> Result<Self, IdentityError> {
        let pkcs8 = crypto::decode_pem(pem)?;

        Ed25519KeyPair::from_pkcs8_maybe_unchecked(&pkcs8)
            .map_err(|e| IdentityError::crypto(format!("Invalid signing key: {}", e)))?;

        Ok(Self::new(pkcs8, ttl_seconds))
    }

    /// Sign a session token for `account`.
    ///
    /// `exp` is only set when a TTL is configured. A TTL whose expiry cannot
    /// be represented is a `Crypto` error.
    #[instrument(skip_all, fields(account_id = account.id))]
    pub fn issue(&self, account: &Account) -> Result<String, IdentityError> {
        let start = Instant::now();

        let result = self.expiry().and_then(|exp| {
            let claims = SessionClaims {
                user_email: account.email.clone(),
                user_id: account.id,
                iss: SESSION_ISSUER.to_string(),
                exp,
            };
            crypto::sign_session_jwt(&claims, self.private_key.expose_secret())
        });

        match &result {
            Ok(_) => metrics::record_token_issuance("success", start.elapsed()),
            Err(e) => {
                tracing::error!(target: "identity.tokens", error = %e, "Session token signing failed");
                metrics::record_token_issuance("error", start.elapsed());
            }
        }

        result
    }

    fn expiry(&self) -> Result<Option<i64>, IdentityError> {
        let Some(ttl_seconds) = self.ttl_seconds else {
            return Ok(None);
        };

        TimeDelta::try_seconds(ttl_seconds)
            .and_then(|ttl| Utc::now().checked_add_signed(ttl))
            .map(|exp| Some(exp.timestamp()))
            .ok_or_else(|| {
                IdentityError::crypto(format!("Session TTL out of range: {}s", ttl_seconds))
            })
    }
}

/// Verifies session tokens against the service's Ed25519 public key.
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    public_key: Vec<u8>,
}

impl TokenVerifier {
    /// Verifier over a raw 32-byte public key. Length is checked per call so a
    /// misconfigured key surfaces as an internal error.
    pub fn new(public_key: Vec<u8>) -> Self {
        Self { public_key }
    }

    pub fn from_pem(pem: &str) -> Result<Self, IdentityError> {
        Ok(Self::new(crypto::decode_public_key_pem(pem)?))
    }

    /// Verify `token` and return its claims.
    ///
    /// Expired → `TokenExpired`, any other rejection → `TokenInvalid`,
    /// verifier misconfiguration → `Crypto`.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, IdentityError> {
        let result = crypto::verify_session_jwt(token, &self.public_key);

        match &result {
            Ok(_) => metrics::record_token_validation("success", "ok"),
            Err(e) => metrics::record_token_validation("error", outcome_label(e.kind())),
        }

        result
    }
}
