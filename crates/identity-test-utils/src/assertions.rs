//! Custom test assertions for expressive tests
//!
//! Decodes session tokens without verifying them, so tests can check the
//! issued claims independently of the service's own verifier.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct JwtHeader {
    pub alg: String,
    pub typ: String,
}

#[derive(Debug, Deserialize)]
struct JwtClaims {
    pub user_email: String,
    pub user_id: i64,
    pub iss: String,
    #[serde(default)]
    pub exp: Option<i64>,
}

fn decode_part<T: for<'de> Deserialize<'de>>(token: &str, index: usize, what: &str) -> T {
    let part = token
        .split('.')
        .nth(index)
        .unwrap_or_else(|| panic!("JWT has no {} segment", what));
    let bytes = URL_SAFE_NO_PAD
        .decode(part)
        .unwrap_or_else(|e| panic!("Failed to base64 decode JWT {}: {:?}", what, e));
    serde_json::from_slice(&bytes)
        .unwrap_or_else(|e| panic!("Failed to parse JWT {} JSON: {:?}", what, e))
}

/// Custom assertions for session tokens
///
/// # Example
/// ```rust,ignore
/// token
///     .assert_valid_jwt()
///     .assert_for_account(7)
///     .assert_for_email("a@b.com")
///     .assert_no_expiry();
/// ```
pub trait SessionTokenAssertions {
    /// Three segments, EdDSA/JWT header, parseable session claims, `iss` = `user`
    fn assert_valid_jwt(&self) -> &Self;

    fn assert_for_account(&self, user_id: i64) -> &Self;

    fn assert_for_email(&self, email: &str) -> &Self;

    /// Assert that the token carries no `exp` claim
    fn assert_no_expiry(&self) -> &Self;

    /// Assert that the token expires within the specified seconds (±5s)
    fn assert_expires_in(&self, seconds: i64) -> &Self;
}

impl SessionTokenAssertions for String {
    fn assert_valid_jwt(&self) -> &Self {
        let parts = self.split('.').count();
        assert_eq!(
            parts, 3,
            "JWT must have 3 parts (header.payload.signature), got {}",
            parts
        );

        let header: JwtHeader = decode_part(self, 0, "header");
        assert_eq!(header.alg, "EdDSA", "Expected EdDSA algorithm");
        assert_eq!(header.typ, "JWT", "Expected JWT type");

        let claims: JwtClaims = decode_part(self, 1, "payload");
        assert_eq!(claims.iss, "user", "Expected issuer 'user'");

        self
    }

    fn assert_for_account(&self, user_id: i64) -> &Self {
        let claims: JwtClaims = decode_part(self, 1, "payload");
        assert_eq!(
            claims.user_id, user_id,
            "Expected user_id {}, got {}",
            user_id, claims.user_id
        );
        self
    }

    fn assert_for_email(&self, email: &str) -> &Self {
        let claims: JwtClaims = decode_part(self, 1, "payload");
        assert_eq!(
            claims.user_email, email,
            "Expected user_email '{}', got '{}'",
            email, claims.user_email
        );
        self
    }

    fn assert_no_expiry(&self) -> &Self {
        let claims: JwtClaims = decode_part(self, 1, "payload");
        assert!(claims.exp.is_none(), "Expected no exp claim, got {:?}", claims.exp);
        self
    }

    fn assert_expires_in(&self, seconds: i64) -> &Self {
        let claims: JwtClaims = decode_part(self, 1, "payload");
        let exp = claims.exp.expect("Expected an exp claim");
        let expires_in = exp - chrono::Utc::now().timestamp();

        assert!(
            (expires_in - seconds).abs() <= 5,
            "Expected token to expire in {} seconds, but expires in {} seconds",
            seconds,
            expires_in
        );
        self
    }
}
