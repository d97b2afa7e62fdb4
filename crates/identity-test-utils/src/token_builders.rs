//! Builders for hand-crafted session tokens
//!
//! Lets tests forge tokens the service would never issue itself: expired,
//! wrong issuer, signed by another key.

use crate::crypto_fixtures::test_signing_key;
use chrono::{Duration, Utc};
use identity_service::crypto::{sign_session_jwt, SessionClaims, SESSION_ISSUER};

/// Builder for signed session tokens
///
/// # Example
/// ```rust,ignore
/// let token = TestSessionTokenBuilder::new()
///     .for_account(7, "a@b.com")
///     .expires_in(-60)
///     .sign_with_seed(TEST_KEY_SEED_SERVER);
/// ```
pub struct TestSessionTokenBuilder {
    claims: SessionClaims,
}

impl TestSessionTokenBuilder {
    /// Defaults: account 1, issuer `user`, no expiry.
    pub fn new() -> Self {
        Self {
            claims: SessionClaims {
                user_email: "test@example.com".to_string(),
                user_id: 1,
                iss: SESSION_ISSUER.to_string(),
                exp: None,
            },
        }
    }

    pub fn for_account(mut self, user_id: i64, email: &str) -> Self {
        self.claims.user_id = user_id;
        self.claims.user_email = email.to_string();
        self
    }

    pub fn with_issuer(mut self, issuer: &str) -> Self {
        self.claims.iss = issuer.to_string();
        self
    }

    /// Set `exp` relative to now. Negative values produce an expired token.
    pub fn expires_in(mut self, seconds: i64) -> Self {
        self.claims.exp = Some((Utc::now() + Duration::seconds(seconds)).timestamp());
        self
    }

    pub fn claims(&self) -> &SessionClaims {
        &self.claims
    }

    /// Sign with the deterministic key for `seed`.
    ///
    /// # Panics
    ///
    /// Panics if the fixture key cannot be built or signing fails.
    pub fn sign_with_seed(self, seed: u8) -> String {
        let (_, pkcs8) = test_signing_key(seed).expect("fixture key should build");
        sign_session_jwt(&self.claims, &pkcs8).expect("fixture signing should succeed")
    }
}

impl Default for TestSessionTokenBuilder {
    fn default() -> Self {
        Self::new()
    }
}
