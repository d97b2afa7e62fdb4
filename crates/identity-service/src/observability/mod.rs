//! Observability for the identity service.
//!
//! # Privacy by Default
//!
//! Instrumentation uses `#[instrument(skip_all)]` and explicit safe fields.
//! Fields are categorized as:
//! - **SAFE**: may be logged in plaintext (ids, step names, outcomes)
//! - **HASHED**: SHA-256 hashed for correlation (email addresses)
//! - **NEVER**: must never appear in logs (passwords, hashes, tokens, keys, pepper)

pub mod metrics;

use crate::errors::ErrorKind;
use sha2::{Digest, Sha256};

/// Hash a field value for correlation in logs (SHA-256, first 8 hex chars)
///
/// This is a one-way hash for correlating log lines about the same email,
/// not a secure commitment.
pub fn hash_for_correlation(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    let result = hasher.finalize();
    hex::encode(&result[..4])
}

/// Bounded `outcome` label for an error kind.
pub fn outcome_label(kind: ErrorKind) -> &'static str {
    kind.code()
}
