//! Deterministic cryptographic fixtures for testing
//!
//! Provides reproducible Ed25519 keypairs, PEM files and a fixed pepper.
//! All fixtures are deterministic based on seed values.

use crate::test_ids::TEST_PEPPER;
use identity_service::config::MIN_BCRYPT_COST;
use identity_service::crypto::{encode_private_key_pem, encode_public_key_pem, PasswordHasher};
use ring::signature::{Ed25519KeyPair, KeyPair};
use secrecy::SecretString;
use std::sync::Arc;
use thiserror::Error;

/// Test fixture error type
#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("Cryptographic operation failed: {0}")]
    Crypto(String),
}

/// Generate a deterministic Ed25519 signing key for testing.
///
/// The same seed always produces the same keypair.
///
/// # Returns
/// * `Ok((public_key_pem, private_key_pkcs8))` - Raw public key in PEM, private key in PKCS#8 DER
pub fn test_signing_key(seed: u8) -> Result<(String, Vec<u8>), FixtureError> {
    let seed_bytes = seed_bytes(seed);

    let key_pair = Ed25519KeyPair::from_seed_unchecked(&seed_bytes)
        .map_err(|e| FixtureError::Crypto(format!("Failed to generate test keypair: {:?}", e)))?;

    let public_key_pem = encode_public_key_pem(key_pair.public_key().as_ref());

    // ring doesn't export PKCS#8 for a seeded key pair, so build it
    let pkcs8_bytes = build_pkcs8_from_seed(&seed_bytes);

    Ok((public_key_pem, pkcs8_bytes))
}

/// PEM pair as the service reads it from disk: (signing_pem, verify_pem).
pub fn test_key_pems(seed: u8) -> Result<(String, String), FixtureError> {
    let (public_pem, pkcs8) = test_signing_key(seed)?;
    Ok((encode_private_key_pem(&pkcs8), public_pem))
}

/// Pepper used by every test hasher.
pub fn test_pepper() -> SecretString {
    SecretString::from(TEST_PEPPER)
}

/// Hasher with the test pepper and the cheapest accepted cost.
pub fn test_password_hasher() -> Arc<PasswordHasher> {
    Arc::new(PasswordHasher::new(test_pepper(), MIN_BCRYPT_COST))
}

fn seed_bytes(seed: u8) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    bytes[0] = seed;
    for (i, byte) in bytes.iter_mut().enumerate().skip(1) {
        *byte = seed.wrapping_mul(i as u8).wrapping_add(i as u8);
    }
    bytes
}

/// Build a PKCS#8 v1 document from an Ed25519 seed
///
/// This is a test-only utility. Production keys come from ring::rand::SystemRandom.
fn build_pkcs8_from_seed(seed: &[u8; 32]) -> Vec<u8> {
    // SEQUENCE { version INTEGER 0, AlgorithmIdentifier { 1.3.101.112 },
    //            privateKey OCTET STRING { OCTET STRING seed } }
    let mut pkcs8 = Vec::with_capacity(48);

    pkcs8.extend_from_slice(&[0x30, 0x2e]);
    pkcs8.extend_from_slice(&[0x02, 0x01, 0x00]);
    pkcs8.extend_from_slice(&[0x30, 0x05, 0x06, 0x03, 0x2b, 0x65, 0x70]);
    pkcs8.extend_from_slice(&[0x04, 0x22, 0x04, 0x20]);
    pkcs8.extend_from_slice(seed);

    pkcs8
}
