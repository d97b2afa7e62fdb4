#![no_main]

use identity_service::crypto::verify_session_jwt;
use libfuzzer_sys::fuzz_target;
use ring::rand::SystemRandom;
use ring::signature::{Ed25519KeyPair, KeyPair};
use std::sync::OnceLock;

/// Public key of a throwaway key pair, generated once per fuzz run.
fn public_key() -> &'static [u8] {
    static KEY: OnceLock<Vec<u8>> = OnceLock::new();
    KEY.get_or_init(|| {
        let rng = SystemRandom::new();
        let pkcs8 = Ed25519KeyPair::generate_pkcs8(&rng).expect("key generation");
        let pair = Ed25519KeyPair::from_pkcs8(pkcs8.as_ref()).expect("generated key parses");
        pair.public_key().as_ref().to_vec()
    })
}

fuzz_target!(|data: &[u8]| {
    // Verification must reject arbitrary input without panicking
    if let Ok(token) = std::str::from_utf8(data) {
        let _ = verify_session_jwt(token, public_key());
    }

    // Wrong-length keys must surface as errors too
    if let Ok(token) = std::str::from_utf8(data) {
        let _ = verify_session_jwt(token, &data[..data.len().min(16)]);
    }
});
