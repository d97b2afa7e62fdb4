#![no_main]

use identity_service::services::account_validator::normalize_email;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(email) = std::str::from_utf8(data) {
        let once = normalize_email(email);
        let twice = normalize_email(&once);
        assert_eq!(once, twice, "normalization must be idempotent");
    }
});
