//! Fixed test data for deterministic tests
//!
//! Emails are already normalized so assertions can compare them directly.

// Accounts
pub const TEST_EMAIL_ALICE: &str = "alice@example.com";
pub const TEST_EMAIL_BOB: &str = "bob@example.com";
pub const TEST_EMAIL_CHARLIE: &str = "charlie@example.com";

pub const TEST_NAME_ALICE: &str = "Alice Liddell";
pub const TEST_NAME_BOB: &str = "Bob Builder";

/// Password accepted by every validation step.
pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// One byte under the minimum length.
pub const TEST_SHORT_PASSWORD: &str = "seven77";

pub const TEST_USER_TYPE: &str = "student";

// Pepper shared by fixtures and the harness
pub const TEST_PEPPER: &str = "test-pepper-not-for-production";

// Key seeds
pub const TEST_KEY_SEED_SERVER: u8 = 1;
pub const TEST_KEY_SEED_OTHER: u8 = 2;
