//! # Identity Test Utilities
//!
//! Shared test utilities for the identity service.
//!
//! This crate provides:
//! - Deterministic crypto fixtures (fixed Ed25519 keys, test pepper)
//! - Test data builders (TestAccountBuilder, TestSessionTokenBuilder)
//! - Server test harness (TestIdentityServer for E2E tests)
//! - Fixed test data (emails, passwords)
//! - Custom assertions (SessionTokenAssertions trait)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use identity_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() -> anyhow::Result<()> {
//!     let server = TestIdentityServer::spawn().await?;
//!
//!     let account = server.register(&TestAccountBuilder::alice().build()).await?;
//!     let token = server.login(TEST_EMAIL_ALICE, TEST_PASSWORD).await?;
//!
//!     token
//!         .assert_valid_jwt()
//!         .assert_for_account(account["id"].as_i64().unwrap());
//!     Ok(())
//! }
//! ```

pub mod account_builders;
pub mod assertions;
pub mod crypto_fixtures;
pub mod server_harness;
pub mod test_ids;
pub mod token_builders;

// Re-export commonly used items
pub use account_builders::*;
pub use assertions::*;
pub use crypto_fixtures::*;
pub use server_harness::*;
pub use test_ids::*;
pub use token_builders::*;
