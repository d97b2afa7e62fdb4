//! Credential persistence.
//!
//! [`CredentialStore`] is the capability the rest of the core depends on.
//! Implementations stay domain-agnostic: a missing row is
//! `ErrorKind::ResourceNotFound` and a unique-constraint violation is
//! `ErrorKind::Conflict`. Callers translate those into domain kinds.

pub mod accounts;
pub mod memory;

pub use accounts::PgCredentialStore;
pub use memory::MemoryCredentialStore;

use crate::errors::IdentityError;
use crate::models::Account;
use async_trait::async_trait;

#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn by_id(&self, id: i64) -> Result<Account, IdentityError>;

    async fn by_email(&self, email: &str) -> Result<Account, IdentityError>;

    /// Persist a new account and return it with its assigned id.
    async fn create(&self, account: Account) -> Result<Account, IdentityError>;

    /// Overwrite the persisted fields of an existing account.
    async fn update(&self, account: Account) -> Result<Account, IdentityError>;

    async fn delete(&self, id: i64) -> Result<(), IdentityError>;
}
