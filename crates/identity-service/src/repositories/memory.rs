//! In-process credential store.
//!
//! Used when no database is configured and by the test harness. Holds the
//! same uniqueness guarantee on email as the Postgres table.

use super::CredentialStore;
use crate::errors::{ErrorKind, IdentityError};
use crate::models::Account;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Inner {
    accounts: HashMap<i64, Account>,
    next_id: i64,
}

#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    inner: RwLock<Inner>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.accounts.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn not_found(detail: String) -> IdentityError {
    IdentityError::new(ErrorKind::ResourceNotFound, detail)
}

fn email_in_use(inner: &Inner, email: &str, except_id: i64) -> bool {
    inner
        .accounts
        .values()
        .any(|a| a.email == email && a.id != except_id)
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn by_id(&self, id: i64) -> Result<Account, IdentityError> {
        self.inner
            .read()
            .await
            .accounts
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found(format!("No account with id {}", id)))
    }

    async fn by_email(&self, email: &str) -> Result<Account, IdentityError> {
        self.inner
            .read()
            .await
            .accounts
            .values()
            .find(|a| a.email == email)
            .cloned()
            .ok_or_else(|| not_found("No account with that email".to_string()))
    }

    async fn create(&self, mut account: Account) -> Result<Account, IdentityError> {
        let mut inner = self.inner.write().await;

        if email_in_use(&inner, &account.email, 0) {
            return Err(IdentityError::new(
                ErrorKind::Conflict,
                "accounts.email unique constraint violated",
            ));
        }

        inner.next_id += 1;
        let now = Utc::now();
        account.id = inner.next_id;
        account.password = None;
        account.created_at = Some(now);
        account.updated_at = Some(now);

        inner.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn update(&self, mut account: Account) -> Result<Account, IdentityError> {
        let mut inner = self.inner.write().await;

        let created_at = match inner.accounts.get(&account.id) {
            Some(existing) => existing.created_at,
            None => return Err(not_found(format!("No account with id {}", account.id))),
        };

        if email_in_use(&inner, &account.email, account.id) {
            return Err(IdentityError::new(
                ErrorKind::Conflict,
                "accounts.email unique constraint violated",
            ));
        }

        account.password = None;
        account.created_at = created_at;
        account.updated_at = Some(Utc::now());

        inner.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn delete(&self, id: i64) -> Result<(), IdentityError> {
        self.inner
            .write()
            .await
            .accounts
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found(format!("No account with id {}", id)))
    }
}
