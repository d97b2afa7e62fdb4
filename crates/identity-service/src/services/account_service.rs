//! Account service: password authentication plus validated account CRUD.
//!
//! Everything goes through the [`AccountValidator`], so the routing layer
//! only depends on this one type.

use crate::crypto::PasswordHasher;
use crate::errors::{ErrorKind, IdentityError};
use crate::models::Account;
use crate::observability::{hash_for_correlation, metrics, outcome_label};
use crate::repositories::CredentialStore;
use crate::services::account_validator::AccountValidator;
use std::sync::Arc;
use std::time::Instant;
use tracing::instrument;

#[derive(Clone)]
pub struct AccountService {
    accounts: Arc<AccountValidator>,
    hasher: Arc<PasswordHasher>,
}

impl AccountService {
    /// Build the service over a raw store. The store is wrapped in the
    /// validation chain here.
    pub fn new(store: Arc<dyn CredentialStore>, hasher: Arc<PasswordHasher>) -> Self {
        Self {
            accounts: Arc::new(AccountValidator::new(store, hasher.clone())),
            hasher,
        }
    }

    /// Check an email/password pair.
    ///
    /// Unknown email is `EmailNotFound`, a wrong password is
    /// `PasswordIncorrect`. A stored hash bcrypt cannot parse is a private
    /// `Crypto` error, never a mismatch. On success the returned account
    /// carries its hash and no plaintext.
    #[instrument(skip_all, fields(email_hash = %hash_for_correlation(email)))]
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Account, IdentityError> {
        let start = Instant::now();
        let result = self.check_credentials(email, password).await;

        match &result {
            Ok(account) => {
                tracing::info!(target: "identity.auth", account_id = account.id, "Authentication succeeded");
                metrics::record_authentication("success", "ok", start.elapsed());
            }
            Err(e) => {
                tracing::info!(target: "identity.auth", kind = ?e.kind(), "Authentication failed");
                metrics::record_authentication("error", outcome_label(e.kind()), start.elapsed());
            }
        }

        result
    }

    async fn check_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Account, IdentityError> {
        let account = self.accounts.by_email(email).await?;

        if !self.hasher.verify(password, &account.password_hash)? {
            return Err(ErrorKind::PasswordIncorrect.into());
        }

        Ok(account)
    }

    pub async fn by_id(&self, id: i64) -> Result<Account, IdentityError> {
        self.accounts.by_id(id).await
    }

    pub async fn by_email(&self, email: &str) -> Result<Account, IdentityError> {
        self.accounts.by_email(email).await
    }

    #[instrument(skip_all)]
    pub async fn create(&self, account: Account) -> Result<Account, IdentityError> {
        let created = self.accounts.create(account).await?;
        tracing::info!(target: "identity.accounts", account_id = created.id, "Account created");
        Ok(created)
    }

    #[instrument(skip_all, fields(account_id = account.id))]
    pub async fn update(&self, account: Account) -> Result<Account, IdentityError> {
        self.accounts.update(account).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), IdentityError> {
        self.accounts.delete(id).await?;
        tracing::info!(target: "identity.accounts", account_id = id, "Account deleted");
        Ok(())
    }
}
