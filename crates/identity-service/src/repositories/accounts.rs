//! Postgres-backed credential store.
//!
//! Maps the `accounts` table onto [`Account`]. Errors are reported with the
//! generic store kinds; see the module docs in [`super`].

use super::CredentialStore;
use crate::errors::{ErrorKind, IdentityError};
use crate::models::Account;
use async_trait::async_trait;
use sqlx::PgPool;

const ACCOUNT_COLUMNS: &str = "id, name, user_type, email, password_hash, password_reset, \
                               created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Translate a sqlx failure into a store error.
///
/// `RowNotFound` becomes `ResourceNotFound` and unique violations become
/// `Conflict`. Everything else is a private database error.
fn map_sqlx_error(e: sqlx::Error, context: &str) -> IdentityError {
    match &e {
        sqlx::Error::RowNotFound => {
            IdentityError::new(ErrorKind::ResourceNotFound, format!("{}: no rows", context))
        }
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => IdentityError::new(
            ErrorKind::Conflict,
            format!(
                "{}: unique constraint {} violated",
                context,
                db_err.constraint().unwrap_or("unknown")
            ),
        ),
        _ => IdentityError::database(format!("{}: {}", context, e)),
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn by_id(&self, id: i64) -> Result<Account, IdentityError> {
        sqlx::query_as::<_, Account>(&format!(
            "SELECT {} FROM accounts WHERE id = $1",
            ACCOUNT_COLUMNS
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to fetch account by id"))
    }

    async fn by_email(&self, email: &str) -> Result<Account, IdentityError> {
        sqlx::query_as::<_, Account>(&format!(
            "SELECT {} FROM accounts WHERE email = $1",
            ACCOUNT_COLUMNS
        ))
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to fetch account by email"))
    }

    async fn create(&self, account: Account) -> Result<Account, IdentityError> {
        sqlx::query_as::<_, Account>(&format!(
            r#"
            INSERT INTO accounts (name, user_type, email, password_hash, password_reset)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            ACCOUNT_COLUMNS
        ))
        .bind(&account.name)
        .bind(&account.user_type)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(account.password_reset)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to create account"))
    }

    async fn update(&self, account: Account) -> Result<Account, IdentityError> {
        sqlx::query_as::<_, Account>(&format!(
            r#"
            UPDATE accounts
            SET name = $2, user_type = $3, email = $4, password_hash = $5,
                password_reset = $6, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            ACCOUNT_COLUMNS
        ))
        .bind(account.id)
        .bind(&account.name)
        .bind(&account.user_type)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(account.password_reset)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to update account"))
    }

    async fn delete(&self, id: i64) -> Result<(), IdentityError> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, "Failed to delete account"))?;

        if result.rows_affected() == 0 {
            return Err(IdentityError::new(
                ErrorKind::ResourceNotFound,
                format!("Failed to delete account: no account with id {}", id),
            ));
        }

        Ok(())
    }
}
