//! Validation chain in front of a credential store.
//!
//! [`AccountValidator`] wraps another [`CredentialStore`] and runs a fixed,
//! ordered list of [`ValidationStep`]s before delegating. Steps are fail-fast:
//! the first failure is returned unchanged and the in-flight account is
//! dropped without reaching the store.
//!
//! The wrapped store reports generic `ResourceNotFound` / `Conflict` kinds.
//! This layer turns them into the public domain kinds.

use crate::crypto::PasswordHasher;
use crate::errors::{ErrorKind, IdentityError};
use crate::models::Account;
use crate::observability::{hash_for_correlation, metrics};
use crate::repositories::CredentialStore;
use async_trait::async_trait;
use regex::Regex;
use std::fmt;
use std::sync::{Arc, LazyLock};

/// Minimum plaintext password length, in bytes.
pub const MIN_PASSWORD_LENGTH: usize = 8;

#[allow(clippy::expect_used)] // constant pattern
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9._%+\-]+@[a-z0-9.\-]+\.[a-z]{2,16}$").expect("email pattern compiles")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationStep {
    PasswordRequired,
    PasswordMinLength,
    HashPassword,
    PasswordHashRequired,
    NormalizeEmail,
    RequireEmail,
    EmailFormat,
    EmailAvailable,
    IdGreaterThanZero,
}

impl ValidationStep {
    /// Label used in logs and the `step` metric label.
    pub fn name(&self) -> &'static str {
        match self {
            ValidationStep::PasswordRequired => "password_required",
            ValidationStep::PasswordMinLength => "password_min_length",
            ValidationStep::HashPassword => "hash_password",
            ValidationStep::PasswordHashRequired => "password_hash_required",
            ValidationStep::NormalizeEmail => "normalize_email",
            ValidationStep::RequireEmail => "require_email",
            ValidationStep::EmailFormat => "email_format",
            ValidationStep::EmailAvailable => "email_available",
            ValidationStep::IdGreaterThanZero => "id_greater_than_zero",
        }
    }
}

impl fmt::Display for ValidationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// The orderings below are load-bearing: hashing must run before the
// hash-required check, and normalization before format and availability.

pub const CREATE_STEPS: &[ValidationStep] = &[
    ValidationStep::PasswordRequired,
    ValidationStep::PasswordMinLength,
    ValidationStep::HashPassword,
    ValidationStep::PasswordHashRequired,
    ValidationStep::NormalizeEmail,
    ValidationStep::RequireEmail,
    ValidationStep::EmailFormat,
    ValidationStep::EmailAvailable,
];

pub const UPDATE_STEPS: &[ValidationStep] = &[
    ValidationStep::PasswordMinLength,
    ValidationStep::HashPassword,
    ValidationStep::PasswordHashRequired,
    ValidationStep::NormalizeEmail,
    ValidationStep::RequireEmail,
    ValidationStep::EmailFormat,
    ValidationStep::EmailAvailable,
];

pub const LOOKUP_STEPS: &[ValidationStep] =
    &[ValidationStep::NormalizeEmail, ValidationStep::EmailFormat];

pub const DELETE_STEPS: &[ValidationStep] = &[ValidationStep::IdGreaterThanZero];

/// Lowercase then trim. Idempotent.
pub fn normalize_email(email: &str) -> String {
    email.to_lowercase().trim().to_string()
}

/// Replace the store's generic kinds with domain kinds.
fn translate(err: IdentityError, not_found: ErrorKind) -> IdentityError {
    match err.kind() {
        ErrorKind::ResourceNotFound => not_found.into(),
        ErrorKind::Conflict => ErrorKind::EmailTaken.into(),
        _ => err,
    }
}

pub struct AccountValidator {
    inner: Arc<dyn CredentialStore>,
    hasher: Arc<PasswordHasher>,
}

impl AccountValidator {
    pub fn new(inner: Arc<dyn CredentialStore>, hasher: Arc<PasswordHasher>) -> Self {
        Self { inner, hasher }
    }

    /// Run `steps` in order against `account`, stopping at the first failure.
    pub async fn run(
        &self,
        steps: &[ValidationStep],
        mut account: Account,
    ) -> Result<Account, IdentityError> {
        for &step in steps {
            account = match self.apply(step, account).await {
                Ok(account) => account,
                Err(e) => {
                    tracing::debug!(
                        target: "identity.validation",
                        step = step.name(),
                        kind = ?e.kind(),
                        "Validation step rejected account"
                    );
                    metrics::record_validation_failure(step.name());
                    return Err(e);
                }
            };
        }

        Ok(account)
    }

    async fn apply(
        &self,
        step: ValidationStep,
        mut account: Account,
    ) -> Result<Account, IdentityError> {
        match step {
            ValidationStep::PasswordRequired => {
                if account.plaintext_password().is_none() {
                    return Err(ErrorKind::PasswordRequired.into());
                }
            }
            ValidationStep::PasswordMinLength => {
                if let Some(password) = account.plaintext_password() {
                    if password.len() < MIN_PASSWORD_LENGTH {
                        return Err(ErrorKind::PasswordTooShort.into());
                    }
                }
            }
            ValidationStep::HashPassword => {
                if let Some(password) = account.plaintext_password() {
                    let hash = self.hasher.hash(password)?;
                    account.password_hash = hash;
                    account.password = None;
                }
            }
            ValidationStep::PasswordHashRequired => {
                if account.password_hash.is_empty() {
                    return Err(ErrorKind::PasswordRequired.into());
                }
            }
            ValidationStep::NormalizeEmail => {
                account.email = normalize_email(&account.email);
            }
            ValidationStep::RequireEmail => {
                if account.email.is_empty() {
                    return Err(ErrorKind::EmailRequired.into());
                }
            }
            ValidationStep::EmailFormat => {
                if !account.email.is_empty() && !EMAIL_PATTERN.is_match(&account.email) {
                    return Err(ErrorKind::EmailInvalid.into());
                }
            }
            ValidationStep::EmailAvailable => {
                // Email is already normalized and format-checked at this point.
                match self.inner.by_email(&account.email).await {
                    Ok(existing) if existing.id != account.id => {
                        tracing::debug!(
                            target: "identity.validation",
                            email_hash = %hash_for_correlation(&account.email),
                            "Email already registered to another account"
                        );
                        return Err(ErrorKind::EmailTaken.into());
                    }
                    Ok(_) => {}
                    Err(e) if e.kind() == ErrorKind::ResourceNotFound => {}
                    Err(e) => return Err(e),
                }
            }
            ValidationStep::IdGreaterThanZero => {
                if account.id <= 0 {
                    return Err(ErrorKind::IdInvalid.into());
                }
            }
        }

        Ok(account)
    }
}

#[async_trait]
impl CredentialStore for AccountValidator {
    async fn by_id(&self, id: i64) -> Result<Account, IdentityError> {
        let candidate = Account {
            id,
            ..Account::default()
        };
        self.run(DELETE_STEPS, candidate).await?;

        self.inner
            .by_id(id)
            .await
            .map_err(|e| translate(e, ErrorKind::IdInvalid))
    }

    async fn by_email(&self, email: &str) -> Result<Account, IdentityError> {
        let candidate = Account {
            email: email.to_string(),
            ..Account::default()
        };
        let candidate = self.run(LOOKUP_STEPS, candidate).await?;

        self.inner
            .by_email(&candidate.email)
            .await
            .map_err(|e| translate(e, ErrorKind::EmailNotFound))
    }

    async fn create(&self, account: Account) -> Result<Account, IdentityError> {
        let account = self.run(CREATE_STEPS, account).await?;

        // EmailAvailable and the insert are not atomic; the store's unique
        // constraint decides, and a conflict surfaces as EmailTaken.
        self.inner
            .create(account)
            .await
            .map_err(|e| translate(e, ErrorKind::IdInvalid))
    }

    async fn update(&self, account: Account) -> Result<Account, IdentityError> {
        let account = self.run(UPDATE_STEPS, account).await?;

        self.inner
            .update(account)
            .await
            .map_err(|e| translate(e, ErrorKind::IdInvalid))
    }

    async fn delete(&self, id: i64) -> Result<(), IdentityError> {
        let candidate = Account {
            id,
            ..Account::default()
        };
        self.run(DELETE_STEPS, candidate).await?;

        self.inner
            .delete(id)
            .await
            .map_err(|e| translate(e, ErrorKind::IdInvalid))
    }
}
