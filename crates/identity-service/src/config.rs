use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use thiserror::Error;

/// Default bcrypt cost factor (2^12 iterations).
pub const DEFAULT_BCRYPT_COST: u32 = 12;

/// Lowest accepted bcrypt cost.
pub const MIN_BCRYPT_COST: u32 = 10;

/// Highest accepted bcrypt cost. Anything above adds close to a second per hash.
pub const MAX_BCRYPT_COST: u32 = 14;

/// Longest accepted session lifetime (one year).
pub const MAX_SESSION_TTL_SECONDS: i64 = 365 * 24 * 60 * 60;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string. When unset the service keeps accounts in memory.
    pub database_url: Option<String>,
    pub bind_address: String,
    /// Secret appended to every password before hashing and verification.
    pub pepper: SecretString,
    pub signing_key_path: PathBuf,
    pub verify_key_path: PathBuf,
    pub bcrypt_cost: u32,
    /// Session lifetime. `None` issues tokens without an `exp` claim.
    pub session_ttl_seconds: Option<i64>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid pepper: {0}")]
    InvalidPepper(String),

    #[error("Invalid bcrypt cost: {0}")]
    InvalidBcryptCost(String),

    #[error("Invalid session TTL: {0}")]
    InvalidSessionTtl(String),
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing)
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let database_url = vars.get("DATABASE_URL").cloned();

        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let pepper = SecretString::from(required(vars, "IDENTITY_PEPPER")?.clone());
        if pepper.expose_secret().is_empty() {
            return Err(ConfigError::InvalidPepper(
                "IDENTITY_PEPPER must not be empty".to_string(),
            ));
        }

        let signing_key_path = PathBuf::from(required(vars, "IDENTITY_SIGNING_KEY_PATH")?);
        let verify_key_path = PathBuf::from(required(vars, "IDENTITY_VERIFY_KEY_PATH")?);

        let bcrypt_cost = match vars.get("BCRYPT_COST") {
            Some(raw) => parse_bcrypt_cost(raw)?,
            None => DEFAULT_BCRYPT_COST,
        };

        let session_ttl_seconds = match vars.get("SESSION_TTL_SECONDS") {
            Some(raw) => Some(parse_session_ttl(raw)?),
            None => None,
        };

        Ok(Config {
            database_url,
            bind_address,
            pepper,
            signing_key_path,
            verify_key_path,
            bcrypt_cost,
            session_ttl_seconds,
        })
    }
}

fn required<'a>(vars: &'a HashMap<String, String>, name: &str) -> Result<&'a String, ConfigError> {
    vars.get(name)
        .ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
}

fn parse_bcrypt_cost(raw: &str) -> Result<u32, ConfigError> {
    let cost: u32 = raw
        .parse()
        .map_err(|e| ConfigError::InvalidBcryptCost(format!("'{}' is not a number: {}", raw, e)))?;

    if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&cost) {
        return Err(ConfigError::InvalidBcryptCost(format!(
            "{} is outside {}-{}",
            cost, MIN_BCRYPT_COST, MAX_BCRYPT_COST
        )));
    }

    Ok(cost)
}

fn parse_session_ttl(raw: &str) -> Result<i64, ConfigError> {
    let ttl: i64 = raw
        .parse()
        .map_err(|e| ConfigError::InvalidSessionTtl(format!("'{}' is not a number: {}", raw, e)))?;

    if ttl <= 0 {
        return Err(ConfigError::InvalidSessionTtl(format!(
            "{} must be positive",
            ttl
        )));
    }

    if ttl > MAX_SESSION_TTL_SECONDS {
        return Err(ConfigError::InvalidSessionTtl(format!(
            "{} exceeds the maximum of {} seconds",
            ttl, MAX_SESSION_TTL_SECONDS
        )));
    }

    Ok(ttl)
}
