//! Identity Service Library
//!
//! User identity core: account validation, credential storage, password
//! authentication and signed session tokens, plus the HTTP surface over them.
//!
//! # Modules
//!
//! - `config` - Service configuration
//! - `crypto` - Password hashing, Ed25519 keys, session JWTs
//! - `errors` - Error taxonomy and HTTP rendering
//! - `handlers` - HTTP request handlers
//! - `middleware` - Session gate and HTTP metrics
//! - `models` - Account and request/response models
//! - `observability` - Metrics and log-field hashing
//! - `repositories` - Credential stores (Postgres, in-memory)
//! - `routes` - Router and metrics recorder
//! - `services` - Validation chain, authentication, token issuance

pub mod config;
pub mod crypto;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod repositories;
pub mod routes;
pub mod services;
