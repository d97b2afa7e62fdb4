pub mod account_service;
pub mod account_validator;
pub mod token_service;

pub use account_service::AccountService;
pub use account_validator::AccountValidator;
pub use token_service::{TokenIssuer, TokenVerifier};
