pub mod account_handler;
pub mod health;
pub mod metrics;

pub use account_handler::{check, delete_own, login, register, update_own, AppState};
pub use health::health_check;
pub use metrics::metrics_handler;
