pub mod auth;
pub mod request_log;

pub use auth::{require_bearer, AuthUser};
pub use request_log::log_request;
