//! API middleware components

pub mod security;
pub mod user_auth;

pub use security::security_headers_middleware;
pub use user_auth::{extract_bearer_token, RequireToken};
