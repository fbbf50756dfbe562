//! Application state for shared services

use std::sync::Arc;

use crate::infrastructure::auth::TokenValidator;
use crate::infrastructure::user::AuthService;

/// Services shared by every request; built once at startup
#[derive(Debug, Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub token_validator: Arc<TokenValidator>,
}

impl AppState {
    pub fn new(auth_service: Arc<AuthService>, token_validator: Arc<TokenValidator>) -> Self {
        Self {
            auth_service,
            token_validator,
        }
    }
}
