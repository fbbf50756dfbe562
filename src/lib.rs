//! RoleReady authentication service
//!
//! Issues and validates signed bearer tokens:
//! - Claims codec producing compact `header.payload.signature` tokens
//! - HMAC-SHA256 signing with constant-time verification
//! - Token issuer with a bounded lifetime policy
//! - Token validator (decode, signature, expiry)
//! - Registration and login over a pluggable identity repository

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use domain::auth::{Clock, SystemClock};
use infrastructure::auth::TokenServices;
use infrastructure::user::{credential_store, AuthService, InMemoryUserRepository, RegisterRequest};
use tracing::info;

const DEMO_USER_NAME: &str = "Test User";
const DEMO_USER_EMAIL: &str = "test@example.com";
const DEMO_USER_PASSWORD: &str = "password123";

/// Create the application state using the system clock
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    create_app_state_with_clock(config, Arc::new(SystemClock)).await
}

/// Create the application state with an explicit clock
pub async fn create_app_state_with_clock(
    config: &AppConfig,
    clock: Arc<dyn Clock>,
) -> anyhow::Result<AppState> {
    let tokens = TokenServices::from_config(&config.auth, config.environment, clock)?;

    let repository = Arc::new(InMemoryUserRepository::new());
    let credentials = credential_store(config.auth.credential_scheme)?;
    info!(scheme = ?config.auth.credential_scheme, "Credential store ready");

    let auth_service = Arc::new(AuthService::new(repository, credentials, tokens.issuer));

    if config.auth.seed_demo_user {
        let added = auth_service
            .ensure_user(RegisterRequest {
                name: DEMO_USER_NAME.to_string(),
                email: DEMO_USER_EMAIL.to_string(),
                password: DEMO_USER_PASSWORD.to_string(),
            })
            .await?;

        if added {
            info!(email = DEMO_USER_EMAIL, "Seeded demo user");
        }
    }

    Ok(AppState::new(auth_service, tokens.validator))
}
