//! Authentication API endpoints
//!
//! Registration, login and profile lookup for bearer-token clients.

use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::RequireToken;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::user::UserRecord;
use crate::infrastructure::user::{AuthSession, LoginRequest, RegisterRequest};

/// Create the authentication router
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(get_current_user))
}

/// Registration request
#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

/// Token response returned by register and login
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_at: String,
    pub user: UserResponse,
}

/// User profile (safe to expose)
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: String,
}

impl From<&UserRecord> for UserResponse {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id().to_string(),
            name: user.display_name().to_string(),
            email: user.identity().to_string(),
            created_at: user.created_at().to_rfc3339(),
        }
    }
}

impl From<AuthSession> for TokenResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            access_token: session.token.token,
            token_type: session.token.token_type.to_string(),
            expires_at: session.token.expires_at.to_rfc3339(),
            user: UserResponse::from(&session.user),
        }
    }
}

/// Register a new account
///
/// POST /api/auth/register
///
/// Responds 200 with the same body as login.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterBody>,
) -> Result<Json<TokenResponse>, ApiError> {
    let session = state
        .auth_service
        .register(RegisterRequest {
            name: body.name,
            email: body.email,
            password: body.password,
        })
        .await?;

    Ok(Json(session.into()))
}

/// Login with email and password
///
/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginBody>,
) -> Result<Json<TokenResponse>, ApiError> {
    let session = state
        .auth_service
        .login(LoginRequest {
            email: body.email,
            password: body.password,
        })
        .await?;

    Ok(Json(session.into()))
}

/// GET /api/auth/me
pub async fn get_current_user(
    State(state): State<AppState>,
    RequireToken(authenticated): RequireToken,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .auth_service
        .current_user(authenticated.subject())
        .await?;

    Ok(Json(UserResponse::from(&user)))
}
