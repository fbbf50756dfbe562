//! HTTP error responses

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::domain::{AuthError, DomainError};

/// Message returned for every token failure; the reason is only logged
pub const INVALID_TOKEN_MESSAGE: &str = "Could not validate credentials";

/// Error categories exposed to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorType {
    InvalidRequestError,
    AuthenticationError,
    NotFoundError,
    ConflictError,
    ServerError,
}

impl std::fmt::Display for ApiErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRequestError => write!(f, "invalid_request_error"),
            Self::AuthenticationError => write!(f, "authentication_error"),
            Self::NotFoundError => write!(f, "not_found_error"),
            Self::ConflictError => write!(f, "conflict_error"),
            Self::ServerError => write!(f, "server_error"),
        }
    }
}

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

/// Error detail structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: ApiErrorType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, error_type: ApiErrorType, message: impl Into<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                error: ApiErrorDetail {
                    message: message.into(),
                    error_type,
                    code: None,
                },
            },
        }
    }

    /// Add error code
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.response.error.code = Some(code.into());
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ApiErrorType::InvalidRequestError, message)
    }

    /// 401; the response carries `WWW-Authenticate: Bearer`
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, ApiErrorType::AuthenticationError, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, ApiErrorType::NotFoundError, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, ApiErrorType::ConflictError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, ApiErrorType::ServerError, message)
    }

    /// Generic rejection for any failed token check
    pub fn invalid_token() -> Self {
        Self::unauthorized(INVALID_TOKEN_MESSAGE).with_code("invalid_token")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let challenge = self.status == StatusCode::UNAUTHORIZED;
        let mut response = (self.status, Json(self.response)).into_response();

        if challenge {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }

        response
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Rejected(reason) => {
                debug!(%reason, "Token rejected");
                Self::invalid_token()
            }
            AuthError::DuplicateIdentity => {
                Self::conflict("Email already registered").with_code("duplicate_identity")
            }
            AuthError::InvalidCredentials => {
                Self::unauthorized("Incorrect email or password").with_code("invalid_credentials")
            }
            AuthError::Validation { message } => Self::bad_request(message),
            AuthError::NotFound { message } => Self::not_found(message),
            AuthError::Configuration { message } => {
                error!("Configuration error surfaced to a request: {}", message);
                Self::internal("Internal server error")
            }
            AuthError::Repository(e) => e.into(),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Conflict { message } => Self::conflict(message),
            other => {
                error!("Request failed: {}", other);
                Self::internal("Internal server error")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}",
            self.response.error.error_type, self.response.error.message
        )
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TokenRejection;

    #[test]
    fn test_every_rejection_looks_the_same() {
        for reason in [
            TokenRejection::Malformed,
            TokenRejection::InvalidSignature,
            TokenRejection::Expired,
        ] {
            let err: ApiError = AuthError::Rejected(reason).into();

            assert_eq!(err.status, StatusCode::UNAUTHORIZED);
            assert_eq!(err.response.error.message, INVALID_TOKEN_MESSAGE);
            assert_eq!(err.response.error.code.as_deref(), Some("invalid_token"));
        }
    }

    #[test]
    fn test_unauthorized_sets_challenge_header() {
        let response = ApiError::invalid_token().into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }

    #[test]
    fn test_other_errors_have_no_challenge() {
        let response = ApiError::bad_request("nope").into_response();
        assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());
    }

    #[test]
    fn test_auth_error_mapping() {
        let duplicate: ApiError = AuthError::DuplicateIdentity.into();
        assert_eq!(duplicate.status, StatusCode::CONFLICT);

        let credentials: ApiError = AuthError::InvalidCredentials.into();
        assert_eq!(credentials.status, StatusCode::UNAUTHORIZED);
        assert_eq!(credentials.response.error.message, "Incorrect email or password");

        let validation: ApiError = AuthError::validation("bad email").into();
        assert_eq!(validation.status, StatusCode::BAD_REQUEST);

        let config: ApiError = AuthError::configuration("secret").into();
        assert_eq!(config.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!config.response.error.message.contains("secret"));
    }

    #[test]
    fn test_storage_errors_are_masked() {
        let err: ApiError = AuthError::Repository(DomainError::storage("db at 10.0.0.1")).into();

        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.response.error.message.contains("10.0.0.1"));
    }

    #[test]
    fn test_error_serialization() {
        let err = ApiError::unauthorized("Invalid token");
        let json = serde_json::to_string(&err.response).unwrap();

        assert!(json.contains("authentication_error"));
        assert!(json.contains("Invalid token"));
    }
}
