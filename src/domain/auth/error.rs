use thiserror::Error;

use crate::domain::user::UserValidationError;
use crate::domain::DomainError;

/// Why the validator refused a token
///
/// Kept distinct for logging; callers outside the core collapse every
/// variant into one generic "invalid credentials" answer.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenRejection {
    #[error("malformed token")]
    Malformed,

    #[error("invalid token signature")]
    InvalidSignature,

    #[error("token expired")]
    Expired,
}

/// Authentication and issuance errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Token rejected: {0}")]
    Rejected(#[from] TokenRejection),

    #[error("Email already registered")]
    DuplicateIdentity,

    #[error("Incorrect email or password")]
    InvalidCredentials,

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error(transparent)]
    Repository(#[from] DomainError),
}

impl AuthError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }
}

impl From<UserValidationError> for AuthError {
    fn from(err: UserValidationError) -> Self {
        Self::validation(err.to_string())
    }
}
