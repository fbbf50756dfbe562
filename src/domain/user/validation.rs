//! User validation utilities

use thiserror::Error;

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("Email cannot be empty")]
    EmptyEmail,

    #[error("Email exceeds maximum length of {0} characters")]
    EmailTooLong(usize),

    #[error("Email must contain exactly one '@'")]
    InvalidEmailSeparator,

    #[error("Email local part cannot be empty")]
    EmptyLocalPart,

    #[error("Email domain must contain a '.' between non-empty labels")]
    InvalidEmailDomain,

    #[error("Email contains invalid character: '{0}'")]
    InvalidEmailCharacter(char),

    #[error("Name cannot be empty")]
    EmptyName,

    #[error("Name exceeds maximum length of {0} characters")]
    NameTooLong(usize),

    #[error("Password cannot be empty")]
    EmptyPassword,

    #[error("Password exceeds maximum length of {0} characters")]
    PasswordTooLong(usize),
}

const MAX_EMAIL_LENGTH: usize = 254;
const MAX_NAME_LENGTH: usize = 100;
const MAX_PASSWORD_LENGTH: usize = 128;

/// Validate an email-shaped identity
///
/// Rules:
/// - Cannot be empty, maximum 254 characters
/// - Exactly one '@' with a non-empty local part
/// - Domain has at least one '.' and no empty labels
/// - No whitespace or control characters
pub fn validate_email(email: &str) -> Result<(), UserValidationError> {
    if email.is_empty() {
        return Err(UserValidationError::EmptyEmail);
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(UserValidationError::EmailTooLong(MAX_EMAIL_LENGTH));
    }

    if let Some(c) = email.chars().find(|c| c.is_whitespace() || c.is_control()) {
        return Err(UserValidationError::InvalidEmailCharacter(c));
    }

    let (local, domain) = match email.split_once('@') {
        Some((local, domain)) if !domain.contains('@') => (local, domain),
        _ => return Err(UserValidationError::InvalidEmailSeparator),
    };

    if local.is_empty() {
        return Err(UserValidationError::EmptyLocalPart);
    }

    if !domain.contains('.') || domain.split('.').any(str::is_empty) {
        return Err(UserValidationError::InvalidEmailDomain);
    }

    Ok(())
}

/// Validate a display name (already trimmed by the caller)
pub fn validate_display_name(name: &str) -> Result<(), UserValidationError> {
    if name.is_empty() {
        return Err(UserValidationError::EmptyName);
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(UserValidationError::NameTooLong(MAX_NAME_LENGTH));
    }

    Ok(())
}

/// Validate a password
///
/// Strength policy is not enforced here; only an upper bound that keeps
/// hashing cost predictable.
pub fn validate_password(password: &str) -> Result<(), UserValidationError> {
    if password.is_empty() {
        return Err(UserValidationError::EmptyPassword);
    }

    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(UserValidationError::PasswordTooLong(MAX_PASSWORD_LENGTH));
    }

    Ok(())
}
