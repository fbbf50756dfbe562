//! User entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{validate_email, UserValidationError};

/// Identity key of a user - an email address, unique within the repository
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity(String);

impl Identity {
    /// Create a new Identity after validation
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        let email = email.into();
        let email = email.trim();
        validate_email(email)?;
        Ok(Self(email.to_string()))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Identity {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Identity> for String {
    fn from(identity: Identity) -> Self {
        identity.0
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user that has not been stored yet
#[derive(Debug, Clone)]
pub struct NewUser {
    pub identity: Identity,
    pub display_name: String,
    /// Stored credential as produced by the configured credential store
    pub credential_secret: String,
}

/// Stored user record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    /// Repository-assigned identifier
    id: String,
    /// Email used to log in
    identity: Identity,
    display_name: String,
    /// Never exposed in serialization
    #[serde(skip_serializing, default)]
    credential_secret: String,
    created_at: DateTime<Utc>,
}

impl UserRecord {
    /// Materialize a record from a new user
    pub fn new(id: impl Into<String>, user: NewUser, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            identity: user.identity,
            display_name: user.display_name,
            credential_secret: user.credential_secret,
            created_at,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn credential_secret(&self) -> &str {
        &self.credential_secret
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
