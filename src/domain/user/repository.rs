//! User repository trait

use async_trait::async_trait;

use super::entity::{Identity, NewUser, UserRecord};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Identity repository: maps an email to its user record
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Get a user by their email
    async fn get_by_email(&self, email: &Identity) -> Result<Option<UserRecord>, DomainError>;

    /// Insert a new user, failing with a conflict if the email is taken
    async fn insert(&self, user: NewUser) -> Result<UserRecord, DomainError>;

    /// Check if an email is already registered
    async fn exists(&self, email: &Identity) -> Result<bool, DomainError> {
        Ok(self.get_by_email(email).await?.is_some())
    }
}
