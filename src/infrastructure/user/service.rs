//! Registration and login

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;

use tracing::{info, warn};

use super::credentials::CredentialStore;
use crate::domain::auth::AuthError;
use crate::domain::user::{
    validate_display_name, validate_password, Identity, NewUser, UserRecord, UserRepository,
};
use crate::infrastructure::auth::{IssuedToken, TokenIssuer};

/// Request for registering a new user
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Request for logging in
#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// A token together with the user it was issued for
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: IssuedToken,
    pub user: UserRecord,
}

/// Composes the identity repository, credential store and token issuer
pub struct AuthService {
    repository: Arc<dyn UserRepository>,
    credentials: Arc<dyn CredentialStore>,
    issuer: Arc<TokenIssuer>,
}

impl Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("credentials", &self.credentials)
            .field("issuer", &self.issuer)
            .finish_non_exhaustive()
    }
}

impl AuthService {
    pub fn new(
        repository: Arc<dyn UserRepository>,
        credentials: Arc<dyn CredentialStore>,
        issuer: Arc<TokenIssuer>,
    ) -> Self {
        Self {
            repository,
            credentials,
            issuer,
        }
    }

    /// Register a user and issue their first token
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthSession, AuthError> {
        let name = request.name.trim();
        validate_display_name(name)?;
        validate_password(&request.password)?;
        let identity = Identity::new(request.email)?;

        if self.repository.exists(&identity).await? {
            return Err(AuthError::DuplicateIdentity);
        }

        let credential_secret = self.credentials.prepare(&request.password)?;

        let user = self
            .repository
            .insert(NewUser {
                identity,
                display_name: name.to_string(),
                credential_secret,
            })
            .await
            .map_err(|e| {
                if e.is_conflict() {
                    AuthError::DuplicateIdentity
                } else {
                    AuthError::from(e)
                }
            })?;

        let token = self.issue_for(&user)?;
        info!(user_id = %user.id(), "Registered user");

        Ok(AuthSession { token, user })
    }

    /// Check credentials and issue a token
    ///
    /// Unknown emails and wrong passwords fail identically.
    pub async fn login(&self, request: LoginRequest) -> Result<AuthSession, AuthError> {
        let Ok(identity) = Identity::new(request.email) else {
            self.verify_placeholder(&request.password);
            warn!("Login failed: invalid email");
            return Err(AuthError::InvalidCredentials);
        };

        let user = match self.repository.get_by_email(&identity).await? {
            Some(user) => user,
            None => {
                self.verify_placeholder(&request.password);
                warn!("Login failed: unknown email");
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !self
            .credentials
            .verify(&request.password, user.credential_secret())
        {
            warn!(user_id = %user.id(), "Login failed: credential mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.issue_for(&user)?;
        info!(user_id = %user.id(), "User logged in");

        Ok(AuthSession { token, user })
    }

    /// Load the profile of an authenticated identity
    pub async fn current_user(&self, identity: &Identity) -> Result<UserRecord, AuthError> {
        self.repository
            .get_by_email(identity)
            .await?
            .ok_or_else(|| AuthError::not_found("User not found"))
    }

    /// Insert a user unless the email is already taken; returns whether it was added
    pub async fn ensure_user(&self, request: RegisterRequest) -> Result<bool, AuthError> {
        match self.register(request).await {
            Ok(_) => Ok(true),
            Err(AuthError::DuplicateIdentity) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Run a full credential check whose result is discarded
    fn verify_placeholder(&self, password: &str) {
        let placeholder = self.credentials.placeholder();
        let _ = self.credentials.verify(password, placeholder);
    }

    fn issue_for(&self, user: &UserRecord) -> Result<IssuedToken, AuthError> {
        self.issuer.issue(user.identity(), None, BTreeMap::new())
    }
}
