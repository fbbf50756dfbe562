//! Pluggable credential storage and comparison

use std::fmt::Debug;
use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::config::CredentialScheme;
use crate::domain::DomainError;

/// Prepares passwords for storage and checks login attempts against them
pub trait CredentialStore: Send + Sync + Debug {
    /// Turn a password into the stored credential secret
    fn prepare(&self, password: &str) -> Result<String, DomainError>;

    /// Check a password against a stored credential secret
    fn verify(&self, password: &str, stored: &str) -> bool;

    /// A stored secret in this scheme's format that belongs to no account
    ///
    /// Logins for unknown emails are verified against it.
    fn placeholder(&self) -> &str;
}

/// Build the store for a configured scheme
pub fn credential_store(scheme: CredentialScheme) -> Result<Arc<dyn CredentialStore>, DomainError> {
    Ok(match scheme {
        CredentialScheme::Argon2 => Arc::new(Argon2Credentials::new()?),
        CredentialScheme::Plaintext => Arc::new(PlaintextCredentials::new()),
    })
}

const PLACEHOLDER_PASSWORD: &str = "placeholder-credential-for-unknown-accounts";

/// Argon2id password hashes
#[derive(Debug, Clone)]
pub struct Argon2Credentials {
    placeholder: String,
}

impl Argon2Credentials {
    /// Hashes the placeholder secret up front with the same parameters as real passwords
    pub fn new() -> Result<Self, DomainError> {
        Ok(Self {
            placeholder: hash_password(PLACEHOLDER_PASSWORD)?,
        })
    }
}

fn hash_password(password: &str) -> Result<String, DomainError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| DomainError::internal(format!("Failed to hash password: {}", e)))
}

impl CredentialStore for Argon2Credentials {
    fn prepare(&self, password: &str) -> Result<String, DomainError> {
        hash_password(password)
    }

    fn verify(&self, password: &str, stored: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(stored) else {
            return false;
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    fn placeholder(&self) -> &str {
        &self.placeholder
    }
}

/// Passwords stored as given, compared in constant time
///
/// Unacceptable for any real deployment; startup refuses it in production.
#[derive(Debug, Clone, Default)]
pub struct PlaintextCredentials;

impl PlaintextCredentials {
    pub fn new() -> Self {
        Self
    }
}

impl CredentialStore for PlaintextCredentials {
    fn prepare(&self, password: &str) -> Result<String, DomainError> {
        Ok(password.to_string())
    }

    fn verify(&self, password: &str, stored: &str) -> bool {
        constant_time_eq(password.as_bytes(), stored.as_bytes())
    }

    fn placeholder(&self) -> &str {
        ""
    }
}

/// Constant-time byte comparison (length is not hidden)
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argon2_prepare_and_verify() {
        let store = Argon2Credentials::new().unwrap();
        let stored = store.prepare("pw").unwrap();

        assert_ne!(stored, "pw");
        assert!(stored.starts_with("$argon2"));
        assert!(store.verify("pw", &stored));
        assert!(!store.verify("wrong", &stored));
    }

    #[test]
    fn test_argon2_salts_differ() {
        let store = Argon2Credentials::new().unwrap();
        let first = store.prepare("password123").unwrap();
        let second = store.prepare("password123").unwrap();

        assert_ne!(first, second);
        assert!(store.verify("password123", &first));
        assert!(store.verify("password123", &second));
    }

    #[test]
    fn test_argon2_rejects_unparseable_hash() {
        let store = Argon2Credentials::new().unwrap();
        assert!(!store.verify("pw", "pw"));
        assert!(!store.verify("pw", ""));
    }

    #[test]
    fn test_argon2_placeholder_is_a_real_hash() {
        let store = Argon2Credentials::new().unwrap();

        assert!(store.placeholder().starts_with("$argon2id$"));
        assert!(PasswordHash::new(store.placeholder()).is_ok());
        assert!(!store.verify("pw", store.placeholder()));
    }

    #[test]
    fn test_plaintext() {
        let store = PlaintextCredentials::new();
        let stored = store.prepare("pw").unwrap();

        assert_eq!(stored, "pw");
        assert!(store.verify("pw", &stored));
        assert!(!store.verify("pW", &stored));
        assert!(!store.verify("pw2", &stored));
        assert!(!store.verify("", &stored));
    }

    #[test]
    fn test_factory_selects_scheme() {
        let argon = credential_store(CredentialScheme::Argon2).unwrap();
        assert!(argon.prepare("pw").unwrap().starts_with("$argon2"));

        let plain = credential_store(CredentialScheme::Plaintext).unwrap();
        assert_eq!(plain.prepare("pw").unwrap(), "pw");
    }
}
