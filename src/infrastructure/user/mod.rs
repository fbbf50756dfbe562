//! User infrastructure module
//!
//! In-memory identity repository, pluggable credential storage and the
//! registration/login service.

mod credentials;
mod repository;
mod service;

pub use credentials::{credential_store, Argon2Credentials, CredentialStore, PlaintextCredentials};
pub use repository::InMemoryUserRepository;
pub use service::{AuthService, AuthSession, LoginRequest, RegisterRequest};
