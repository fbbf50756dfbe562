//! Domain layer - Core entities, errors and repository traits

pub mod auth;
pub mod error;
pub mod user;

pub use auth::{AuthError, ClaimSet, Clock, FixedClock, SystemClock, TokenRejection};
pub use error::DomainError;
pub use user::{Identity, NewUser, UserRecord, UserRepository};
