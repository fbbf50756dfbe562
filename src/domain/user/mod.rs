//! User domain
//!
//! Identity keys, user records, validation and the identity repository trait.

mod entity;
mod repository;
mod validation;

pub use entity::{Identity, NewUser, UserRecord};
pub use repository::UserRepository;
pub use validation::{
    validate_display_name, validate_email, validate_password, UserValidationError,
};

#[cfg(test)]
pub use repository::MockUserRepository;
