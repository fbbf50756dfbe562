//! Infrastructure layer - Token services, user storage and logging

pub mod auth;
pub mod logging;
pub mod user;
