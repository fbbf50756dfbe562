//! Request/response plumbing shared by the endpoints

pub mod error;
pub mod json;

pub use error::{ApiError, ApiErrorResponse, ApiErrorType, INVALID_TOKEN_MESSAGE};
pub use json::Json;
