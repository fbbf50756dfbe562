//! Token domain
//!
//! Claim sets, the rejection taxonomy and the clock abstraction shared by the
//! issuer and the validator.

mod claims;
mod clock;
mod error;

pub use claims::{ClaimSet, RESERVED_CLAIMS};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{AuthError, TokenRejection};
