//! Token issuance and validation
//!
//! The codec and signer are leaves; the issuer and validator compose them and
//! share one read-only signer built at startup.

mod codec;
mod issuer;
mod signer;
mod validator;

pub use codec::{ClaimsCodec, DecodedToken, MalformedToken, TOKEN_ALGORITHM};
pub use issuer::{IssuedToken, TokenIssuer, TtlPolicy, TOKEN_TYPE_BEARER};
pub use signer::{HmacSigner, SigningKey};
pub use validator::{Authenticated, TokenValidator, ValidationStage, MAX_LEEWAY_SECONDS};

use std::sync::Arc;

use chrono::Duration;

use crate::config::{AuthConfig, Environment};
use crate::domain::auth::{AuthError, Clock};

/// Issuer and validator sharing one signing key
#[derive(Debug, Clone)]
pub struct TokenServices {
    pub issuer: Arc<TokenIssuer>,
    pub validator: Arc<TokenValidator>,
}

impl TokenServices {
    /// Build both services from configuration, failing on an unusable setup
    pub fn from_config(
        config: &AuthConfig,
        environment: Environment,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AuthError> {
        config.validate(environment)?;

        let signer = Arc::new(HmacSigner::new(SigningKey::from_secret(&config.secret)));
        let codec = match &config.key_id {
            Some(kid) => ClaimsCodec::new().with_key_id(kid),
            None => ClaimsCodec::new(),
        };

        let policy = TtlPolicy::from_minutes(
            config.access_token_ttl_minutes,
            config.max_token_ttl_minutes,
        )?;

        let leeway_seconds = i64::try_from(config.leeway_seconds).unwrap_or(MAX_LEEWAY_SECONDS);

        let issuer = TokenIssuer::new(codec.clone(), signer.clone(), policy, clock.clone());
        let validator = TokenValidator::new(codec, signer, clock)
            .with_leeway(Duration::seconds(leeway_seconds.min(MAX_LEEWAY_SECONDS)));

        Ok(Self {
            issuer: Arc::new(issuer),
            validator: Arc::new(validator),
        })
    }
}
