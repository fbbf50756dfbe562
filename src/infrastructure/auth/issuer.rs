//! Access token issuance

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use tracing::{debug, warn};

use super::codec::ClaimsCodec;
use super::signer::HmacSigner;
use crate::domain::auth::{AuthError, ClaimSet, Clock};
use crate::domain::user::Identity;

/// Token type reported to clients
pub const TOKEN_TYPE_BEARER: &str = "bearer";

/// Upper bound on any configured token lifetime
pub const MAX_CONFIGURABLE_TTL_DAYS: i64 = 365;

/// Lifetime rules for issued tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlPolicy {
    default_ttl: Duration,
    max_ttl: Duration,
}

impl TtlPolicy {
    /// Build a policy; a default above the maximum is lowered to it
    pub fn new(default_ttl: Duration, max_ttl: Duration) -> Result<Self, AuthError> {
        if max_ttl <= Duration::zero() || default_ttl <= Duration::zero() {
            return Err(AuthError::configuration(
                "Token TTLs must be greater than zero",
            ));
        }

        if max_ttl > Duration::days(MAX_CONFIGURABLE_TTL_DAYS) {
            return Err(AuthError::configuration(format!(
                "Maximum token TTL must not exceed {} days",
                MAX_CONFIGURABLE_TTL_DAYS
            )));
        }

        Ok(Self {
            default_ttl: default_ttl.min(max_ttl),
            max_ttl,
        })
    }

    /// Policy from whole minutes
    pub fn from_minutes(default_minutes: u64, max_minutes: u64) -> Result<Self, AuthError> {
        Self::new(minutes(default_minutes)?, minutes(max_minutes)?)
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    pub fn max_ttl(&self) -> Duration {
        self.max_ttl
    }

    /// Resolve the TTL to use for a request, clamping to the maximum
    pub fn resolve(&self, requested: Option<Duration>) -> Result<Duration, AuthError> {
        match requested {
            None => Ok(self.default_ttl),
            Some(ttl) if ttl <= Duration::zero() => {
                Err(AuthError::validation("Token TTL must be greater than zero"))
            }
            Some(ttl) if ttl > self.max_ttl => {
                warn!(
                    requested_seconds = ttl.num_seconds(),
                    max_seconds = self.max_ttl.num_seconds(),
                    "Requested token TTL exceeds maximum, clamping"
                );
                Ok(self.max_ttl)
            }
            Some(ttl) => Ok(ttl),
        }
    }
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self {
            default_ttl: Duration::minutes(15),
            max_ttl: Duration::minutes(15),
        }
    }
}

fn minutes(value: u64) -> Result<Duration, AuthError> {
    i64::try_from(value)
        .ok()
        .and_then(Duration::try_minutes)
        .ok_or_else(|| AuthError::configuration(format!("TTL of {} minutes is out of range", value)))
}

/// A freshly signed access token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub token_type: &'static str,
    pub expires_at: DateTime<Utc>,
}

/// Builds, encodes and signs claim sets
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    codec: ClaimsCodec,
    signer: Arc<HmacSigner>,
    policy: TtlPolicy,
    clock: Arc<dyn Clock>,
}

impl TokenIssuer {
    pub fn new(
        codec: ClaimsCodec,
        signer: Arc<HmacSigner>,
        policy: TtlPolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            codec,
            signer,
            policy,
            clock,
        }
    }

    pub fn policy(&self) -> &TtlPolicy {
        &self.policy
    }

    /// Issue a token for `identity`
    ///
    /// `ttl` defaults to the policy default and is clamped to the policy
    /// maximum. Reserved claim names in `extra` are ignored.
    pub fn issue(
        &self,
        identity: &Identity,
        ttl: Option<Duration>,
        extra: BTreeMap<String, Value>,
    ) -> Result<IssuedToken, AuthError> {
        let ttl = self.policy.resolve(ttl)?;
        let now = self.clock.now();
        let expires_at = now.checked_add_signed(ttl).ok_or_else(|| {
            AuthError::configuration("Token expiry is outside the representable time range")
        })?;

        let claims = ClaimSet::new(identity.clone(), expires_at)
            .with_issued_at(now)
            .with_extra(extra);

        let signing_input = self.codec.encode(&claims)?;
        let signature = self.signer.sign(signing_input.as_bytes());
        let token = self.codec.assemble(&signing_input, &signature);

        debug!(
            subject = %identity,
            expires_at = claims.expires_at(),
            "Issued access token"
        );

        Ok(IssuedToken {
            token,
            token_type: TOKEN_TYPE_BEARER,
            expires_at,
        })
    }

    /// Issue a token with the default TTL and no custom claims
    pub fn issue_default(&self, identity: &Identity) -> Result<IssuedToken, AuthError> {
        self.issue(identity, None, BTreeMap::new())
    }
}
