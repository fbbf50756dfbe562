//! Per-request token validation
//!
//! A token moves `Received -> Decoded -> SignatureChecked -> ExpiryChecked ->
//! Authenticated`; any failed step ends in a rejection and nothing decoded
//! from the token is handed out.

use std::sync::Arc;

use chrono::Duration;
use tracing::debug;

use super::codec::{ClaimsCodec, DecodedToken};
use super::signer::HmacSigner;
use crate::domain::auth::{ClaimSet, Clock, TokenRejection};
use crate::domain::user::Identity;

/// Largest accepted clock-skew allowance
pub const MAX_LEEWAY_SECONDS: i64 = 60;

/// Step of the validation pipeline, reported in validation logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationStage {
    Received,
    Decoded,
    SignatureChecked,
    ExpiryChecked,
    Authenticated,
}

/// Outcome of a successful validation
#[derive(Debug, Clone, PartialEq)]
pub struct Authenticated {
    claims: ClaimSet,
}

impl Authenticated {
    pub fn subject(&self) -> &Identity {
        self.claims.subject()
    }

    pub fn claims(&self) -> &ClaimSet {
        &self.claims
    }
}

/// Decodes, verifies and expiry-checks bearer tokens
#[derive(Debug, Clone)]
pub struct TokenValidator {
    codec: ClaimsCodec,
    signer: Arc<HmacSigner>,
    clock: Arc<dyn Clock>,
    leeway: Duration,
}

impl TokenValidator {
    pub fn new(codec: ClaimsCodec, signer: Arc<HmacSigner>, clock: Arc<dyn Clock>) -> Self {
        Self {
            codec,
            signer,
            clock,
            leeway: Duration::zero(),
        }
    }

    /// Accept tokens up to `leeway` past their expiry, capped at 60 seconds
    pub fn with_leeway(mut self, leeway: Duration) -> Self {
        self.leeway = leeway.clamp(Duration::zero(), Duration::seconds(MAX_LEEWAY_SECONDS));
        self
    }

    pub fn leeway(&self) -> Duration {
        self.leeway
    }

    /// Validate a raw bearer token and return the authenticated subject
    pub fn validate(&self, token: &str) -> Result<Authenticated, TokenRejection> {
        let decoded = self.decode(token)?;
        self.check_signature(&decoded)?;
        let claims = decoded.into_claims();
        self.check_expiry(&claims)?;

        debug!(
            stage = ?ValidationStage::Authenticated,
            subject = %claims.subject(),
            "Accepted access token"
        );

        Ok(Authenticated { claims })
    }

    fn decode(&self, token: &str) -> Result<DecodedToken, TokenRejection> {
        self.codec.decode(token.trim()).map_err(|e| {
            reject(
                ValidationStage::Received,
                ValidationStage::Decoded,
                TokenRejection::Malformed,
                &e.to_string(),
            )
        })
    }

    fn check_signature(&self, decoded: &DecodedToken) -> Result<(), TokenRejection> {
        if self
            .signer
            .verify(decoded.signing_input(), decoded.signature())
        {
            return Ok(());
        }

        Err(reject(
            ValidationStage::Decoded,
            ValidationStage::SignatureChecked,
            TokenRejection::InvalidSignature,
            "signature mismatch",
        ))
    }

    fn check_expiry(&self, claims: &ClaimSet) -> Result<(), TokenRejection> {
        let now = self.clock.now();

        if claims.is_expired_at(now, self.leeway) {
            return Err(reject(
                ValidationStage::SignatureChecked,
                ValidationStage::ExpiryChecked,
                TokenRejection::Expired,
                &format!("expired at {}, now {}", claims.expires_at(), now.timestamp()),
            ));
        }

        Ok(())
    }
}

fn reject(
    reached: ValidationStage,
    failed: ValidationStage,
    reason: TokenRejection,
    detail: &str,
) -> TokenRejection {
    debug!(?reached, ?failed, %reason, detail, "Rejected access token");
    reason
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::auth::FixedClock;
    use crate::infrastructure::auth::issuer::{TokenIssuer, TtlPolicy};
    use crate::infrastructure::auth::signer::SigningKey;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    use chrono::DateTime;
    use std::collections::BTreeMap;

    const NOW: i64 = 1_700_000_000;

    fn signer(secret: &str) -> Arc<HmacSigner> {
        Arc::new(HmacSigner::new(SigningKey::from_secret(secret)))
    }

    fn validator_at(secret: &str, now: i64) -> TokenValidator {
        TokenValidator::new(
            ClaimsCodec::new(),
            signer(secret),
            Arc::new(FixedClock::at_timestamp(now)),
        )
    }

    fn identity() -> Identity {
        Identity::new("a@b.com").unwrap()
    }

    fn issue(secret: &str) -> String {
        TokenIssuer::new(
            ClaimsCodec::new(),
            signer(secret),
            TtlPolicy::default(),
            Arc::new(FixedClock::at_timestamp(NOW)),
        )
        .issue_default(&identity())
        .unwrap()
        .token
    }

    /// Sign arbitrary claims the way the issuer would
    fn sign_claims(secret: &str, claims: &ClaimSet) -> String {
        let codec = ClaimsCodec::new();
        let input = codec.encode(claims).unwrap();
        codec.assemble(&input, &signer(secret).sign(input.as_bytes()))
    }

    fn expiring_at(seconds: i64) -> ClaimSet {
        ClaimSet::new(identity(), DateTime::from_timestamp(seconds, 0).unwrap())
    }

    #[test]
    fn test_valid_token_authenticates() {
        let authenticated = validator_at("k", NOW).validate(&issue("k")).unwrap();

        assert_eq!(authenticated.subject().as_str(), "a@b.com");
        assert_eq!(authenticated.claims().expires_at(), NOW + 900);
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        let token = format!("  {}\n", issue("k"));
        assert!(validator_at("k", NOW).validate(&token).is_ok());
    }

    #[test]
    fn test_malformed_tokens() {
        let validator = validator_at("k", NOW);

        for token in ["", "garbage", "a.b", "a.b.c", "a.b.c.d"] {
            assert_eq!(
                validator.validate(token),
                Err(TokenRejection::Malformed),
                "token {:?}",
                token
            );
        }
    }

    #[test]
    fn test_wrong_key_is_invalid_signature() {
        assert_eq!(
            validator_at("K2", NOW).validate(&issue("K1")),
            Err(TokenRejection::InvalidSignature)
        );
    }

    #[test]
    fn test_altered_payload_byte_is_rejected() {
        let token = issue("k");
        let validator = validator_at("k", NOW);
        let (header, rest) = token.split_once('.').unwrap();
        let (payload, signature) = rest.split_once('.').unwrap();

        for i in 0..payload.len() {
            let mut bytes = payload.as_bytes().to_vec();
            bytes[i] = if bytes[i] == b'A' { b'B' } else { b'A' };
            let altered = format!(
                "{}.{}.{}",
                header,
                String::from_utf8(bytes).unwrap(),
                signature
            );

            let result = validator.validate(&altered);
            assert!(
                matches!(
                    result,
                    Err(TokenRejection::InvalidSignature) | Err(TokenRejection::Malformed)
                ),
                "altered byte {} was accepted",
                i
            );
        }
    }

    #[test]
    fn test_re_signed_payload_from_other_subject_fails() {
        let token = issue("k");
        let (header, rest) = token.split_once('.').unwrap();
        let (_, signature) = rest.split_once('.').unwrap();
        let forged_payload =
            URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"admin@b.com","exp":{}}}"#, NOW + 900));

        assert_eq!(
            validator_at("k", NOW).validate(&format!("{}.{}.{}", header, forged_payload, signature)),
            Err(TokenRejection::InvalidSignature)
        );
    }

    #[test]
    fn test_expiry_boundary() {
        let validator = validator_at("k", NOW);

        assert_eq!(
            validator.validate(&sign_claims("k", &expiring_at(NOW))),
            Err(TokenRejection::Expired)
        );
        assert!(validator
            .validate(&sign_claims("k", &expiring_at(NOW + 1)))
            .is_ok());
        assert_eq!(
            validator.validate(&sign_claims("k", &expiring_at(NOW - 3600))),
            Err(TokenRejection::Expired)
        );
    }

    #[test]
    fn test_issued_token_expires_after_ttl() {
        let token = issue("k");

        assert!(validator_at("k", NOW + 899).validate(&token).is_ok());
        assert_eq!(
            validator_at("k", NOW + 900).validate(&token),
            Err(TokenRejection::Expired)
        );
    }

    #[test]
    fn test_leeway() {
        let token = sign_claims("k", &expiring_at(NOW));
        let validator = validator_at("k", NOW + 10).with_leeway(Duration::seconds(30));

        assert!(validator.validate(&token).is_ok());
        assert_eq!(
            validator_at("k", NOW + 30)
                .with_leeway(Duration::seconds(30))
                .validate(&token),
            Err(TokenRejection::Expired)
        );
    }

    #[test]
    fn test_leeway_is_capped() {
        let validator = validator_at("k", NOW).with_leeway(Duration::hours(1));
        assert_eq!(validator.leeway(), Duration::seconds(MAX_LEEWAY_SECONDS));

        let validator = validator_at("k", NOW).with_leeway(Duration::seconds(-5));
        assert_eq!(validator.leeway(), Duration::zero());
    }

    #[test]
    fn test_signature_checked_before_expiry() {
        // An expired token with a bad signature reports the signature failure
        let token = sign_claims("other", &expiring_at(NOW - 10));
        assert_eq!(
            validator_at("k", NOW).validate(&token),
            Err(TokenRejection::InvalidSignature)
        );
    }

    #[test]
    fn test_custom_claims_survive_validation() {
        let claims = expiring_at(NOW + 60).with_extra(BTreeMap::from([(
            "name".to_string(),
            serde_json::json!("Test"),
        )]));

        let authenticated = validator_at("k", NOW)
            .validate(&sign_claims("k", &claims))
            .unwrap();
        assert_eq!(authenticated.claims(), &claims);
    }
}
