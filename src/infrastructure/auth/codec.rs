//! Compact token encoding
//!
//! Tokens use the JWS compact layout: `header.payload.signature`, each part
//! base64url without padding. Only `[A-Za-z0-9_.-]` ever appears, so a token
//! travels in an `Authorization: Bearer` header without escaping.

use std::collections::BTreeMap;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::domain::auth::{AuthError, ClaimSet, TokenRejection};
use crate::domain::user::Identity;

/// Only algorithm accepted on decode
pub const TOKEN_ALGORITHM: &str = "HS256";
const TOKEN_TYPE: &str = "JWT";

/// Structural failure while decoding a token
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("malformed token: {0}")]
pub struct MalformedToken(pub String);

impl From<MalformedToken> for TokenRejection {
    fn from(_: MalformedToken) -> Self {
        TokenRejection::Malformed
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct TokenHeader {
    alg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    typ: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    kid: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ClaimsPayload {
    sub: String,
    exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    iat: Option<i64>,
    #[serde(flatten)]
    extra: BTreeMap<String, Value>,
}

/// A token split into its parts, before any trust decision
#[derive(Debug, Clone)]
pub struct DecodedToken {
    signing_input: String,
    signature: Vec<u8>,
    key_id: Option<String>,
    claims: ClaimSet,
}

impl DecodedToken {
    /// The exact `header.payload` bytes received; the signature covers these
    pub fn signing_input(&self) -> &[u8] {
        self.signing_input.as_bytes()
    }

    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// Key identifier from the header, reserved for key rotation
    pub fn key_id(&self) -> Option<&str> {
        self.key_id.as_deref()
    }

    pub fn claims(&self) -> &ClaimSet {
        &self.claims
    }

    pub fn into_claims(self) -> ClaimSet {
        self.claims
    }
}

/// Encodes claim sets to the unsigned `header.payload` form and parses tokens
#[derive(Debug, Clone, Default)]
pub struct ClaimsCodec {
    key_id: Option<String>,
}

impl ClaimsCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp a `kid` into every header this codec writes
    pub fn with_key_id(mut self, key_id: impl Into<String>) -> Self {
        self.key_id = Some(key_id.into());
        self
    }

    /// Encode claims into the signing input (`header.payload`)
    pub fn encode(&self, claims: &ClaimSet) -> Result<String, AuthError> {
        let header = TokenHeader {
            alg: TOKEN_ALGORITHM.to_string(),
            typ: Some(TOKEN_TYPE.to_string()),
            kid: self.key_id.clone(),
        };

        let payload = ClaimsPayload {
            sub: claims.subject().as_str().to_string(),
            exp: claims.expires_at(),
            iat: claims.issued_at(),
            extra: claims.extra().clone(),
        };

        Ok(format!("{}.{}", encode_segment(&header)?, encode_segment(&payload)?))
    }

    /// Append a signature to an encoded signing input
    pub fn assemble(&self, signing_input: &str, signature: &[u8]) -> String {
        format!("{}.{}", signing_input, URL_SAFE_NO_PAD.encode(signature))
    }

    /// Split and parse a token without checking its signature
    pub fn decode(&self, token: &str) -> Result<DecodedToken, MalformedToken> {
        let (signing_input, signature) = token
            .rsplit_once('.')
            .ok_or_else(|| MalformedToken("expected three segments".to_string()))?;

        let (header, payload) = signing_input
            .split_once('.')
            .ok_or_else(|| MalformedToken("expected three segments".to_string()))?;

        if payload.contains('.') {
            return Err(MalformedToken("too many segments".to_string()));
        }

        if signature.is_empty() {
            return Err(MalformedToken("missing signature".to_string()));
        }

        let header: TokenHeader = decode_segment(header, "header")?;

        if header.alg != TOKEN_ALGORITHM {
            return Err(MalformedToken(format!(
                "unsupported algorithm '{}'",
                header.alg
            )));
        }

        let payload: ClaimsPayload = decode_segment(payload, "payload")?;

        let subject = Identity::new(payload.sub)
            .map_err(|e| MalformedToken(format!("invalid subject: {}", e)))?;

        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|e| MalformedToken(format!("signature is not base64url: {}", e)))?;

        Ok(DecodedToken {
            signing_input: signing_input.to_string(),
            signature,
            key_id: header.kid,
            claims: ClaimSet::from_parts(subject, payload.exp, payload.iat, payload.extra),
        })
    }
}

fn encode_segment<T: Serialize>(value: &T) -> Result<String, AuthError> {
    let json = serde_json::to_vec(value)
        .map_err(|e| AuthError::validation(format!("Failed to encode token: {}", e)))?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

fn decode_segment<T: for<'de> Deserialize<'de>>(
    segment: &str,
    name: &str,
) -> Result<T, MalformedToken> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| MalformedToken(format!("{} is not base64url: {}", name, e)))?;

    serde_json::from_slice(&bytes).map_err(|e| MalformedToken(format!("invalid {}: {}", name, e)))
}
