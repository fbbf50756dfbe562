//! Claim set carried by an access token

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;

use crate::domain::user::Identity;

/// Claim names owned by the token format; custom fields may not shadow them
pub const RESERVED_CLAIMS: [&str; 4] = ["sub", "exp", "iat", "kid"];

/// Claims asserted about a token's subject
///
/// Instants are unix seconds so that validation never depends on the clock
/// at issuance.
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimSet {
    subject: Identity,
    expires_at: i64,
    issued_at: Option<i64>,
    extra: BTreeMap<String, Value>,
}

impl ClaimSet {
    /// Create claims for a subject expiring at the given instant
    pub fn new(subject: Identity, expires_at: DateTime<Utc>) -> Self {
        Self::from_parts(subject, expires_at.timestamp(), None, BTreeMap::new())
    }

    /// Rebuild claims from their encoded parts
    pub fn from_parts(
        subject: Identity,
        expires_at: i64,
        issued_at: Option<i64>,
        extra: BTreeMap<String, Value>,
    ) -> Self {
        Self {
            subject,
            expires_at,
            issued_at,
            extra: strip_reserved(extra),
        }
    }

    /// Record the issuance instant
    pub fn with_issued_at(mut self, issued_at: DateTime<Utc>) -> Self {
        self.issued_at = Some(issued_at.timestamp());
        self
    }

    /// Merge custom fields; reserved claim names are dropped
    pub fn with_extra(mut self, fields: impl IntoIterator<Item = (String, Value)>) -> Self {
        self.extra.extend(fields);
        self.extra = strip_reserved(std::mem::take(&mut self.extra));
        self
    }

    pub fn subject(&self) -> &Identity {
        &self.subject
    }

    /// Expiry as unix seconds
    pub fn expires_at(&self) -> i64 {
        self.expires_at
    }

    /// Issuance as unix seconds, when present
    pub fn issued_at(&self) -> Option<i64> {
        self.issued_at
    }

    pub fn extra(&self) -> &BTreeMap<String, Value> {
        &self.extra
    }

    /// Expiry as a timestamp; `None` if out of chrono's range
    pub fn expires_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.expires_at, 0)
    }

    /// A token is expired once `now >= exp + leeway`
    pub fn is_expired_at(&self, now: DateTime<Utc>, leeway: Duration) -> bool {
        now.timestamp() >= self.expires_at.saturating_add(leeway.num_seconds())
    }
}

fn strip_reserved(mut extra: BTreeMap<String, Value>) -> BTreeMap<String, Value> {
    extra.retain(|key, _| !RESERVED_CLAIMS.contains(&key.as_str()));
    extra
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn subject() -> Identity {
        Identity::new("a@b.com").unwrap()
    }

    #[test]
    fn test_expiry_boundary() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let claims = ClaimSet::new(subject(), now);

        assert!(claims.is_expired_at(now, Duration::zero()));
        assert!(!claims.is_expired_at(now - Duration::seconds(1), Duration::zero()));
        assert!(!claims.is_expired_at(now, Duration::seconds(30)));
        assert!(claims.is_expired_at(now + Duration::seconds(30), Duration::seconds(30)));
    }

    #[test]
    fn test_extra_drops_reserved_claims() {
        let now = Utc::now();
        let claims = ClaimSet::new(subject(), now).with_extra([
            ("sub".to_string(), json!("evil@b.com")),
            ("exp".to_string(), json!(0)),
            ("role".to_string(), json!("member")),
        ]);

        assert_eq!(claims.subject().as_str(), "a@b.com");
        assert_eq!(claims.expires_at(), now.timestamp());
        assert_eq!(claims.extra().len(), 1);
        assert_eq!(claims.extra()["role"], json!("member"));
    }

    #[test]
    fn test_issued_at() {
        let now = Utc::now();
        let claims = ClaimSet::new(subject(), now + Duration::minutes(15)).with_issued_at(now);

        assert_eq!(claims.issued_at(), Some(now.timestamp()));
        assert_eq!(
            claims.expires_at_utc().map(|t| t.timestamp()),
            Some((now + Duration::minutes(15)).timestamp())
        );
    }

    #[test]
    fn test_expiry_saturates() {
        let claims = ClaimSet::from_parts(subject(), i64::MAX, None, BTreeMap::new());
        assert!(!claims.is_expired_at(Utc::now(), Duration::seconds(60)));
        assert!(claims.expires_at_utc().is_none());
    }
}
