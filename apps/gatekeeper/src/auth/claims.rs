//! Claims carried inside every issued token.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Token payload. Field names on the wire are `email`, `role`, `exp` and `iss`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Account identifier (the user's email)
    #[serde(rename = "email")]
    pub subject: String,
    pub role: i32,
    /// Expiry (seconds since epoch)
    #[serde(rename = "exp")]
    pub expires_at: i64,
    #[serde(rename = "iss")]
    pub issuer: String,
}

impl Claims {
    /// Claims expiring `ttl` from now.
    pub fn issue(subject: &str, role: i32, issuer: &str, ttl: Duration) -> Self {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        Self {
            subject: subject.to_string(),
            role,
            expires_at: now.saturating_add(i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX)),
            issuer: issuer.to_string(),
        }
    }

    pub fn is_expired_at(&self, unix_now: i64) -> bool {
        self.expires_at <= unix_now
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(OffsetDateTime::now_utc().unix_timestamp())
    }
}
