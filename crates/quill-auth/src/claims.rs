//! JWT payload for access tokens.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::roles::Role;

/// Verified identity of the caller, valid for one request.
///
/// `expires_at` is the application-level expiry (RFC 3339) checked by the
/// request gate; `exp` and `iat` are the registered JWT claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    pub uid: u64,
    pub role: Role,
    pub username: String,
    pub email: String,
    #[serde(rename = "expiresAt")]
    pub expires_at: String,
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn new(
        uid: u64,
        role: Role,
        username: impl Into<String>,
        email: impl Into<String>,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        let expires = issued_at + ttl;
        Self {
            uid,
            role,
            username: username.into(),
            email: email.into(),
            expires_at: expires.to_rfc3339_opts(SecondsFormat::Secs, true),
            exp: expires.timestamp().max(0) as usize,
            iat: issued_at.timestamp().max(0) as usize,
        }
    }

    pub fn expiry(&self) -> Result<DateTime<Utc>, chrono::ParseError> {
        DateTime::parse_from_rfc3339(&self.expires_at).map(|dt| dt.with_timezone(&Utc))
    }
}
