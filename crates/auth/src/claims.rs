use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use scriptorium_core::SubjectId;

use crate::{Role, Subject};

/// JWT claims model (transport-agnostic).
///
/// Timestamps travel as unix seconds under the registered `iat`/`exp` names so
/// tokens stay readable by any standard JWT tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject identifier.
    pub sub: SubjectId,

    /// Login name at issue time (informational).
    pub username: String,

    /// RBAC role at issue time.
    pub role: Role,

    /// Issued-at timestamp.
    #[serde(rename = "iat", with = "chrono::serde::ts_seconds")]
    pub issued_at: DateTime<Utc>,

    /// Expiration timestamp.
    #[serde(rename = "exp", with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,
}

impl JwtClaims {
    pub fn subject(&self) -> Subject {
        Subject::new(self.sub, self.role)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,
}

/// Deterministically validate JWT claims.
///
/// Note: this validates the *claims* only. Signature verification / decoding
/// happens in [`crate::jwt`].
pub fn validate_claims(claims: &JwtClaims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    if claims.expires_at <= claims.issued_at {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.issued_at {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn claims_at(issued_at: DateTime<Utc>, ttl: Duration) -> JwtClaims {
        JwtClaims {
            sub: SubjectId::new(1),
            username: "alice".to_string(),
            role: Role::User,
            issued_at,
            expires_at: issued_at + ttl,
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn valid_inside_window() {
        let claims = claims_at(t0(), Duration::minutes(60));
        assert_eq!(validate_claims(&claims, t0()), Ok(()));
        assert_eq!(validate_claims(&claims, t0() + Duration::minutes(59)), Ok(()));
    }

    #[test]
    fn expired_at_and_after_expiry() {
        let claims = claims_at(t0(), Duration::minutes(60));
        assert_eq!(
            validate_claims(&claims, t0() + Duration::minutes(60)),
            Err(TokenValidationError::Expired)
        );
    }

    #[test]
    fn future_issue_time_is_not_yet_valid() {
        let claims = claims_at(t0(), Duration::minutes(60));
        assert_eq!(
            validate_claims(&claims, t0() - Duration::seconds(1)),
            Err(TokenValidationError::NotYetValid)
        );
    }

    #[test]
    fn inverted_window_is_rejected() {
        let claims = claims_at(t0(), Duration::zero());
        assert_eq!(validate_claims(&claims, t0()), Err(TokenValidationError::InvalidTimeWindow));
    }

    #[test]
    fn wire_format_uses_registered_claim_names() {
        let claims = claims_at(t0(), Duration::minutes(1));
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["sub"], 1);
        assert_eq!(json["role"], "user");
        assert_eq!(json["iat"], t0().timestamp());
        assert_eq!(json["exp"], t0().timestamp() + 60);
    }
}
