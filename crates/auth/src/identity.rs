//! Identity resolution: `Authorization` header → [`Subject`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::{JwtValidator, Subject, TokenError};

/// No valid identity could be established for the request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Unauthenticated {
    #[error("missing credentials")]
    MissingCredential,

    #[error("authorization header is not a bearer token")]
    MalformedHeader,

    #[error("invalid token: {0}")]
    InvalidToken(#[from] TokenError),
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: Option<&str>) -> Result<&str, Unauthenticated> {
    let header = header.ok_or(Unauthenticated::MissingCredential)?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(Unauthenticated::MalformedHeader)?
        .trim();

    if token.is_empty() {
        return Err(Unauthenticated::MalformedHeader);
    }

    Ok(token)
}

/// Resolves the acting subject from a bearer credential.
///
/// The role is taken from the verified claim as-is; storage is never
/// consulted here.
#[derive(Clone)]
pub struct IdentityResolver {
    validator: Arc<dyn JwtValidator>,
}

impl IdentityResolver {
    pub fn new(validator: Arc<dyn JwtValidator>) -> Self {
        Self { validator }
    }

    pub fn resolve(
        &self,
        authorization: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Subject, Unauthenticated> {
        let token = bearer_token(authorization)?;
        let claims = self.validator.validate(token, now).inspect_err(|e| {
            tracing::debug!(error = %e, "bearer token rejected");
        })?;
        Ok(claims.subject())
    }
}
