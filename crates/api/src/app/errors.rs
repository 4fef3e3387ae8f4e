use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use scriptorium_auth::{DenyReason, Forbidden, PasswordError, TokenError, Unauthenticated};
use scriptorium_core::DomainError;
use scriptorium_infra::StoreError;

use crate::guard::GuardError;

/// Every way a request can fail, mapped onto one JSON error shape.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Unauthenticated(#[from] Unauthenticated),

    #[error("Incorrect username or password")]
    InvalidCredentials,

    #[error(transparent)]
    Forbidden(#[from] Forbidden),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    InvalidId(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Map a storage failure, naming the missing resource on `NotFound`.
    pub fn store(err: StoreError, resource: &'static str) -> Self {
        match err {
            StoreError::NotFound => ApiError::NotFound(resource),
            StoreError::Conflict(msg) => ApiError::Conflict(msg),
            StoreError::Unavailable(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => ApiError::Validation(msg),
            DomainError::InvalidId(msg) => ApiError::InvalidId(msg),
        }
    }
}

impl From<GuardError> for ApiError {
    fn from(err: GuardError) -> Self {
        match err {
            GuardError::NotFound(resource) => ApiError::NotFound(resource),
            GuardError::Forbidden(f) => ApiError::Forbidden(f),
            GuardError::Invalid(e) => e.into(),
            GuardError::Store(e) => ApiError::store(e, "resource"),
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(err: JsonRejection) -> Self {
        ApiError::Validation(err.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(err: QueryRejection) -> Self {
        ApiError::Validation(err.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Unauthenticated(e) => {
                let mut res = json_error(StatusCode::UNAUTHORIZED, "unauthenticated", e.to_string());
                res.headers_mut()
                    .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
                res
            }
            ApiError::InvalidCredentials => {
                let mut res = json_error(
                    StatusCode::UNAUTHORIZED,
                    "invalid_credentials",
                    "Incorrect username or password",
                );
                res.headers_mut()
                    .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
                res
            }
            ApiError::Forbidden(Forbidden { reason }) => forbidden(reason),
            ApiError::NotFound(resource) => {
                json_error(StatusCode::NOT_FOUND, "not_found", format!("{resource} not found"))
            }
            ApiError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
            ApiError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
            ApiError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "request failed");
                json_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "internal server error",
                )
            }
        }
    }
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

fn forbidden(reason: DenyReason) -> Response {
    (
        StatusCode::FORBIDDEN,
        axum::Json(json!({
            "error": "forbidden",
            "message": reason.message(),
            "reason": reason.as_str(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_kind() {
        let cases = [
            (ApiError::Unauthenticated(Unauthenticated::MissingCredential), StatusCode::UNAUTHORIZED),
            (ApiError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (
                ApiError::Forbidden(Forbidden { reason: DenyReason::NotOwner }),
                StatusCode::FORBIDDEN,
            ),
            (ApiError::NotFound("article"), StatusCode::NOT_FOUND),
            (ApiError::Conflict("taken".into()), StatusCode::CONFLICT),
            (ApiError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (ApiError::InvalidId("bad".into()), StatusCode::BAD_REQUEST),
            (ApiError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn domain_errors_are_client_errors() {
        let validation: ApiError = DomainError::validation("title cannot be empty").into();
        assert_eq!(validation.into_response().status(), StatusCode::BAD_REQUEST);

        let invalid_id: ApiError = GuardError::Invalid(DomainError::invalid_id("abc")).into();
        assert!(matches!(invalid_id, ApiError::InvalidId(_)));
    }

    #[test]
    fn unauthenticated_carries_bearer_challenge() {
        let res = ApiError::Unauthenticated(Unauthenticated::MalformedHeader).into_response();
        assert_eq!(res.headers()[header::WWW_AUTHENTICATE], "Bearer");
    }

    #[test]
    fn store_errors_name_the_missing_resource() {
        assert!(matches!(
            ApiError::store(StoreError::NotFound, "user"),
            ApiError::NotFound("user")
        ));
        assert!(matches!(
            ApiError::store(StoreError::Conflict("dup".into()), "user"),
            ApiError::Conflict(_)
        ));
    }
}
