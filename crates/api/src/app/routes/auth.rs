use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;

use scriptorium_infra::{IdentityStore, StoreError};

use crate::app::dto;
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

/// Exchange username/password for an access token.
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::LoginRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body?;

    // Password verification is CPU-bound.
    let store = services.store.clone();
    let username = body.username.clone();
    let account = tokio::task::spawn_blocking(move || {
        store.find_by_credentials(&body.username, &body.password)
    })
    .await?
    .map_err(|e| match e {
        StoreError::NotFound => ApiError::InvalidCredentials,
        other => ApiError::store(other, "user"),
    })
    .inspect_err(|_| tracing::info!(username = %username, "login rejected"))?;

    let token = services
        .issuer
        .issue(&account.subject(), &account.username, Utc::now())?;

    tracing::info!(user_id = %account.id, role = %account.role, "login succeeded");
    Ok((StatusCode::OK, Json(dto::token_to_json(token, services.issuer.ttl()))).into_response())
}
