use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Extension, Path, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::Utc;

use scriptorium_auth::{NewUser, Subject, UserAction, UserChanges, hash_password, validate_password};
use scriptorium_core::SubjectId;
use scriptorium_infra::UserStore;

use crate::app::dto;
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::guard;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/me", get(read_me))
        .route("/search", get(search_users))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

/// Argon2 hashing off the async executor.
async fn hash_off_thread(password: String) -> Result<String, ApiError> {
    validate_password(&password)?;
    Ok(tokio::task::spawn_blocking(move || hash_password(&password)).await??)
}

pub async fn read_me(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(subject): Extension<Subject>,
) -> Result<Response, ApiError> {
    guard::guard_user(&subject, UserAction::ReadSelf)?;

    // The account may have been deleted after the token was issued.
    let account = services
        .store
        .get_user(subject.id)
        .map_err(|e| ApiError::store(e, "user"))?;

    Ok((StatusCode::OK, Json(account)).into_response())
}

pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(subject): Extension<Subject>,
    query: Result<Query<dto::PageQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    guard::guard_user(&subject, UserAction::List)?;
    let Query(query) = query?;

    let items = services
        .store
        .list_users(query.page()?)
        .map_err(|e| ApiError::store(e, "user"))?;

    Ok((StatusCode::OK, Json(items)).into_response())
}

pub async fn search_users(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(subject): Extension<Subject>,
    query: Result<Query<dto::SearchQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    guard::guard_user(&subject, UserAction::Search)?;
    let Query(query) = query?;
    let (q, page) = query.parts()?;

    let items = services
        .store
        .search_users(q, page)
        .map_err(|e| ApiError::store(e, "user"))?;

    Ok((StatusCode::OK, Json(items)).into_response())
}

pub async fn get_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(subject): Extension<Subject>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    guard::guard_user(&subject, UserAction::Read)?;
    let id: SubjectId = dto::parse_id(&id)?;

    let account = services
        .store
        .get_user(id)
        .map_err(|e| ApiError::store(e, "user"))?;

    Ok((StatusCode::OK, Json(account)).into_response())
}

pub async fn create_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(subject): Extension<Subject>,
    body: Result<Json<dto::CreateUserRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    guard::guard_user(&subject, UserAction::Create)?;
    let Json(body) = body?;

    let password_hash = hash_off_thread(body.password).await?;
    let user = NewUser::new(&body.username, &body.email, password_hash, body.role, body.is_active)?;

    let account = services
        .store
        .create_user(user, Utc::now())
        .map_err(|e| ApiError::store(e, "user"))?;

    tracing::info!(user_id = %account.id, role = %account.role, created_by = %subject.id, "user created");
    Ok((StatusCode::CREATED, Json(account)).into_response())
}

pub async fn update_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(subject): Extension<Subject>,
    Path(id): Path<String>,
    body: Result<Json<dto::UpdateUserRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    guard::guard_user(&subject, UserAction::Update)?;
    let id: SubjectId = dto::parse_id(&id)?;
    let Json(body) = body?;

    // Unknown accounts are rejected before paying for a password hash.
    services
        .store
        .get_user(id)
        .map_err(|e| ApiError::store(e, "user"))?;

    let password_hash = match body.password {
        Some(password) => Some(hash_off_thread(password).await?),
        None => None,
    };

    let changes = UserChanges {
        username: body.username,
        email: body.email,
        role: body.role,
        is_active: body.is_active,
        password_hash,
    }
    .normalized()?;

    let account = services
        .store
        .update_user(id, changes)
        .map_err(|e| ApiError::store(e, "user"))?;

    tracing::info!(user_id = %account.id, role = %account.role, updated_by = %subject.id, "user updated");
    Ok((StatusCode::OK, Json(account)).into_response())
}

pub async fn delete_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(subject): Extension<Subject>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    guard::guard_user(&subject, UserAction::Delete)?;
    let id: SubjectId = dto::parse_id(&id)?;

    let articles_removed = services
        .store
        .delete_user(id)
        .map_err(|e| ApiError::store(e, "user"))?;

    tracing::info!(user_id = %id, articles_removed, deleted_by = %subject.id, "user deleted");
    Ok(StatusCode::NO_CONTENT.into_response())
}
