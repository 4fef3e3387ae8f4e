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

use scriptorium_articles::ArticlePatch;
use scriptorium_auth::{ArticleAction, Subject};
use scriptorium_core::ArticleId;
use scriptorium_infra::ArticleStore;

use crate::app::dto;
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::guard;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_articles).post(create_article))
        .route("/search", get(search_articles))
        .route(
            "/:id",
            get(get_article).put(update_article).delete(delete_article),
        )
}

pub async fn list_articles(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(subject): Extension<Subject>,
    query: Result<Query<dto::PageQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    guard::guard_article_collection(&subject, ArticleAction::List)?;
    let Query(query) = query?;

    let items = services
        .store
        .list_articles(query.page()?)
        .map_err(|e| ApiError::store(e, "article"))?;

    Ok((StatusCode::OK, Json(items)).into_response())
}

pub async fn search_articles(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(subject): Extension<Subject>,
    query: Result<Query<dto::SearchQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    guard::guard_article_collection(&subject, ArticleAction::Search)?;
    let Query(query) = query?;
    let (q, page) = query.parts()?;

    let items = services
        .store
        .search_articles(q, page)
        .map_err(|e| ApiError::store(e, "article"))?;

    Ok((StatusCode::OK, Json(items)).into_response())
}

pub async fn get_article(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(subject): Extension<Subject>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id: ArticleId = dto::parse_id(&id)?;
    guard::guard_article_item(&services.store, &subject, ArticleAction::Read, id)?;

    let article = services
        .store
        .get_article(id)
        .map_err(|e| ApiError::store(e, "article"))?;

    Ok((StatusCode::OK, Json(article)).into_response())
}

pub async fn create_article(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(subject): Extension<Subject>,
    body: Result<Json<dto::CreateArticleRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body?;
    let draft = guard::draft_article(&subject, &body.title, &body.content)?;

    let article = services
        .store
        .create_article(draft, Utc::now())
        .map_err(|e| ApiError::store(e, "article"))?;

    tracing::info!(article_id = %article.id, owner_id = %article.owner_id, "article created");
    Ok((StatusCode::CREATED, Json(article)).into_response())
}

pub async fn update_article(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(subject): Extension<Subject>,
    Path(id): Path<String>,
    body: Result<Json<dto::UpdateArticleRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let id: ArticleId = dto::parse_id(&id)?;
    guard::guard_article_item(&services.store, &subject, ArticleAction::Update, id)?;

    let Json(body) = body?;
    let patch = ArticlePatch::new(body.title.as_deref(), body.content.as_deref())?;

    // The article may have been deleted since the guard ran; that is a 404.
    let article = services
        .store
        .update_article(id, patch, Utc::now())
        .map_err(|e| ApiError::store(e, "article"))?;

    Ok((StatusCode::OK, Json(article)).into_response())
}

pub async fn delete_article(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(subject): Extension<Subject>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id: ArticleId = dto::parse_id(&id)?;
    guard::guard_article_item(&services.store, &subject, ArticleAction::Delete, id)?;

    services
        .store
        .delete_article(id)
        .map_err(|e| ApiError::store(e, "article"))?;

    tracing::info!(article_id = %id, deleted_by = %subject.id, "article deleted");
    Ok(StatusCode::NO_CONTENT.into_response())
}
