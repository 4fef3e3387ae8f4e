use axum::Router;

pub mod articles;
pub mod auth;
pub mod system;
pub mod users;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/articles", articles::router())
        .nest("/users", users::router())
}
