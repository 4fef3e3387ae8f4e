//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: shared state handed to handlers
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: request/response DTOs and parsing helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{
    Extension, Router,
    routing::{get, post},
};
use tower::ServiceBuilder;

use scriptorium_auth::{Hs256JwtValidator, IdentityResolver, TokenIssuer};
use scriptorium_infra::InMemoryStore;

use crate::{ApiConfig, middleware};

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
pub fn build_app(config: &ApiConfig, store: Arc<InMemoryStore>) -> Router {
    let secret = config.jwt_secret.as_bytes();

    let validator = Arc::new(Hs256JwtValidator::new(secret.to_vec()));
    let auth_state = middleware::AuthState {
        resolver: IdentityResolver::new(validator),
    };

    let issuer = TokenIssuer::new(secret, config.token_ttl());
    let services = Arc::new(services::AppServices::new(store, issuer));

    // Protected routes: a resolved Subject is present in every handler.
    let protected = routes::router().layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::auth_middleware,
    ));

    Router::new()
        .route("/health", get(routes::system::health))
        .route("/auth/login", post(routes::auth::login))
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::trace_request))
                .layer(Extension(services)),
        )
}
