use axum::{
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::Instrument;

use scriptorium_auth::{IdentityResolver, Unauthenticated};

use crate::app::errors::ApiError;

#[derive(Clone)]
pub struct AuthState {
    pub resolver: IdentityResolver,
}

/// Resolve the bearer credential and attach the [`scriptorium_auth::Subject`]
/// to the request. Rejected requests never reach a handler.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .map(|value| value.to_str())
        .transpose()
        .map_err(|_| Unauthenticated::MalformedHeader)?;

    let subject = state.resolver.resolve(authorization, Utc::now())?;

    req.extensions_mut().insert(subject);
    Ok(next.run(req).await)
}

/// Run the request inside a span carrying a fresh request id.
pub async fn trace_request(req: Request<axum::body::Body>, next: Next) -> Response {
    let span = scriptorium_observability::request_span(req.method().as_str(), req.uri().path());

    async move {
        let response = next.run(req).await;
        tracing::info!(status = response.status().as_u16(), "request completed");
        response
    }
    .instrument(span)
    .await
}
