//! Tracing/logging initialization.
//!
//! JSON lines on stdout, filtered through `RUST_LOG` (default `info`).

use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Initialize tracing/logging for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}

/// Time-ordered correlation id for a single request.
pub fn new_request_id() -> Uuid {
    Uuid::now_v7()
}

/// Span wrapping one HTTP request. Guards and handlers log inside it, so
/// every decision carries the request id.
pub fn request_span(method: &str, path: &str) -> ::tracing::Span {
    ::tracing::info_span!(
        "request",
        request_id = %new_request_id(),
        method = %method,
        path = %path,
    )
}
