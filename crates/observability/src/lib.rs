//! Tracing and logging setup shared by the binaries.

/// Initialize process-wide logging.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Subscriber configuration and request spans.
pub mod tracing;

pub use self::tracing::{new_request_id, request_span};
