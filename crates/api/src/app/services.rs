use std::sync::Arc;

use scriptorium_auth::TokenIssuer;
use scriptorium_infra::InMemoryStore;

/// Shared handler state.
pub struct AppServices {
    pub store: Arc<InMemoryStore>,
    pub issuer: TokenIssuer,
}

impl AppServices {
    pub fn new(store: Arc<InMemoryStore>, issuer: TokenIssuer) -> Self {
        Self { store, issuer }
    }
}
