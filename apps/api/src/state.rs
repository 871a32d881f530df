use std::sync::Arc;

use crate::auth::identity::IdentityProvider;
use crate::auth::session::SessionStore;
use crate::auth::TokenProvider;
use crate::config::Config;
use crate::matching_client::MatchingClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub matching: MatchingClient,
    /// Bearer tokens for the backend services. Default: `StaticTokenProvider`.
    pub tokens: Arc<dyn TokenProvider>,
    pub identity: IdentityProvider,
    pub sessions: SessionStore,
}
