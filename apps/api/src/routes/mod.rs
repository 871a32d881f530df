pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::auth::handlers as auth;
use crate::candidates::handlers as candidates;
use crate::search::handlers as search;
use crate::state::AppState;
use crate::upload;

/// Resumes can exceed axum's 2 MB default.
const UPLOAD_BODY_LIMIT: usize = 25 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Sign-in and sessions
        .route("/auth/login", get(auth::handle_login))
        .route("/auth/session", post(auth::handle_create_session))
        .route("/auth/logout", post(auth::handle_logout))
        .route("/api/v1/me", get(auth::handle_me))
        // Upload
        .route(
            "/api/v1/resumes",
            post(upload::handle_upload).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        // Search
        .route("/api/v1/search", post(search::handle_role_search))
        .route(
            "/api/v1/candidates/search",
            post(search::handle_candidate_search),
        )
        // Session candidate list
        .route("/api/v1/candidates", get(candidates::handle_list_candidates))
        .route("/api/v1/candidates/sort", post(candidates::handle_toggle_sort))
        .route("/api/v1/candidates/:id", get(candidates::handle_get_candidate))
        .route(
            "/api/v1/candidates/:id/document",
            get(candidates::handle_get_document),
        )
        .with_state(state)
}
