//! Axum route handlers for sign-in, sessions, and sign-out.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{AppendHeaders, IntoResponse},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::session::{display_name, CurrentSession, SESSION_COOKIE};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    #[serde(default)]
    pub signup: bool,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub authorize_url: String,
    pub state: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_token: Uuid,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub username: String,
    pub display_name: String,
}

/// GET /auth/login
///
/// Returns the identity-provider URL the browser should open for sign-in
/// (or account creation with `?signup=true`).
pub async fn handle_login(
    State(state): State<AppState>,
    Query(query): Query<LoginQuery>,
) -> Result<Json<LoginResponse>, AppError> {
    let login_state = Uuid::new_v4().to_string();
    let url = state.identity.authorize_url(&login_state, query.signup)?;
    Ok(Json(LoginResponse {
        authorize_url: url.to_string(),
        state: login_state,
    }))
}

/// POST /auth/session
///
/// Opens a page session for a username the identity provider has signed in.
pub async fn handle_create_session(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let username = request.username.trim().to_string();
    if username.is_empty() {
        return Err(AppError::Validation("username cannot be empty".to_string()));
    }

    let id = state.sessions.create(username.clone()).await;
    info!("Session opened for {username}");

    let cookie = format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax");
    Ok((
        StatusCode::CREATED,
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(SessionResponse {
            session_token: id,
            username,
        }),
    ))
}

/// POST /auth/logout
pub async fn handle_logout(
    State(state): State<AppState>,
    session: CurrentSession,
) -> impl IntoResponse {
    state.sessions.remove(session.id).await;
    info!("Session closed for {}", session.username);

    let cookie = format!("{SESSION_COOKIE}=; Path=/; HttpOnly; Max-Age=0");
    (StatusCode::NO_CONTENT, AppendHeaders([(header::SET_COOKIE, cookie)]))
}

/// GET /api/v1/me
pub async fn handle_me(session: CurrentSession) -> Json<MeResponse> {
    let display_name = display_name(&session.username).to_string();
    Json(MeResponse {
        username: session.username,
        display_name,
    })
}
