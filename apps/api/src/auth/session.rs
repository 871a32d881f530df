//! In-memory page sessions. Nothing is persisted; a restart signs everyone out.
//! Sessions idle for longer than the store's TTL are dropped.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

use crate::candidates::model::CandidateRecord;
use crate::candidates::sort::SortDirection;
use crate::errors::AppError;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "rr_session";

/// View state of one signed-in user.
#[derive(Debug, Clone)]
pub struct Session {
    pub username: String,
    pub candidates: Vec<CandidateRecord>,
    pub selected: Option<String>,
    pub sort_direction: SortDirection,
    last_seen: Instant,
}

impl Session {
    fn new(username: String) -> Self {
        Self {
            username,
            candidates: Vec::new(),
            selected: None,
            sort_direction: SortDirection::default(),
            last_seen: Instant::now(),
        }
    }

    fn is_expired(&self, idle_ttl: Duration) -> bool {
        self.last_seen.elapsed() > idle_ttl
    }
}

/// Display name shown in the header: the part of the username before '@'.
pub fn display_name(username: &str) -> &str {
    username.split('@').next().unwrap_or(username)
}

#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, Session>>>,
    idle_ttl: Duration,
}

impl SessionStore {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            inner: Arc::default(),
            idle_ttl,
        }
    }

    /// Opens a session, dropping every expired one first.
    pub async fn create(&self, username: String) -> Uuid {
        let id = Uuid::new_v4();
        let mut sessions = self.inner.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired(self.idle_ttl));
        if sessions.len() < before {
            debug!("Evicted {} idle session(s)", before - sessions.len());
        }
        sessions.insert(id, Session::new(username));
        id
    }

    pub async fn get(&self, id: Uuid) -> Option<Session> {
        self.update(id, |s| s.clone()).await
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        self.inner.write().await.remove(&id).is_some()
    }

    /// Applies `f` to a live session under the write lock and marks it as
    /// seen. An expired session is removed and `f` is not called. `f` must not await.
    pub async fn update<R>(&self, id: Uuid, f: impl FnOnce(&mut Session) -> R) -> Option<R> {
        let mut sessions = self.inner.write().await;
        if sessions.get(&id)?.is_expired(self.idle_ttl) {
            sessions.remove(&id);
            return None;
        }
        let session = sessions.get_mut(&id)?;
        session.last_seen = Instant::now();
        Some(f(session))
    }
}

/// The caller's session, from `Authorization: Bearer <id>` or the `rr_session` cookie.
#[derive(Debug, Clone)]
pub struct CurrentSession {
    pub id: Uuid,
    pub username: String,
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
}

fn session_cookie(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value)
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let raw = bearer_token(parts)
            .or_else(|| session_cookie(parts))
            .ok_or(AppError::Unauthorized)?;
        let id = Uuid::parse_str(raw).map_err(|_| AppError::Unauthorized)?;
        let session = state.sessions.get(id).await.ok_or(AppError::Unauthorized)?;

        Ok(CurrentSession {
            id,
            username: session.username,
        })
    }
}
