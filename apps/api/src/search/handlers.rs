//! Axum route handlers for the two search views.

use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::session::CurrentSession;
use crate::candidates::display::CandidateSummary;
use crate::candidates::handlers::CandidateDetail;
use crate::candidates::model::MatchedCandidate;
use crate::candidates::normalize::{normalize_match, normalize_people};
use crate::candidates::sort::SortDirection;
use crate::errors::AppError;
use crate::matching_client::CollectionName;
use crate::search::prompt::{
    build_request, construct_search_prompt, require_prompt, ANALYSIS_NUM_RESULTS,
    CANDIDATE_SEARCH_NUM_RESULTS,
};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RoleSearchRequest {
    pub role: String,
    #[serde(default)]
    pub additional_info: String,
    pub similarity_threshold: Option<f64>,
    pub num_results: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct RoleSearchResponse {
    pub total: usize,
    pub sort_direction: SortDirection,
    pub results: Vec<CandidateSummary>,
    /// The first result, preselected for the detail pane.
    pub selected: Option<CandidateDetail>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateSearchRequest {
    pub search_prompt: String,
    pub similarity_threshold: Option<f64>,
    pub num_results: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct CandidateSearchResponse {
    pub total_matches: u64,
    /// Notice shown to the user.
    pub message: String,
    /// Message from the matching service, when it sent one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend_message: Option<String>,
    pub matches: Vec<MatchedCandidate>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/search
///
/// Role + additional-info search against `/person_details`. The normalized
/// results replace the session's candidate list.
pub async fn handle_role_search(
    State(state): State<AppState>,
    session: CurrentSession,
    Json(request): Json<RoleSearchRequest>,
) -> Result<Json<RoleSearchResponse>, AppError> {
    let prompt = construct_search_prompt(&request.role, &request.additional_info)?;

    let search = build_request(
        prompt,
        CollectionName::Many(vec![state.config.default_collection.clone()]),
        request.similarity_threshold,
        request.num_results,
        ANALYSIS_NUM_RESULTS,
        &session.username,
    );

    let token = state.tokens.access_token().await?;
    let response = state.matching.person_details(&token, &search).await?;

    let records = normalize_people(
        &response.multiple_people_results,
        Utc::now().timestamp_millis(),
    );
    info!(
        "Role search for {} returned {} candidate(s)",
        session.username,
        records.len()
    );

    let results: Vec<CandidateSummary> = records.iter().map(CandidateSummary::from).collect();
    let selected = records.first().map(CandidateDetail::from);
    let total = records.len();

    let sort_direction = state
        .sessions
        .update(session.id, move |s| {
            s.selected = records.first().map(|r| r.id.clone());
            s.candidates = records;
            s.sort_direction
        })
        .await
        .ok_or(AppError::Unauthorized)?;

    Ok(Json(RoleSearchResponse {
        total,
        sort_direction,
        results,
        selected,
    }))
}

/// POST /api/v1/candidates/search
///
/// Free-form prompt search against `/search_matches`.
pub async fn handle_candidate_search(
    State(state): State<AppState>,
    session: CurrentSession,
    Json(request): Json<CandidateSearchRequest>,
) -> Result<Json<CandidateSearchResponse>, AppError> {
    let prompt = require_prompt(&request.search_prompt)?;

    let search = build_request(
        prompt,
        CollectionName::One(state.config.default_collection.clone()),
        request.similarity_threshold,
        request.num_results,
        CANDIDATE_SEARCH_NUM_RESULTS,
        &session.username,
    );

    let token = state.tokens.access_token().await?;
    let response = state.matching.search_matches(&token, &search).await?;
    info!(
        "Candidate search for {} found {} match(es)",
        session.username, response.total_matches
    );

    Ok(Json(CandidateSearchResponse {
        total_matches: response.total_matches,
        message: format!("Found {} matching candidates", response.total_matches),
        backend_message: response.message.filter(|m| !m.trim().is_empty()),
        matches: response.matches.iter().map(normalize_match).collect(),
    }))
}
