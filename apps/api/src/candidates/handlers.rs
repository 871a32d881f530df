//! Axum route handlers for the session's candidate list.

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use tracing::warn;

use crate::auth::session::{CurrentSession, Session};
use crate::candidates::display::CandidateSummary;
use crate::candidates::model::CandidateRecord;
use crate::candidates::pdf::{decode_pdf, pdf_data_uri, strip_embedded_pdfs};
use crate::candidates::sort::{sort_candidates, SortDirection};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CandidateListResponse {
    pub sort_direction: SortDirection,
    pub selected: Option<String>,
    pub results: Vec<CandidateSummary>,
}

/// Everything the detail pane shows for one candidate.
#[derive(Debug, Serialize)]
pub struct CandidateDetail {
    pub summary: CandidateSummary,
    /// Embedded PDFs in `record.raw` are replaced by a placeholder; the
    /// document itself is only sent through `document_data_uri`.
    pub record: CandidateRecord,
    /// Only set when a real profile link was provided.
    pub linkedin_url: Option<String>,
    /// Where the browser can fetch the decoded PDF, when the result carried one.
    pub document_url: Option<String>,
    /// The same PDF inline, for embedding without a second request.
    pub document_data_uri: Option<String>,
}

impl From<&CandidateRecord> for CandidateDetail {
    fn from(record: &CandidateRecord) -> Self {
        let mut stripped = record.clone();
        strip_embedded_pdfs(&mut stripped.raw);

        Self {
            summary: CandidateSummary::from(record),
            linkedin_url: record.contact_info.linkedin_url().map(str::to_string),
            document_url: record
                .has_document()
                .then(|| format!("/api/v1/candidates/{}/document", record.id)),
            document_data_uri: record.document.as_deref().map(pdf_data_uri),
            record: stripped,
        }
    }
}

fn list_response(session: &Session) -> CandidateListResponse {
    CandidateListResponse {
        sort_direction: session.sort_direction,
        selected: session.selected.clone(),
        results: session.candidates.iter().map(CandidateSummary::from).collect(),
    }
}

async fn load_session(state: &AppState, session: &CurrentSession) -> Result<Session, AppError> {
    state
        .sessions
        .get(session.id)
        .await
        .ok_or(AppError::Unauthorized)
}

/// GET /api/v1/candidates
pub async fn handle_list_candidates(
    State(state): State<AppState>,
    session: CurrentSession,
) -> Result<Json<CandidateListResponse>, AppError> {
    let current = load_session(&state, &session).await?;
    Ok(Json(list_response(&current)))
}

/// POST /api/v1/candidates/sort
///
/// Flips the sort direction and reorders the list by match percentage.
pub async fn handle_toggle_sort(
    State(state): State<AppState>,
    session: CurrentSession,
) -> Result<Json<CandidateListResponse>, AppError> {
    let response = state
        .sessions
        .update(session.id, |s| {
            s.sort_direction = s.sort_direction.toggle();
            sort_candidates(&mut s.candidates, s.sort_direction);
            list_response(s)
        })
        .await
        .ok_or(AppError::Unauthorized)?;

    Ok(Json(response))
}

/// GET /api/v1/candidates/:id
///
/// Returns the candidate's detail and makes it the selected one.
pub async fn handle_get_candidate(
    State(state): State<AppState>,
    session: CurrentSession,
    Path(id): Path<String>,
) -> Result<Json<CandidateDetail>, AppError> {
    let detail = state
        .sessions
        .update(session.id, |s| {
            let detail = s
                .candidates
                .iter()
                .find(|c| c.id == id)
                .map(CandidateDetail::from);
            if detail.is_some() {
                s.selected = Some(id.clone());
            }
            detail
        })
        .await
        .ok_or(AppError::Unauthorized)?
        .ok_or_else(|| AppError::NotFound(format!("Candidate {id} not found")))?;

    Ok(Json(detail))
}

/// GET /api/v1/candidates/:id/document
///
/// Serves the candidate's embedded resume as `application/pdf`.
pub async fn handle_get_document(
    State(state): State<AppState>,
    session: CurrentSession,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let current = load_session(&state, &session).await?;
    let candidate = current
        .candidates
        .iter()
        .find(|c| c.id == id)
        .ok_or_else(|| AppError::NotFound(format!("Candidate {id} not found")))?;

    let no_document = || AppError::NotFound("No PDF document available".to_string());
    let encoded = candidate.document.as_deref().ok_or_else(no_document)?;
    let bytes = decode_pdf(encoded).map_err(|e| {
        warn!("Embedded document for candidate {id} could not be decoded: {e}");
        no_document()
    })?;

    let disposition = format!(
        "inline; filename=\"{}\"",
        candidate.metadata.filename.replace('"', "")
    );
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}
