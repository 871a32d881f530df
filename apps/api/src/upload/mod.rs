//! Resume upload: accepts files from the browser and forwards them to the
//! upload service in a single multipart request.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::auth::session::CurrentSession;
use crate::errors::AppError;
use crate::matching_client::UploadFile;
use crate::state::AppState;

pub const DOCUMENT_FIELD: &str = "document";
pub const UPLOAD_CATEGORY: &str = "resumes";
const ACCEPTED_EXTENSIONS: &[&str] = &["pdf", "docx"];

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub uploaded: usize,
    pub message: String,
    /// Whatever the upload service returned; absent when nothing was sent.
    pub backend: Option<Value>,
}

/// True when the filename ends in one of the accepted resume extensions.
pub fn is_accepted_resume(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ACCEPTED_EXTENSIONS.iter().any(|a| ext.eq_ignore_ascii_case(a)))
        .unwrap_or(false)
}

/// Collects every `document` part of the form. Other fields are ignored.
async fn collect_documents(mut multipart: Multipart) -> Result<Vec<UploadFile>, AppError> {
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(DOCUMENT_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        if !is_accepted_resume(&filename) {
            return Err(AppError::Validation(format!(
                "Unsupported file '{filename}': only .pdf and .docx resumes are accepted"
            )));
        }
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read '{filename}': {e}")))?;

        files.push(UploadFile {
            filename,
            content_type,
            bytes,
        });
    }

    Ok(files)
}

/// POST /api/v1/resumes
///
/// Uploading zero files is a no-op: nothing is sent to the upload service.
pub async fn handle_upload(
    State(state): State<AppState>,
    session: CurrentSession,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let files = collect_documents(multipart).await?;
    let count = files.len();
    if count == 0 {
        return Ok(Json(UploadResponse {
            uploaded: 0,
            message: "No files selected".to_string(),
            backend: None,
        }));
    }

    let token = state.tokens.access_token().await?;
    let backend = state
        .matching
        .upload(&token, files, &session.username, UPLOAD_CATEGORY)
        .await?;
    info!("Uploaded {count} resume(s) for {}", session.username);

    Ok(Json(UploadResponse {
        uploaded: count,
        message: "Upload completed successfully".to_string(),
        backend,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepted_extensions() {
        assert!(is_accepted_resume("jane.pdf"));
        assert!(is_accepted_resume("JANE.PDF"));
        assert!(is_accepted_resume("cv.final.docx"));
    }

    #[test]
    fn test_rejected_extensions() {
        assert!(!is_accepted_resume("notes.txt"));
        assert!(!is_accepted_resume("pdf"));
        assert!(!is_accepted_resume(""));
    }
}
