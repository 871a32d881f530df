/// Matching client: the single point of entry for calls to the upload and
/// resume-matching services.
///
/// No other module talks to those services directly. Requests are sent once:
/// failures are returned to the caller and never retried.
use std::time::Duration;

use reqwest::{multipart, Client};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

pub mod types;

pub use types::{
    CollectionName, PersonDetailsResponse, PersonResult, RawMatch, SearchMatchesResponse,
    SearchRequest, UploadFile,
};

const UPLOAD_PATH: &str = "/upload";
const PERSON_DETAILS_PATH: &str = "/person_details";
const SEARCH_MATCHES_PATH: &str = "/search_matches";

#[derive(Debug, Error)]
pub enum MatchingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Clone)]
pub struct MatchingClient {
    client: Client,
    upload_base: String,
    matching_base: String,
}

impl MatchingClient {
    pub fn new(
        upload_base: &str,
        matching_base: &str,
        timeout: Duration,
    ) -> Result<Self, MatchingError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            upload_base: upload_base.trim_end_matches('/').to_string(),
            matching_base: matching_base.trim_end_matches('/').to_string(),
        })
    }

    /// Uploads resume files in one multipart request, every file under the
    /// `document` field. Returns `Ok(None)` without touching the network when
    /// there is nothing to upload.
    pub async fn upload(
        &self,
        token: &str,
        files: Vec<UploadFile>,
        username: &str,
        category: &str,
    ) -> Result<Option<Value>, MatchingError> {
        if files.is_empty() {
            return Ok(None);
        }

        let url = format!("{}{}", self.upload_base, UPLOAD_PATH);
        debug!(
            "Uploading {} file(s) to {} for user {}",
            files.len(),
            url,
            username
        );

        let mut form = multipart::Form::new();
        for file in files {
            let mut part = multipart::Part::bytes(file.bytes.to_vec()).file_name(file.filename);
            if let Some(content_type) = file.content_type {
                part = part.mime_str(&content_type)?;
            }
            form = form.part("document", part);
        }
        let form = form
            .text("username", username.to_string())
            .text("category", category.to_string());

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;

        let body = read_success_body(response, &url).await?;
        let data: Value = serde_json::from_str(&body)?;
        Ok(Some(data))
    }

    /// `POST /person_details`: per-person analysis for a search prompt.
    pub async fn person_details(
        &self,
        token: &str,
        request: &SearchRequest,
    ) -> Result<PersonDetailsResponse, MatchingError> {
        self.post_json(PERSON_DETAILS_PATH, token, request).await
    }

    /// `POST /search_matches`: similarity matches with extracted resume info.
    pub async fn search_matches(
        &self,
        token: &str,
        request: &SearchRequest,
    ) -> Result<SearchMatchesResponse, MatchingError> {
        self.post_json(SEARCH_MATCHES_PATH, token, request).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &str,
        request: &SearchRequest,
    ) -> Result<T, MatchingError> {
        let url = format!("{}{}", self.matching_base, path);
        debug!(
            "POST {} (num_results={}, threshold={})",
            url, request.num_results, request.similarity_threshold
        );

        let response = self
            .client
            .post(&url)
            .header("accept", "application/json")
            .bearer_auth(token)
            .json(request)
            .send()
            .await?;

        let body = read_success_body(response, &url).await?;
        serde_json::from_str(&body).map_err(|e| {
            error!("Unparseable response from {url}: {e}");
            MatchingError::Parse(e)
        })
    }
}

/// Reads the body as text, turning any non-2xx status into `MatchingError::Api`.
async fn read_success_body(response: reqwest::Response, url: &str) -> Result<String, MatchingError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        error!("{url} returned {status}: {body}");
        return Err(MatchingError::Api {
            status: status.as_u16(),
            body,
        });
    }

    Ok(body)
}
