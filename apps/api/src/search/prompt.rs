//! Search prompt construction and request defaults.

use crate::errors::AppError;
use crate::matching_client::{CollectionName, SearchRequest};

pub const ANALYSIS_NUM_RESULTS: u32 = 3;
pub const CANDIDATE_SEARCH_NUM_RESULTS: u32 = 20;
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.7;
pub const MAX_NUM_RESULTS: u32 = 50;

/// Builds the natural-language prompt for a role search.
/// An empty role is rejected before anything is sent.
pub fn construct_search_prompt(role: &str, additional_info: &str) -> Result<String, AppError> {
    let role = role.trim();
    if role.is_empty() {
        return Err(AppError::Validation("Please enter a Job role.".to_string()));
    }

    let mut prompt = format!("Find me a: {role}");
    let additional_info = additional_info.trim();
    if !additional_info.is_empty() {
        prompt.push_str(&format!(
            ". Additionally, ensure the candidate meets these minimum requirements: {additional_info}. \
             If these requirements are not met, do not include the candidate in the results. \
             If a candidate doesnt have a realistic alphabetic name, exclude them."
        ));
    }
    Ok(prompt)
}

/// Rejects a blank free-form prompt before anything is sent.
pub fn require_prompt(prompt: &str) -> Result<String, AppError> {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(AppError::Validation(
            "Please enter a search prompt".to_string(),
        ));
    }
    Ok(prompt.to_string())
}

/// Assembles a matching request, clamping threshold to [0, 1] and count to [1, 50].
pub fn build_request(
    search_prompt: String,
    collection_name: CollectionName,
    similarity_threshold: Option<f64>,
    num_results: Option<u32>,
    default_num_results: u32,
    username: &str,
) -> SearchRequest {
    let threshold = similarity_threshold
        .filter(|t| t.is_finite())
        .unwrap_or(DEFAULT_SIMILARITY_THRESHOLD)
        .clamp(0.0, 1.0);

    SearchRequest {
        search_prompt,
        collection_name,
        similarity_threshold: threshold,
        num_results: num_results
            .unwrap_or(default_num_results)
            .clamp(1, MAX_NUM_RESULTS),
        username: username.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_only_prompt() {
        assert_eq!(
            construct_search_prompt("  Rust engineer ", "").unwrap(),
            "Find me a: Rust engineer"
        );
    }

    #[test]
    fn test_prompt_with_additional_info() {
        let prompt = construct_search_prompt("Data scientist", " 5 years Python ").unwrap();
        assert!(prompt.starts_with("Find me a: Data scientist. Additionally"));
        assert!(prompt.contains("minimum requirements: 5 years Python. If these"));
        assert!(prompt.ends_with("exclude them."));
    }

    #[test]
    fn test_empty_role_rejected() {
        let err = construct_search_prompt("   ", "anything").unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg == "Please enter a Job role."));
    }

    #[test]
    fn test_empty_free_prompt_rejected() {
        assert!(matches!(require_prompt("\n\t"), Err(AppError::Validation(_))));
        assert_eq!(require_prompt(" rust ").unwrap(), "rust");
    }

    #[test]
    fn test_build_request_defaults_and_clamps() {
        let request = build_request(
            "p".to_string(),
            CollectionName::One("resumes".to_string()),
            None,
            None,
            CANDIDATE_SEARCH_NUM_RESULTS,
            "jane",
        );
        assert_eq!(request.similarity_threshold, 0.7);
        assert_eq!(request.num_results, 20);

        let request = build_request(
            "p".to_string(),
            CollectionName::One("resumes".to_string()),
            Some(3.5),
            Some(500),
            ANALYSIS_NUM_RESULTS,
            "jane",
        );
        assert_eq!(request.similarity_threshold, 1.0);
        assert_eq!(request.num_results, 50);

        let request = build_request(
            "p".to_string(),
            CollectionName::One("resumes".to_string()),
            Some(-1.0),
            Some(0),
            ANALYSIS_NUM_RESULTS,
            "jane",
        );
        assert_eq!(request.similarity_threshold, 0.0);
        assert_eq!(request.num_results, 1);
    }
}
