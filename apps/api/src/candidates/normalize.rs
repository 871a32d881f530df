//! Response normalization: turns loosely typed matching-service results into
//! `CandidateRecord` / `MatchedCandidate` view models.
//!
//! `response_content` lookup order for a `/person_details` result:
//! 1. `details.response_content`
//! 2. `details.answer`: a JSON string is parsed first; in both forms its own
//!    `response_content` wins over the value itself
//! 3. an empty object
//!
//! Missing or mistyped fields never fail normalization; they fall back to the
//! defaults in `candidates::model`.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};
use tracing::warn;

use crate::candidates::model::{
    CandidateMetadata, CandidateRecord, ContactInfo, ExperienceItem, MatchedCandidate,
    RelevanceScore, NOT_AVAILABLE, NOT_SPECIFIED, UNKNOWN,
};
use crate::candidates::pdf::{find_indexed_document, find_pdf_document};
use crate::matching_client::{PersonResult, RawMatch};

// ────────────────────────────────────────────────────────────────────────────
// Loose JSON accessors
// ────────────────────────────────────────────────────────────────────────────

/// JavaScript-style truthiness: null, false, 0, and "" count as absent.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Follows a dotted path of object keys.
pub fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |current, key| current.get(key))
}

/// A truthy string or number rendered as text.
fn text(value: Option<&Value>) -> Option<String> {
    match value.filter(|v| is_truthy(v))? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn text_or(value: Option<&Value>, default: &str) -> String {
    text(value).unwrap_or_else(|| default.to_string())
}

/// String elements of an array; anything that is not an array yields an empty list.
fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

fn number(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// /person_details
// ────────────────────────────────────────────────────────────────────────────

fn empty_object() -> Value {
    Value::Object(Map::new())
}

/// Prefers a nested `response_content` over the value that wraps it.
fn unwrap_response_content(value: Value) -> Value {
    match value.get("response_content").filter(|v| is_truthy(v)) {
        Some(inner) => inner.clone(),
        None => value,
    }
}

/// Locates the structured analysis inside a result's `details` object.
pub fn locate_response_content(details: &Value) -> Value {
    if let Some(content) = details.get("response_content").filter(|v| is_truthy(v)) {
        return content.clone();
    }

    match details.get("answer").filter(|v| is_truthy(v)) {
        Some(Value::String(answer)) => match serde_json::from_str::<Value>(answer) {
            Ok(parsed) => unwrap_response_content(parsed),
            Err(e) => {
                warn!("Could not parse `answer` as JSON: {e}");
                empty_object()
            }
        },
        Some(answer) => unwrap_response_content(answer.clone()),
        None => empty_object(),
    }
}

/// Builds the view model for one `multiple_people_results` entry.
/// `id` must be unique within the search it came from.
pub fn normalize_person(result: &PersonResult, id: String) -> CandidateRecord {
    let raw = result.to_value();
    let content = locate_response_content(&result.details);
    let contact = content.get("contact_info");
    let field = |key: &str| content.get(key);

    let name = text(contact.and_then(|c| c.get("name")))
        .or_else(|| text(Some(&result.person)))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    let experience_years = match field("experience_years") {
        None | Some(Value::Null) => NOT_SPECIFIED.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };

    CandidateRecord {
        id,
        contact_info: ContactInfo {
            name,
            email: text_or(contact.and_then(|c| c.get("email")), NOT_AVAILABLE),
            phone: text_or(contact.and_then(|c| c.get("phone")), NOT_AVAILABLE),
            linkedin: text_or(contact.and_then(|c| c.get("linkedin")), NOT_AVAILABLE),
        },
        relevance_score: RelevanceScore::percent_scale(number(field("relevance_score"))),
        current_position: text_or(field("current_position"), NOT_SPECIFIED),
        relevant_skills: string_list(field("relevant_skills")),
        experience_years,
        strengths: string_list(field("strengths")),
        improvements: string_list(field("improvements")),
        location: text(field("location")),
        technical_match: text(field("technical_match")),
        experience_match: text(field("experience_match")),
        explanation: text(field("explanation"))
            .or_else(|| text(result.details.get("explanation"))),
        metadata: CandidateMetadata {
            filename: text_or(Some(&result.filename), UNKNOWN),
            timestamp: UNKNOWN.to_string(),
        },
        document: find_pdf_document(&raw),
        raw,
    }
}

/// Normalizes a whole `/person_details` result list. Ids are `<stamp><ordinal>`.
/// A preview in `details.metadatas` takes precedence over other embedded PDFs.
pub fn normalize_people(results: &[PersonResult], stamp: i64) -> Vec<CandidateRecord> {
    results
        .iter()
        .enumerate()
        .map(|(ordinal, result)| {
            let mut record = normalize_person(result, format!("{stamp}{ordinal}"));
            if let Some(preview) = find_indexed_document(&record.raw, ordinal) {
                record.document = Some(preview);
            }
            record
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// /search_matches
// ────────────────────────────────────────────────────────────────────────────

/// Renders an upload timestamp as a calendar date, or "Unknown".
pub fn upload_date(timestamp: Option<&str>) -> String {
    let Some(ts) = timestamp.map(str::trim).filter(|s| !s.is_empty()) else {
        return UNKNOWN.to_string();
    };

    let date = DateTime::parse_from_rfc3339(ts)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.date()))
        .or_else(|_| NaiveDate::parse_from_str(ts, "%Y-%m-%d"));

    match date {
        Ok(d) => d.format("%Y-%m-%d").to_string(),
        Err(_) => UNKNOWN.to_string(),
    }
}

fn experience_items(value: Option<&Value>) -> Vec<ExperienceItem> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter(|item| item.is_object())
        .map(|item| ExperienceItem {
            role: text_or(item.get("role"), ""),
            company: text_or(item.get("company"), ""),
            duration: text_or(item.get("duration"), ""),
        })
        .collect()
}

pub fn normalize_match(raw: &RawMatch) -> MatchedCandidate {
    let info = &raw.extracted_info;
    let similarity = number(Some(&raw.similarity_score));
    let score = RelevanceScore::fraction_scale(similarity);

    MatchedCandidate {
        name: text_or(info.get("name"), UNKNOWN),
        current_role: text_or(info.get("current_role"), "Role not specified"),
        location: text(info.get("location")),
        email: text(lookup(info, &["contact", "email"])),
        phone: text(lookup(info, &["contact", "phone"])),
        skills: string_list(info.get("skills")),
        experience: experience_items(info.get("experience")),
        education: text(info.get("education")),
        strengths: string_list(info.get("strengths")),
        weaknesses: string_list(info.get("weaknesses")),
        key_achievements: string_list(info.get("key_achievements")),
        filename: text_or(raw.metadata.get("filename"), UNKNOWN),
        upload_date: upload_date(raw.metadata.get("timestamp").and_then(Value::as_str)),
        similarity_score: score,
        match_score: format!("{:.1}%", score.percent()),
        rating: (similarity * 5.0).clamp(0.0, 5.0),
        raw_content: raw.raw_content.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn person(raw: Value) -> PersonResult {
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn test_response_content_is_first_priority() {
        let details = json!({
            "response_content": {"current_position": "Direct"},
            "answer": {"current_position": "From answer"}
        });
        let content = locate_response_content(&details);
        assert_eq!(content["current_position"], "Direct");
    }

    #[test]
    fn test_answer_string_is_parsed() {
        let details = json!({
            "answer": "{\"response_content\": {\"current_position\": \"Nested\"}}"
        });
        assert_eq!(locate_response_content(&details)["current_position"], "Nested");
    }

    #[test]
    fn test_answer_string_without_wrapper_is_used_directly() {
        let details = json!({"answer": "{\"current_position\": \"Flat\"}"});
        assert_eq!(locate_response_content(&details)["current_position"], "Flat");
    }

    #[test]
    fn test_answer_object_prefers_nested_response_content() {
        let details = json!({
            "answer": {"response_content": {"current_position": "Inner"}, "current_position": "Outer"}
        });
        assert_eq!(locate_response_content(&details)["current_position"], "Inner");
    }

    #[test]
    fn test_unparseable_answer_yields_empty_object() {
        let details = json!({"answer": "the model said no"});
        assert_eq!(locate_response_content(&details), json!({}));
    }

    #[test]
    fn test_null_response_content_falls_through_to_answer() {
        let details = json!({
            "response_content": null,
            "answer": {"current_position": "Fallback"}
        });
        assert_eq!(locate_response_content(&details)["current_position"], "Fallback");
    }

    #[test]
    fn test_all_paths_absent_produces_defaults() {
        let record = normalize_person(&person(json!({})), "1".to_string());
        assert_eq!(record.contact_info.name, "N/A");
        assert_eq!(record.contact_info.email, "N/A");
        assert_eq!(record.contact_info.phone, "N/A");
        assert_eq!(record.contact_info.linkedin, "N/A");
        assert_eq!(record.relevance_score.percent(), 0.0);
        assert_eq!(record.current_position, "Not specified");
        assert_eq!(record.experience_years, "Not specified");
        assert!(record.relevant_skills.is_empty());
        assert!(record.strengths.is_empty());
        assert!(record.improvements.is_empty());
        assert_eq!(record.metadata.filename, "Unknown");
        assert_eq!(record.metadata.timestamp, "Unknown");
        assert!(record.document.is_none());
    }

    #[test]
    fn test_name_falls_back_to_person_field() {
        let record = normalize_person(
            &person(json!({"person": "Jane Doe", "details": {"response_content": {"contact_info": {}}}})),
            "1".to_string(),
        );
        assert_eq!(record.contact_info.name, "Jane Doe");
    }

    #[test]
    fn test_full_person_result_normalizes() {
        let record = normalize_person(
            &person(json!({
                "person": "jane",
                "filename": "jane.pdf",
                "details": {
                    "response_content": {
                        "contact_info": {
                            "name": "Jane Doe",
                            "email": "jane@example.com",
                            "phone": "555-0100",
                            "linkedin": "https://linkedin.com/in/jane"
                        },
                        "relevance_score": 87,
                        "current_position": "Staff Engineer",
                        "relevant_skills": ["Rust", 42, "Go"],
                        "experience_years": 7,
                        "strengths": ["Mentoring"],
                        "improvements": "none",
                        "location": "Berlin",
                        "technical_match": "90%",
                        "experience_match": "75%"
                    }
                }
            })),
            "171".to_string(),
        );

        assert_eq!(record.id, "171");
        assert_eq!(record.contact_info.name, "Jane Doe");
        assert_eq!(record.contact_info.linkedin_url(), Some("https://linkedin.com/in/jane"));
        assert_eq!(record.relevance_score.percent(), 87.0);
        assert_eq!(record.relevant_skills, vec!["Rust", "Go"]);
        assert_eq!(record.experience_years, "7");
        assert!(record.improvements.is_empty());
        assert_eq!(record.location.as_deref(), Some("Berlin"));
        assert_eq!(record.technical_match.as_deref(), Some("90%"));
        assert_eq!(record.metadata.filename, "jane.pdf");
    }

    #[test]
    fn test_empty_strings_use_defaults() {
        let record = normalize_person(
            &person(json!({"details": {"response_content": {
                "contact_info": {"name": "", "email": ""},
                "current_position": ""
            }}})),
            "1".to_string(),
        );
        assert_eq!(record.contact_info.name, "N/A");
        assert_eq!(record.contact_info.email, "N/A");
        assert_eq!(record.current_position, "Not specified");
    }

    #[test]
    fn test_normalize_people_assigns_unique_ids() {
        let results = vec![person(json!({})), person(json!({}))];
        let records = normalize_people(&results, 1700);
        assert_eq!(records[0].id, "17000");
        assert_eq!(records[1].id, "17001");
    }

    #[test]
    fn test_normalize_people_reads_metadatas_preview() {
        let details = json!({
            "metadatas": [{"document": "JVBERi0xLjQK"}, {"document": "JVBERi0xLjcK"}]
        });
        let results = vec![
            person(json!({"details": details.clone()})),
            person(json!({"details": details, "document": "ignored"})),
        ];
        let records = normalize_people(&results, 1);
        assert_eq!(records[0].document.as_deref(), Some("JVBERi0xLjQK"));
        assert_eq!(records[1].document.as_deref(), Some("JVBERi0xLjcK"));
        assert!(records.iter().all(CandidateRecord::has_document));
    }

    #[test]
    fn test_normalize_match_coerces_score() {
        let raw: RawMatch = serde_json::from_value(json!({"similarity_score": "0.5"})).unwrap();
        let record = normalize_match(&raw);
        assert_eq!(record.match_score, "50.0%");
        assert!((record.rating - 2.5).abs() < 1e-9);

        let raw: RawMatch = serde_json::from_value(json!({"similarity_score": null})).unwrap();
        assert_eq!(normalize_match(&raw).match_score, "0.0%");
    }

    #[test]
    fn test_normalize_match_defaults() {
        let record = normalize_match(&RawMatch::default());
        assert_eq!(record.name, "Unknown");
        assert_eq!(record.current_role, "Role not specified");
        assert_eq!(record.filename, "Unknown");
        assert_eq!(record.upload_date, "Unknown");
        assert_eq!(record.match_score, "0.0%");
        assert!(record.experience.is_empty());
    }

    #[test]
    fn test_normalize_match_full() {
        let raw: RawMatch = serde_json::from_value(json!({
            "raw_content": "resume text",
            "extracted_info": {
                "name": "Sam Lee",
                "contact": {"email": "sam@example.com"},
                "skills": ["Kubernetes"],
                "experience": [{"role": "SRE", "company": "Acme", "duration": "2y"}],
                "current_role": "SRE",
                "location": "Austin"
            },
            "metadata": {"filename": "sam.pdf", "timestamp": "2024-03-01T10:00:00Z"},
            "similarity_score": 0.87
        }))
        .unwrap();

        let record = normalize_match(&raw);
        assert_eq!(record.name, "Sam Lee");
        assert_eq!(record.email.as_deref(), Some("sam@example.com"));
        assert_eq!(record.phone, None);
        assert_eq!(record.experience[0].company, "Acme");
        assert_eq!(record.upload_date, "2024-03-01");
        assert_eq!(record.match_score, "87.0%");
        assert!((record.rating - 4.35).abs() < 1e-9);
    }

    #[test]
    fn test_upload_date_accepts_naive_timestamps() {
        assert_eq!(upload_date(Some("2024-05-06T07:08:09")), "2024-05-06");
        assert_eq!(upload_date(Some("2024-05-06")), "2024-05-06");
        assert_eq!(upload_date(Some("yesterday")), "Unknown");
        assert_eq!(upload_date(None), "Unknown");
    }
}
