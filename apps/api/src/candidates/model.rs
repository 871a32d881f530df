use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const NOT_AVAILABLE: &str = "N/A";
pub const NOT_SPECIFIED: &str = "Not specified";
pub const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub linkedin: String,
}

impl ContactInfo {
    /// LinkedIn URL when one was actually provided.
    pub fn linkedin_url(&self) -> Option<&str> {
        (self.linkedin != NOT_AVAILABLE).then_some(self.linkedin.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateMetadata {
    pub filename: String,
    pub timestamp: String,
}

/// Which range a backend relevance score is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreScale {
    /// 0 – 100 (`/person_details`)
    Percent,
    /// 0 – 1 (`/search_matches`)
    Fraction,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelevanceScore {
    pub value: f64,
    pub scale: ScoreScale,
}

impl RelevanceScore {
    pub fn percent_scale(value: f64) -> Self {
        Self {
            value,
            scale: ScoreScale::Percent,
        }
    }

    pub fn fraction_scale(value: f64) -> Self {
        Self {
            value,
            scale: ScoreScale::Fraction,
        }
    }

    /// The score on a 0 – 100 scale.
    pub fn percent(&self) -> f64 {
        match self.scale {
            ScoreScale::Percent => self.value,
            ScoreScale::Fraction => self.value * 100.0,
        }
    }
}

/// Normalized view model for a person returned by `/person_details`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub id: String,
    pub contact_info: ContactInfo,
    pub relevance_score: RelevanceScore,
    pub current_position: String,
    pub relevant_skills: Vec<String>,
    /// Free text as returned by the backend, e.g. "5", "3 years", "Not listed".
    pub experience_years: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub location: Option<String>,
    pub technical_match: Option<String>,
    pub experience_match: Option<String>,
    pub explanation: Option<String>,
    pub metadata: CandidateMetadata,
    /// Base64 PDF, if the result carried one.
    #[serde(skip_serializing)]
    pub document: Option<String>,
    /// The untouched backend result.
    pub raw: Value,
}

impl CandidateRecord {
    pub fn has_document(&self) -> bool {
        self.document.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceItem {
    pub role: String,
    pub company: String,
    pub duration: String,
}

/// Normalized view model for one `/search_matches` match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchedCandidate {
    pub name: String,
    pub current_role: String,
    pub location: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub skills: Vec<String>,
    pub experience: Vec<ExperienceItem>,
    pub education: Option<String>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub key_achievements: Vec<String>,
    pub filename: String,
    /// Calendar date of the upload, or "Unknown".
    pub upload_date: String,
    pub similarity_score: RelevanceScore,
    /// e.g. "87.0%"
    pub match_score: String,
    /// 0 – 5 stars in halves.
    pub rating: f64,
    pub raw_content: Value,
}
