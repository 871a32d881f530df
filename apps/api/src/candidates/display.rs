//! Display helpers for the candidate list: badges, labels, progress values.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::candidates::model::CandidateRecord;
use crate::candidates::percentage::percent_value;
use crate::candidates::sort::candidate_match_percentage;

fn not_listed() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)not listed").expect("valid regex"))
}

fn year_word() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)years?").expect("valid regex"))
}

/// Colour band of the "% match" badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelevanceBand {
    High,
    Medium,
    Low,
}

impl RelevanceBand {
    pub fn from_percent(percent: f64) -> Self {
        if percent > 80.0 {
            RelevanceBand::High
        } else if percent > 50.0 {
            RelevanceBand::Medium
        } else {
            RelevanceBand::Low
        }
    }
}

/// "5" → "5 years", "1 year" → "1 year", "Not listed" → `None`.
pub fn experience_label(experience_years: &str) -> Option<String> {
    let stripped = not_listed().replacen(experience_years, 1, "");
    let stripped = year_word().replacen(&stripped, 1, "");
    let amount = stripped.trim();
    if amount.is_empty() {
        return None;
    }

    let plural = amount
        .split_whitespace()
        .next()
        .and_then(|n| n.trim_end_matches('+').parse::<f64>().ok())
        .is_some_and(|n| n > 1.0);
    Some(format!("{amount} {}", if plural { "years" } else { "year" }))
}

/// Replaces a "not listed" placeholder with "-".
pub fn position_label(position: &str) -> String {
    not_listed().replacen(position, 1, "-").into_owned()
}

/// Hides a "not listed" location.
pub fn location_label(location: Option<&str>) -> Option<String> {
    location
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.eq_ignore_ascii_case("not listed"))
        .map(str::to_string)
}

/// Avatar letter.
pub fn initial(name: &str) -> Option<char> {
    name.chars().next()
}

/// A labelled progress bar value such as "Technical Match 90%".
#[derive(Debug, Clone, Serialize)]
pub struct MatchBar {
    pub label: String,
    pub percent: Option<f64>,
}

fn match_bar(text: Option<&str>) -> Option<MatchBar> {
    text.map(|t| MatchBar {
        label: t.to_string(),
        percent: percent_value(t),
    })
}

/// One card in the candidate list.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateSummary {
    pub id: String,
    pub name: String,
    pub initial: Option<char>,
    pub position: String,
    pub relevance_percent: f64,
    pub relevance_band: RelevanceBand,
    pub match_percentage: f64,
    pub experience: Option<String>,
    pub location: Option<String>,
    pub technical_match: Option<MatchBar>,
    pub experience_match: Option<MatchBar>,
    pub explanation: Option<String>,
    pub has_document: bool,
}

impl From<&CandidateRecord> for CandidateSummary {
    fn from(record: &CandidateRecord) -> Self {
        let relevance_percent = record.relevance_score.percent();
        Self {
            id: record.id.clone(),
            name: record.contact_info.name.clone(),
            initial: initial(&record.contact_info.name),
            position: position_label(&record.current_position),
            relevance_percent,
            relevance_band: RelevanceBand::from_percent(relevance_percent),
            match_percentage: candidate_match_percentage(record),
            experience: experience_label(&record.experience_years),
            location: location_label(record.location.as_deref()),
            technical_match: match_bar(record.technical_match.as_deref()),
            experience_match: match_bar(record.experience_match.as_deref()),
            explanation: record.explanation.clone(),
            has_document: record.has_document(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relevance_bands() {
        assert_eq!(RelevanceBand::from_percent(81.0), RelevanceBand::High);
        assert_eq!(RelevanceBand::from_percent(80.0), RelevanceBand::Medium);
        assert_eq!(RelevanceBand::from_percent(51.0), RelevanceBand::Medium);
        assert_eq!(RelevanceBand::from_percent(50.0), RelevanceBand::Low);
    }

    #[test]
    fn test_experience_label_plural() {
        assert_eq!(experience_label("5").as_deref(), Some("5 years"));
        assert_eq!(experience_label("5 years").as_deref(), Some("5 years"));
        assert_eq!(experience_label("8+ Years").as_deref(), Some("8+ years"));
    }

    #[test]
    fn test_experience_label_singular() {
        assert_eq!(experience_label("1 year").as_deref(), Some("1 year"));
        assert_eq!(experience_label("1").as_deref(), Some("1 year"));
    }

    #[test]
    fn test_experience_label_not_listed() {
        assert_eq!(experience_label("Not listed"), None);
        assert_eq!(experience_label(""), None);
    }

    #[test]
    fn test_position_label() {
        assert_eq!(position_label("Not Listed"), "-");
        assert_eq!(position_label("Staff Engineer"), "Staff Engineer");
    }

    #[test]
    fn test_location_label() {
        assert_eq!(location_label(Some("NOT LISTED")), None);
        assert_eq!(location_label(None), None);
        assert_eq!(location_label(Some("Berlin")).as_deref(), Some("Berlin"));
    }

    #[test]
    fn test_initial() {
        assert_eq!(initial("Jane"), Some('J'));
        assert_eq!(initial(""), None);
    }
}
