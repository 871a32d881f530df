//! Match percentages live in free-text fields such as `"87%"` or `"Match: 72.5%"`.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::candidates::normalize::is_truthy;

fn percentage_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(\d+(\.\d+)?)%?").expect("valid percentage regex"))
}

/// Text of the first match field present, in priority order:
/// `match`, `details.match`, `match_percentage`, `details.match_percentage`.
/// Top-level fields accept numbers too; `details.*` fields must be strings.
pub fn find_match_text(value: &Value) -> Option<String> {
    let top_level = |key: &str| match value.get(key).filter(|v| is_truthy(v))? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    };
    let nested = |key: &str| {
        value
            .get("details")
            .and_then(|d| d.get(key))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    top_level("match")
        .or_else(|| nested("match"))
        .or_else(|| top_level("match_percentage"))
        .or_else(|| nested("match_percentage"))
}

/// First number in the text, `0` when there is none.
pub fn parse_percentage(text: &str) -> f64 {
    percentage_pattern()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Match percentage of a raw result. `None` when no match field is present;
/// a field without a number yields `Some(0.0)`.
pub fn extract_match_percentage(value: &Value) -> Option<f64> {
    find_match_text(value).map(|text| parse_percentage(&text))
}

/// Leading number of a progress value such as `"75%"`; `None` when it is not numeric.
pub fn percent_value(text: &str) -> Option<f64> {
    text.split('%').next()?.trim().parse::<f64>().ok()
}
