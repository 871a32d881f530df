//! Wire types for the upload and matching services.
//!
//! Response shapes are loosely typed upstream, so anything that has been seen
//! to vary is kept as `serde_json::Value` and unwrapped in `candidates::normalize`.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `collection_name` is sent as a list to `/person_details` and as a single
/// name to `/search_matches`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CollectionName {
    One(String),
    Many(Vec<String>),
}

/// Body of `POST /person_details` and `POST /search_matches`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub search_prompt: String,
    pub collection_name: CollectionName,
    pub similarity_threshold: f64,
    pub num_results: u32,
    pub username: String,
}

/// A single file part for `POST /upload`.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Field decoders that never fail: `null` or a value of the wrong type
/// becomes the field's default.
mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned + Default,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(serde_json::from_value(value).unwrap_or_default())
    }

    /// A list of objects. Anything that is not a list is empty, and entries
    /// that are not objects are skipped.
    pub fn objects<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let Value::Array(items) = Value::deserialize(deserializer)? else {
            return Ok(Vec::new());
        };
        Ok(items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonDetailsResponse {
    #[serde(default, deserialize_with = "lenient::objects")]
    pub multiple_people_results: Vec<PersonResult>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub success: bool,
}

/// One entry of `multiple_people_results`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonResult {
    #[serde(default)]
    pub person: Value,
    #[serde(default)]
    pub filename: Value,
    #[serde(default)]
    pub details: Value,
    /// Fields outside the documented shape (`document`, `pdf_data`, `attachments`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PersonResult {
    /// Reassembles the result as the JSON value it was decoded from.
    pub fn to_value(&self) -> Value {
        let mut map = self.extra.clone();
        map.insert("person".to_string(), self.person.clone());
        map.insert("filename".to_string(), self.filename.clone());
        map.insert("details".to_string(), self.details.clone());
        Value::Object(map)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchMatchesResponse {
    #[serde(default, deserialize_with = "lenient::objects")]
    pub matches: Vec<RawMatch>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub total_matches: u64,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub message: Option<String>,
}

/// One entry of `matches` from `/search_matches`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawMatch {
    #[serde(default)]
    pub raw_content: Value,
    #[serde(default)]
    pub extracted_info: Value,
    #[serde(default)]
    pub metadata: Value,
    /// Usually a number in `[0, 1]`; numeric strings are accepted downstream.
    #[serde(default)]
    pub similarity_score: Value,
}
