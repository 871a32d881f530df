//! Embedded resume PDFs arrive as base64 strings somewhere inside a result.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::Value;
use thiserror::Error;

use crate::candidates::normalize::lookup;

/// Base64 of "%PDF" begins with this prefix.
pub const PDF_BASE64_PREFIX: &str = "JVBER";
const PDF_MAGIC: &[u8] = b"%PDF";

/// Paths accepted as-is when they hold a non-empty string.
const DOCUMENT_PATHS: &[&[&str]] = &[
    &["details", "metadata", "documents"],
    &["document"],
    &["details", "document"],
];

/// Paths accepted only when the string looks like a base64 PDF.
const PDF_DATA_PATHS: &[&[&str]] = &[
    &["pdf_data"],
    &["details", "pdf_data"],
    &["details", "response_content", "pdf_data"],
    &["attachments", "pdf"],
];

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("invalid base64: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("decoded document is not a PDF")]
    NotPdf,
}

fn non_empty_str<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    lookup(value, path)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Finds the base64 PDF carried by a search result, if any.
pub fn find_pdf_document(result: &Value) -> Option<String> {
    DOCUMENT_PATHS
        .iter()
        .find_map(|path| non_empty_str(result, path))
        .or_else(|| {
            PDF_DATA_PATHS
                .iter()
                .filter_map(|path| non_empty_str(result, path))
                .find(|s| s.starts_with(PDF_BASE64_PREFIX))
        })
        .map(str::to_string)
}

/// Document preview stored in `details.metadatas`, a list aligned with the
/// result list. The slot is the last digit of `details.id` when it has one,
/// otherwise the result's position in the list.
pub fn find_indexed_document(result: &Value, ordinal: usize) -> Option<String> {
    let details = result.get("details")?;
    let slot = details
        .get("id")
        .and_then(Value::as_str)
        .and_then(|id| id.chars().last())
        .and_then(|c| c.to_digit(10))
        .map_or(ordinal, |d| d as usize);

    details
        .get("metadatas")?
        .get(slot)
        .and_then(|entry| entry.get("document"))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Decodes a base64 PDF, ignoring embedded whitespace.
pub fn decode_pdf(base64_data: &str) -> Result<Vec<u8>, PdfError> {
    let compact: String = base64_data.split_whitespace().collect();
    let bytes = STANDARD.decode(compact)?;
    if !bytes.starts_with(PDF_MAGIC) {
        return Err(PdfError::NotPdf);
    }
    Ok(bytes)
}

/// Placeholder left where an embedded PDF was removed.
pub const OMITTED_PDF: &str = "[pdf omitted]";

/// Replaces every base64 PDF string inside `value` with `OMITTED_PDF`.
pub fn strip_embedded_pdfs(value: &mut Value) {
    match value {
        Value::String(s) if s.starts_with(PDF_BASE64_PREFIX) => *s = OMITTED_PDF.to_string(),
        Value::Array(items) => items.iter_mut().for_each(strip_embedded_pdfs),
        Value::Object(map) => map.values_mut().for_each(strip_embedded_pdfs),
        _ => {}
    }
}

/// Inline form for embedding straight into an `<iframe src>`.
pub fn pdf_data_uri(base64_data: &str) -> String {
    format!("data:application/pdf;base64,{base64_data}")
}
