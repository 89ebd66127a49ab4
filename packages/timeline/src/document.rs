//! Location-history document parsing.
//!
//! An export document is either a bare JSON array of records or an object
//! holding the array under `timelineObjects`. Individual records that do
//! not match the [`TimelineEvent`] shape are skipped and counted rather
//! than failing the whole document.

use residency_timeline_models::TimelineEvent;
use serde_json::Value;
use thiserror::Error;

/// Field holding the record array in object-shaped documents.
pub const RECORDS_FIELD: &str = "timelineObjects";

/// Errors that make a whole document unreadable.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The document is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The document is JSON but neither an array nor an object.
    #[error("Unsupported document shape: expected array or object, found {found}")]
    UnsupportedShape {
        /// JSON type that was found.
        found: &'static str,
    },
}

/// Records parsed from one document.
#[derive(Debug, Default)]
pub struct ParsedDocument {
    /// Records that deserialized successfully.
    pub events: Vec<TimelineEvent>,
    /// Number of array items that were not records.
    pub rejected: u64,
}

/// Parses one export document.
///
/// # Errors
///
/// Returns [`DocumentError`] if the bytes are not JSON or the top-level
/// value is neither an array nor an object.
pub fn parse_document(bytes: &[u8]) -> Result<ParsedDocument, DocumentError> {
    let value: Value = serde_json::from_slice(bytes)?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove(RECORDS_FIELD) {
            Some(Value::Array(items)) => items,
            Some(_) | None => {
                log::debug!("Document object has no {RECORDS_FIELD} array");
                Vec::new()
            }
        },
        other => {
            return Err(DocumentError::UnsupportedShape {
                found: json_type_name(&other),
            });
        }
    };

    let mut parsed = ParsedDocument {
        events: Vec::with_capacity(items.len()),
        rejected: 0,
    };

    for item in items {
        match serde_json::from_value::<TimelineEvent>(item) {
            Ok(event) => parsed.events.push(event),
            Err(e) => {
                log::debug!("Skipping unrecognized record: {e}");
                parsed.rejected += 1;
            }
        }
    }

    Ok(parsed)
}

const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
