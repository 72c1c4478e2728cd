//! Payload and classification types.

use serde::{Deserialize, Serialize};

use super::ParseError;

/// The structured payload the model is asked to return.
///
/// Two shapes arrive in practice: the simple one (`category` +
/// `confidence`) and the detailed one (`primary_category` or
/// `biodegradable`/`moisture`, textual confidence). Every field is optional
/// at the type level; requiredness is enforced by normalization so the
/// error can name the missing field. Unknown fields (e.g. `reason`,
/// `features`) are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassificationPayload {
    pub category: Option<String>,
    pub primary_category: Option<String>,
    pub secondary_category: Option<String>,
    /// Detailed variant: "biodegradable" / "non-biodegradable".
    pub biodegradable: Option<String>,
    /// Explicit flag, takes precedence over any inference.
    pub is_biodegradable: Option<bool>,
    /// Detailed variant: "wet" / "dry".
    pub moisture: Option<String>,
    pub item_name: Option<String>,
    pub confidence: Option<ConfidenceValue>,
    pub disposal_advice: Option<String>,
    pub material_type: Option<String>,
}

impl ClassificationPayload {
    /// Parse an extracted JSON object string into a payload.
    pub fn from_json(text: &str) -> Result<Self, ParseError> {
        serde_json::from_str(text).map_err(|e| ParseError::MalformedJson(e.to_string()))
    }
}

/// Confidence as the model reports it: a number (0–100) or one of
/// `high` / `medium` / `low`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ConfidenceValue {
    Number(f64),
    Text(String),
}

/// The reconciled, display-independent classification.
///
/// Produced once by normalization and never mutated; the formatter reads
/// it and also carries it verbatim for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedClassification {
    pub item_name: Option<String>,
    pub primary_category: String,
    pub primary_confidence: u8,
    pub secondary_category: String,
    pub secondary_confidence: u8,
    pub combined_category: String,
    pub is_biodegradable: bool,
    pub disposal_advice: String,
}
