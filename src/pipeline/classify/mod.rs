//! Classification-response processing — raw model text to display result.
//!
//! The model's answer is untrusted and loosely structured: prose around the
//! JSON, code fences, textual confidence values, missing fields. This module
//! is the tolerance layer: `extract` isolates the payload, `normalize`
//! reconciles the vocabulary and derives the secondary category, `format`
//! projects the result for presentation.

pub mod extract;
pub mod format;
pub mod normalize;
pub mod prompt;
pub mod types;

pub use extract::*;
pub use format::*;
pub use normalize::*;
pub use prompt::*;
pub use types::*;

use thiserror::Error;

/// Failures isolating or parsing the JSON payload inside the raw response.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("no JSON object found in model response")]
    NoJsonFound,

    #[error("malformed JSON in model response: {0}")]
    MalformedJson(String),
}

/// Failures reconciling a parsed payload into a normalized classification.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid confidence value: {0:?}")]
    InvalidConfidenceValue(String),
}
