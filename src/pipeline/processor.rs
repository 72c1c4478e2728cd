//! Classification orchestrator.
//!
//! Single entry point that drives the full pipeline:
//! read source → validate → model call → extract → normalize → format.
//!
//! The model arrives as a `&dyn VisionModel` so the orchestrator stays
//! fully testable with `MockVisionModel`. Each request is isolated: every
//! failure becomes a `{ success: false, error }` projection, never a panic
//! or a process-level condition.

use tracing::{debug, warn};

use super::classify::{
    extract, failure_value, format, normalize, ClassificationPayload, DisplayResult,
    CLASSIFY_PROMPT,
};
use super::ingest::{try_validate, ImageSource};
use super::PipelineError;
use crate::gemini::VisionModel;

/// Classify one submission, projecting any failure for the route layer.
pub fn classify_submission(
    model: &dyn VisionModel,
    source: ImageSource,
) -> serde_json::Value {
    classify_with_prompt(model, source, CLASSIFY_PROMPT)
}

/// Like `classify_submission`, with a caller-chosen prompt
/// (e.g. `DETAILED_CLASSIFY_PROMPT`).
pub fn classify_with_prompt(
    model: &dyn VisionModel,
    source: ImageSource,
    prompt: &str,
) -> serde_json::Value {
    match run(model, source, prompt) {
        Ok(display) => serde_json::to_value(&display)
            .unwrap_or_else(|e| failure_value(&format!("result serialization failed: {e}"))),
        Err(e) => {
            warn!(error = %e, "classification request failed");
            failure_value(&e.to_string())
        }
    }
}

/// Typed pipeline run, for callers that want the error taxonomy intact.
pub fn run(
    model: &dyn VisionModel,
    source: ImageSource,
    prompt: &str,
) -> Result<DisplayResult, PipelineError> {
    let raw = source.read()?;
    let canonical = try_validate(&raw)?;
    debug!(
        canonical_len = canonical.bytes.len(),
        dimensions = format!("{}x{}", canonical.width, canonical.height),
        model = model.model_name(),
        "Submission validated, calling vision model"
    );

    let response = model.generate(&canonical.bytes, prompt)?;
    let payload_text = extract(&response)?;
    let payload = ClassificationPayload::from_json(&payload_text)?;
    let normalized = normalize(&payload)?;

    Ok(format(&normalized))
}
