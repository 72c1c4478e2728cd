//! binsight — waste-classification pipelines.
//!
//! Two tolerance layers around a hosted vision model:
//! - `pipeline::ingest` turns an untrusted upload into a canonical JPEG
//! - `pipeline::classify` turns the model's loosely-structured answer into
//!   a stable display result
//!
//! The model itself is a capability (`gemini::VisionModel`), constructed
//! once and passed explicitly to `pipeline::processor`. HTTP routing,
//! templating and secret loading live in the embedding application.

pub mod config;
pub mod gemini;
pub mod pipeline;

pub use gemini::{GeminiClient, MockVisionModel, UpstreamError, VisionModel};
pub use pipeline::classify::{DisplayResult, CLASSIFY_PROMPT, DETAILED_CLASSIFY_PROMPT};
pub use pipeline::ingest::{validate, ImageSource, ValidationOutcome};
pub use pipeline::processor::{classify_submission, classify_with_prompt};
pub use pipeline::PipelineError;

use tracing_subscriber::EnvFilter;

/// Initialize tracing for the hosting process. Call once at startup.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}
