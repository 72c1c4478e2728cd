pub mod classify;
pub mod ingest;
pub mod processor; // End-to-end orchestrator: ingest → model → classify

use thiserror::Error;

use crate::gemini::UpstreamError;
use classify::{NormalizeError, ParseError};
use ingest::IngestError;

/// Every way a classification request can fail, one stage per variant.
///
/// No catch-all: ingest rejections, provider failures, parse failures and
/// normalization failures stay distinct all the way to the boundary that
/// phrases them for the user.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}
