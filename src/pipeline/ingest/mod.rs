//! Image ingestion — turns an untrusted upload into the canonical JPEG form.
//!
//! Everything downstream of this module sees exactly one image shape:
//! RGB, no alpha, JPEG-encoded at a fixed quality. The checks run in a
//! fixed order and short-circuit on the first failure, so a 40 MB GIF is
//! rejected for its size before anyone pays for a decode attempt.

pub mod source;
pub mod validate;

pub use source::*;
pub use validate::*;

use thiserror::Error;

/// Why a submission was rejected.
///
/// One variant per distinct cause — the route layer phrases these to the
/// user, so wording matters and must stay stable.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("empty file")]
    EmptyFile,

    #[error("file too large: {size} bytes (limit {limit} bytes)")]
    OversizeFile { size: usize, limit: usize },

    #[error("unsupported image format: {0} (accepted: JPEG, PNG, WebP)")]
    UnsupportedFormat(String),

    #[error("not a valid image")]
    CorruptImage,

    #[error("failed to encode canonical JPEG: {0}")]
    Encode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
