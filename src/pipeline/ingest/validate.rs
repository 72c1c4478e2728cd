//! Upload validation and canonicalization.
//!
//! Policy, in order (short-circuiting on first failure):
//! 1. non-empty
//! 2. within the 5 MiB cap
//! 3. sniffed format is one of JPEG / PNG / WebP — sniffed from magic
//!    bytes, never from the declared filename (extensions can be wrong)
//! 4. bytes actually decode as that format
//! 5. alpha / palette inputs flattened to plain RGB; transparency is
//!    composited onto a white background (palette images are expanded to
//!    RGB by the decoder)
//! 6. re-encoded as JPEG quality 90 into a fresh buffer
//!
//! Only the decoded pixel content is the invariant — the re-encoded bytes
//! vary across codec versions and must never be compared byte-for-byte.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, ImageOutputFormat, Rgb, RgbImage};
use tracing::debug;

use super::IngestError;
use crate::config;

/// Formats accepted from untrusted uploads.
const ACCEPTED_FORMATS: &[ImageFormat] =
    &[ImageFormat::Jpeg, ImageFormat::Png, ImageFormat::WebP];

/// The canonical image form every downstream stage consumes.
#[derive(Debug, Clone)]
pub struct CanonicalImage {
    /// JPEG-encoded, quality 90, RGB.
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
    pub width: u32,
    pub height: u32,
}

/// Outcome of validating one submission.
#[derive(Debug)]
pub enum ValidationOutcome {
    Accepted(CanonicalImage),
    Rejected(IngestError),
}

impl ValidationOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }
}

/// Validate raw upload bytes, producing the canonical form or a rejection.
pub fn validate(raw: &[u8]) -> ValidationOutcome {
    match try_validate(raw) {
        Ok(canonical) => ValidationOutcome::Accepted(canonical),
        Err(reason) => ValidationOutcome::Rejected(reason),
    }
}

/// `Result`-shaped validation for composition inside the pipeline.
pub fn try_validate(raw: &[u8]) -> Result<CanonicalImage, IngestError> {
    if raw.is_empty() {
        return Err(IngestError::EmptyFile);
    }

    if raw.len() > config::MAX_UPLOAD_BYTES {
        return Err(IngestError::OversizeFile {
            size: raw.len(),
            limit: config::MAX_UPLOAD_BYTES,
        });
    }

    // Sniff before decoding so unsupported-but-recognizable formats (GIF,
    // TIFF, ...) are named in the rejection instead of failing as corrupt.
    let format = image::guess_format(raw).map_err(|_| IngestError::CorruptImage)?;
    if !ACCEPTED_FORMATS.contains(&format) {
        return Err(IngestError::UnsupportedFormat(format_name(format)));
    }

    let img = image::load_from_memory_with_format(raw, format).map_err(|e| {
        debug!(error = %e, "image decode failed");
        IngestError::CorruptImage
    })?;

    let rgb = flatten_to_rgb(img);
    let (width, height) = (rgb.width(), rgb.height());
    let bytes = encode_canonical_jpeg(&rgb)?;

    debug!(
        input_len = raw.len(),
        output_len = bytes.len(),
        dimensions = format!("{width}x{height}"),
        format = ?format,
        "Upload canonicalized"
    );

    Ok(CanonicalImage {
        bytes,
        mime_type: "image/jpeg",
        width,
        height,
    })
}

/// Strip any alpha channel, compositing transparency onto white.
///
/// White matches what the classification prompt expects of a photographed
/// item on a neutral background; a black flatten would silhouette
/// transparent PNGs.
fn flatten_to_rgb(img: DynamicImage) -> RgbImage {
    if !img.color().has_alpha() {
        return img.to_rgb8();
    }

    let rgba = img.to_rgba8();
    let mut out = RgbImage::new(rgba.width(), rgba.height());
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let a = a as u32;
        let blend = |c: u8| ((c as u32 * a + 255 * (255 - a)) / 255) as u8;
        out.put_pixel(x, y, Rgb([blend(r), blend(g), blend(b)]));
    }
    out
}

/// Encode the canonical JPEG form (quality 90).
fn encode_canonical_jpeg(rgb: &RgbImage) -> Result<Vec<u8>, IngestError> {
    let dynamic = DynamicImage::ImageRgb8(rgb.clone());
    let mut cursor = Cursor::new(Vec::new());
    dynamic
        .write_to(&mut cursor, ImageOutputFormat::Jpeg(config::JPEG_QUALITY))
        .map_err(|e| IngestError::Encode(e.to_string()))?;
    Ok(cursor.into_inner())
}

/// Human-readable name for a sniffed format, used in rejection messages.
fn format_name(format: ImageFormat) -> String {
    match format {
        ImageFormat::Gif => "GIF".to_string(),
        ImageFormat::Bmp => "BMP".to_string(),
        ImageFormat::Tiff => "TIFF".to_string(),
        ImageFormat::Ico => "ICO".to_string(),
        other => format!("{other:?}").to_uppercase(),
    }
}
