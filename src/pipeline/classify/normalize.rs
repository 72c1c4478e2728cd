//! Category reconciliation and confidence normalization.

use super::types::{ClassificationPayload, ConfidenceValue, NormalizedClassification};
use super::NormalizeError;

/// Representative integers for textual confidence. Monotonic: high > medium > low.
const CONFIDENCE_HIGH: u8 = 90;
const CONFIDENCE_MEDIUM: u8 = 60;
const CONFIDENCE_LOW: u8 = 30;

/// The secondary confidence sits a fixed step below the primary.
const SECONDARY_CONFIDENCE_OFFSET: i64 = 10;

/// Fallback advice when the model supplies none.
pub const DEFAULT_DISPOSAL_ADVICE: &str = "No specific disposal advice available.";

/// Secondary label chosen when the association list is exhausted.
pub const DEFAULT_SECONDARY_CATEGORY: &str = "General Waste";

/// Ordered (material keyword → secondary label) associations.
///
/// Derivation picks the FIRST entry whose keyword is NOT a case-insensitive
/// substring of the primary category text. This is an asymmetric tie-break,
/// not a relevance search: a plastic item skips "plastic" and lands on the
/// paper entry's label, "Recyclable (plastic)". Consumers depend on these
/// exact labels — do not reorder or "fix" the pairing.
pub const SECONDARY_ASSOCIATIONS: &[(&str, &str)] = &[
    ("plastic", "Recyclable (paper)"),
    ("paper", "Recyclable (plastic)"),
    ("metal", "Recyclable (glass)"),
    ("glass", "Recyclable (metal)"),
    ("biodegradable", "Compostable"),
    ("hazardous", "Special Disposal"),
    ("e-waste", "Electronic Waste"),
];

/// Reconcile a parsed payload into a `NormalizedClassification`.
///
/// Fails only on a missing primary/confidence indicator or an
/// unrecognizable confidence value; everything else has a deterministic
/// derivation or default.
pub fn normalize(
    payload: &ClassificationPayload,
) -> Result<NormalizedClassification, NormalizeError> {
    let (primary_category, from_detailed_bio) = primary_category(payload)?;

    let confidence = payload
        .confidence
        .as_ref()
        .ok_or(NormalizeError::MissingField("confidence"))?;
    let primary_confidence = normalize_confidence(confidence)?;

    let is_biodegradable = biodegradability(payload, &primary_category);
    let secondary_category = secondary_category(payload, &primary_category, from_detailed_bio);
    let secondary_confidence =
        (primary_confidence as i64 - SECONDARY_CONFIDENCE_OFFSET).clamp(0, 100) as u8;

    let disposal_advice = payload
        .disposal_advice
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_DISPOSAL_ADVICE)
        .to_string();

    let combined_category = format!("{primary_category} / {secondary_category}");

    Ok(NormalizedClassification {
        item_name: payload
            .item_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        primary_category,
        primary_confidence,
        secondary_category,
        secondary_confidence,
        combined_category,
        is_biodegradable,
        disposal_advice,
    })
}

/// Resolve the primary category from whichever indicator the payload carries.
///
/// Returns the category text plus whether it was derived from the detailed
/// biodegradability fields (which changes how the secondary is derived).
fn primary_category(
    payload: &ClassificationPayload,
) -> Result<(String, bool), NormalizeError> {
    let direct = payload
        .category
        .as_deref()
        .or(payload.primary_category.as_deref())
        .map(str::trim)
        .filter(|s| !s.is_empty());

    if let Some(text) = direct {
        return Ok((text.to_string(), false));
    }

    // Detailed variant: derive from biodegradability when no category field.
    if let Some(bio) = payload.biodegradable.as_deref() {
        let is_bio = !bio.trim().to_lowercase().starts_with("non");
        return Ok((detailed_primary(is_bio), true));
    }
    if let Some(flag) = payload.is_biodegradable {
        return Ok((detailed_primary(flag), true));
    }

    Err(NormalizeError::MissingField("category"))
}

fn detailed_primary(is_biodegradable: bool) -> String {
    if is_biodegradable {
        "Biodegradable".to_string()
    } else {
        "Non-biodegradable".to_string()
    }
}

/// Map a confidence value to a clamped 0–100 integer.
fn normalize_confidence(value: &ConfidenceValue) -> Result<u8, NormalizeError> {
    match value {
        ConfidenceValue::Number(n) => Ok(n.round().clamp(0.0, 100.0) as u8),
        ConfidenceValue::Text(text) => match text.trim().to_lowercase().as_str() {
            "high" => Ok(CONFIDENCE_HIGH),
            "medium" => Ok(CONFIDENCE_MEDIUM),
            "low" => Ok(CONFIDENCE_LOW),
            _ => Err(NormalizeError::InvalidConfidenceValue(text.clone())),
        },
    }
}

/// Resolve the biodegradability flag.
///
/// Precedence: explicit boolean, then the textual `biodegradable` field,
/// then substring inference on the primary text. The inference deliberately
/// also matches inside "non-biodegradable" — long-standing behavior that
/// downstream consumers compensate for.
fn biodegradability(payload: &ClassificationPayload, primary: &str) -> bool {
    if let Some(flag) = payload.is_biodegradable {
        return flag;
    }
    if let Some(bio) = payload.biodegradable.as_deref() {
        return !bio.trim().to_lowercase().starts_with("non");
    }
    primary.to_lowercase().contains("biodegradable")
}

/// Resolve the secondary category.
///
/// Precedence: supplied by the model, then the moisture state (detailed
/// variant only), then the association-table derivation.
fn secondary_category(
    payload: &ClassificationPayload,
    primary: &str,
    from_detailed_bio: bool,
) -> String {
    if let Some(supplied) = payload
        .secondary_category
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        return supplied.to_string();
    }

    if from_detailed_bio {
        if let Some(moisture) = payload.moisture.as_deref() {
            return if moisture.to_lowercase().contains("wet") {
                "Wet".to_string()
            } else {
                "Dry".to_string()
            };
        }
    }

    derive_secondary(primary)
}

/// First association whose keyword is NOT a substring of the primary text.
pub fn derive_secondary(primary: &str) -> String {
    let primary_lower = primary.to_lowercase();
    SECONDARY_ASSOCIATIONS
        .iter()
        .find(|(keyword, _)| !primary_lower.contains(keyword))
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| DEFAULT_SECONDARY_CATEGORY.to_string())
}
