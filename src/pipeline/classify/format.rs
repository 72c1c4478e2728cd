//! Presentation projection — decorated labels over the normalized data.

use serde::Serialize;

use super::types::NormalizedClassification;

/// Shown when the model supplied no item name.
pub const DEFAULT_ITEM_NAME: &str = "Unknown item";

/// Confidence bucket boundaries: >=70 High, 30–69 Medium, <30 Low.
const BUCKET_HIGH: u8 = 70;
const BUCKET_MEDIUM: u8 = 30;

/// The human-facing projection handed to the presentation layer.
///
/// Serializes with the fixed keys the route layer contracts on. The full
/// `NormalizedClassification` rides along under `raw_data` for diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct DisplayResult {
    pub success: bool,
    pub item_name: String,
    pub primary_category: String,
    pub primary_confidence: u8,
    pub confidence_label: String,
    pub secondary_category: String,
    pub secondary_confidence: u8,
    pub combined_category: String,
    pub is_biodegradable: bool,
    pub biodegradable_label: String,
    pub disposal_advice: String,
    pub raw_data: NormalizedClassification,
}

/// Project a normalized classification for display.
///
/// Pure and total: never fails, every key populated, documented defaults
/// for absent optional fields.
pub fn format(normalized: &NormalizedClassification) -> DisplayResult {
    let bucket = confidence_bucket(normalized.primary_confidence);
    let primary_lower = normalized.primary_category.to_lowercase();

    DisplayResult {
        success: true,
        item_name: title_case(
            normalized.item_name.as_deref().unwrap_or(DEFAULT_ITEM_NAME),
        ),
        primary_category: format!(
            "{} {}",
            category_icon(&primary_lower),
            title_case(&normalized.primary_category)
        ),
        primary_confidence: normalized.primary_confidence,
        confidence_label: format!("{} {}", confidence_icon(bucket), bucket),
        secondary_category: format!("📦 {}", title_case(&normalized.secondary_category)),
        secondary_confidence: normalized.secondary_confidence,
        combined_category: normalized.combined_category.clone(),
        is_biodegradable: normalized.is_biodegradable,
        biodegradable_label: if normalized.is_biodegradable {
            "♻️ Biodegradable".to_string()
        } else {
            "⛔ Non-Biodegradable".to_string()
        },
        disposal_advice: normalized.disposal_advice.clone(),
        raw_data: normalized.clone(),
    }
}

/// The failure projection: `{ "success": false, "error": <message> }`.
pub fn failure_value(message: &str) -> serde_json::Value {
    serde_json::json!({
        "success": false,
        "error": message,
    })
}

/// Bucket a numeric confidence into High / Medium / Low.
pub fn confidence_bucket(confidence: u8) -> &'static str {
    if confidence >= BUCKET_HIGH {
        "High"
    } else if confidence >= BUCKET_MEDIUM {
        "Medium"
    } else {
        "Low"
    }
}

fn confidence_icon(bucket: &str) -> &'static str {
    match bucket {
        "High" => "🔵",
        "Medium" => "🟢",
        _ => "🟠",
    }
}

/// Icon key for a (lower-cased) primary category.
fn category_icon(primary_lower: &str) -> &'static str {
    if primary_lower.contains("organic") || primary_lower.contains("biodegradable") {
        "🌱"
    } else if primary_lower.contains("recycl") {
        "♻️"
    } else if primary_lower.contains("hazard") {
        "⚠️"
    } else if primary_lower.contains("e-waste") || primary_lower.contains("electronic") {
        "🔌"
    } else {
        "🗑️"
    }
}

/// Title-case free text: capitalize the letter after every non-letter.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut boundary = true;
    for c in text.chars() {
        if c.is_alphabetic() {
            if boundary {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            boundary = false;
        } else {
            out.push(c);
            boundary = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalized(primary: &str, confidence: u8) -> NormalizedClassification {
        NormalizedClassification {
            item_name: None,
            primary_category: primary.to_string(),
            primary_confidence: confidence,
            secondary_category: "Recyclable (paper)".to_string(),
            secondary_confidence: confidence.saturating_sub(10),
            combined_category: format!("{primary} / Recyclable (paper)"),
            is_biodegradable: false,
            disposal_advice: "Rinse and recycle.".to_string(),
        }
    }

    #[test]
    fn buckets_follow_fixed_boundaries() {
        assert_eq!(confidence_bucket(100), "High");
        assert_eq!(confidence_bucket(70), "High");
        assert_eq!(confidence_bucket(69), "Medium");
        assert_eq!(confidence_bucket(30), "Medium");
        assert_eq!(confidence_bucket(29), "Low");
        assert_eq!(confidence_bucket(0), "Low");
    }

    #[test]
    fn title_case_handles_hyphens_and_words() {
        assert_eq!(title_case("plastic bottle"), "Plastic Bottle");
        assert_eq!(title_case("e-waste"), "E-Waste");
        assert_eq!(title_case("ALUMINUM CAN"), "Aluminum Can");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn missing_item_name_defaults() {
        let result = format(&normalized("Recyclable", 85));
        assert_eq!(result.item_name, "Unknown Item");
    }

    #[test]
    fn decorated_labels_carry_icons() {
        let result = format(&normalized("Recyclable", 85));
        assert_eq!(result.primary_category, "♻️ Recyclable");
        assert_eq!(result.confidence_label, "🔵 High");
        assert_eq!(result.secondary_category, "📦 Recyclable (Paper)");
        assert_eq!(result.biodegradable_label, "⛔ Non-Biodegradable");
    }

    #[test]
    fn hazardous_and_organic_icons() {
        assert!(format(&normalized("Hazardous", 50))
            .primary_category
            .starts_with("⚠️"));
        assert!(format(&normalized("Organic", 50))
            .primary_category
            .starts_with("🌱"));
        assert!(format(&normalized("E-waste", 50))
            .primary_category
            .starts_with("🔌"));
        assert!(format(&normalized("Mystery", 50))
            .primary_category
            .starts_with("🗑️"));
    }

    #[test]
    fn raw_data_retained_verbatim() {
        let n = normalized("Recyclable", 42);
        let result = format(&n);
        assert_eq!(result.raw_data, n);
        assert_eq!(result.raw_data.primary_category, "Recyclable");
    }

    #[test]
    fn serialization_exposes_all_contract_keys() {
        let value = serde_json::to_value(format(&normalized("Recyclable", 85))).unwrap();
        let object = value.as_object().unwrap();
        for key in [
            "success",
            "item_name",
            "primary_category",
            "primary_confidence",
            "secondary_category",
            "secondary_confidence",
            "combined_category",
            "is_biodegradable",
            "disposal_advice",
            "confidence_label",
            "raw_data",
        ] {
            assert!(object.contains_key(key), "missing key {key}");
        }
        assert_eq!(object["success"], serde_json::json!(true));
    }

    #[test]
    fn failure_projection_has_only_success_and_error() {
        let value = failure_value("not a valid image");
        assert_eq!(
            value,
            serde_json::json!({"success": false, "error": "not a valid image"})
        );
    }
}
