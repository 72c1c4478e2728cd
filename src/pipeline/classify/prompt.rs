//! Classification prompts sent with the canonical image.
//!
//! Two strategies, like the two payload shapes:
//! - the simple prompt asks for top-level category + numeric confidence
//! - the detailed prompt asks for biodegradability, moisture and item
//!   details with textual confidence
//!
//! Both instruct the model to answer in JSON; the extractor tolerates the
//! fences and prose the model adds anyway.

/// Simple classification: category + numeric confidence.
pub const CLASSIFY_PROMPT: &str = "\
Classify this image of waste into one of these categories:
1. Biodegradable (wet/dry)
2. Recyclable (paper/plastic/metal/glass)
3. E-waste
4. Hazardous
5. Non-recyclable

Return the response in JSON format with these fields:
- category: The primary waste category
- confidence: Your confidence level (0-100)
- reason: A brief explanation
- disposal_advice: How to properly dispose of this item";

/// Detailed classification: biodegradability, moisture, item specifics.
pub const DETAILED_CLASSIFY_PROMPT: &str = "\
Analyze this waste item and provide a detailed classification based on the following criteria:

1. Primary Category (choose one):
   - Organic (food waste, plant material, paper products)
   - Recyclable (plastics, glass, metals, paper/cardboard)
   - Hazardous (batteries, electronics, chemicals)
   - General Waste (non-recyclable, non-hazardous items)

2. Secondary Category: be specific about the material and form (e.g. 'plastic bottle', 'food container')

3. Biodegradability: biodegradable or non-biodegradable

4. Moisture content: wet or dry

5. Confidence level: high, medium or low

Return ONLY a JSON object with the following structure:
{
    \"primary_category\": \"chosen primary category\",
    \"secondary_category\": \"specific item type\",
    \"biodegradable\": \"biodegradable or non-biodegradable\",
    \"moisture\": \"wet or dry\",
    \"item_name\": \"common name of the item\",
    \"confidence\": \"high/medium/low\",
    \"disposal_advice\": \"specific disposal instructions\"
}";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_prompt_asks_for_json_fields() {
        assert!(CLASSIFY_PROMPT.contains("JSON"));
        assert!(CLASSIFY_PROMPT.contains("category"));
        assert!(CLASSIFY_PROMPT.contains("confidence"));
    }

    #[test]
    fn detailed_prompt_covers_detailed_variant_fields() {
        for field in [
            "primary_category",
            "secondary_category",
            "biodegradable",
            "moisture",
            "item_name",
            "confidence",
            "disposal_advice",
        ] {
            assert!(
                DETAILED_CLASSIFY_PROMPT.contains(field),
                "missing field {field}"
            );
        }
    }
}
