//! Isolate the JSON payload from the model's free-form answer.

use super::ParseError;

const FENCE_OPEN: &str = "```json";
const FENCE_CLOSE: &str = "```";

/// Extract the JSON object embedded in `raw_text`.
///
/// Fenced path: the content strictly between the first ```` ```json ````
/// opener and the next closing fence. Otherwise a greedy outer-brace scan
/// (first `{` to last `}`, inclusive) tolerates explanatory prose around
/// the payload. The candidate must parse as a JSON object — anything else
/// is `MalformedJson`.
///
/// Idempotent on its own output: an already-bare JSON object comes back
/// unchanged.
pub fn extract(raw_text: &str) -> Result<String, ParseError> {
    let candidate = match fenced_block(raw_text) {
        Some(inner) => inner.to_string(),
        None => brace_span(raw_text)
            .ok_or(ParseError::NoJsonFound)?
            .to_string(),
    };

    let value: serde_json::Value =
        serde_json::from_str(&candidate).map_err(|e| ParseError::MalformedJson(e.to_string()))?;
    if !value.is_object() {
        return Err(ParseError::MalformedJson(
            "top-level value is not an object".to_string(),
        ));
    }

    Ok(candidate)
}

/// Content between the first ```` ```json ```` marker and the next closing
/// fence. An unclosed fence returns `None` so the brace scan can still
/// salvage the payload.
fn fenced_block(text: &str) -> Option<&str> {
    let open = text.find(FENCE_OPEN)?;
    let content_start = open + FENCE_OPEN.len();
    let close = text[content_start..].find(FENCE_CLOSE)?;
    Some(text[content_start..content_start + close].trim())
}

/// Greedy outer-brace span: first `{` to last `}`, inclusive.
fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fenced_payload_extracted() {
        let raw = "Here you go:\n```json\n{\"category\":\"Recyclable\",\"confidence\":85}\n```";
        assert_eq!(
            extract(raw).unwrap(),
            r#"{"category":"Recyclable","confidence":85}"#
        );
    }

    #[test]
    fn bare_json_returned_unchanged() {
        let raw = r#"{"category":"Recyclable","confidence":85}"#;
        assert_eq!(extract(raw).unwrap(), raw);
    }

    #[test]
    fn extraction_is_idempotent() {
        let raw = "Sure!\n```json\n{\"category\":\"E-waste\",\"confidence\":40}\n```\nHope that helps.";
        let once = extract(raw).unwrap();
        let twice = extract(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn prose_around_braces_tolerated() {
        let raw = "The item looks like {\"category\":\"Hazardous\",\"confidence\":70} to me.";
        assert_eq!(
            extract(raw).unwrap(),
            r#"{"category":"Hazardous","confidence":70}"#
        );
    }

    #[test]
    fn unclosed_fence_falls_back_to_brace_scan() {
        let raw = "```json\n{\"category\":\"Recyclable\",\"confidence\":85}";
        assert_eq!(
            extract(raw).unwrap(),
            r#"{"category":"Recyclable","confidence":85}"#
        );
    }

    #[test]
    fn no_braces_is_no_json_found() {
        let result = extract("I cannot classify this image.");
        assert!(matches!(result, Err(ParseError::NoJsonFound)));
    }

    #[test]
    fn invalid_json_is_malformed() {
        let result = extract("{category: not quoted}");
        assert!(matches!(result, Err(ParseError::MalformedJson(_))));
    }

    #[test]
    fn fenced_non_object_is_malformed() {
        let result = extract("```json\n[1, 2, 3]\n```");
        assert!(matches!(result, Err(ParseError::MalformedJson(_))));
    }

    #[test]
    fn greedy_scan_spans_nested_objects() {
        let raw = "note {\"a\":{\"b\":1},\"confidence\":5} done";
        assert_eq!(extract(raw).unwrap(), r#"{"a":{"b":1},"confidence":5}"#);
    }
}
