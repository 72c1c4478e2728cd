//! Gemini vision client — the external classification capability.
//!
//! The pipeline never talks to the provider directly; it holds a
//! `dyn VisionModel` and receives raw text back. Provider failures are
//! re-expressed in `UpstreamError` here, at the boundary, so the rest of
//! the crate never sees a provider-specific error type.
//!
//! Model selection mirrors the hosted API's release cadence: an ordered
//! preference list (`config::GEMINI_MODELS`), resolved against the live
//! model listing. No ambient global — the resolved client is passed
//! explicitly to the pipeline boundary.

use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::config;

/// Errors from the hosted model boundary.
///
/// Everything the provider can throw at us collapses into this taxonomy —
/// quota, safety blocks, and transport failures stay distinguishable so the
/// caller can phrase them differently.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("{0} not set in the environment")]
    MissingApiKey(&'static str),

    #[error("no preferred vision model available")]
    NoModelAvailable,

    #[error("model quota exceeded — check your API plan limits")]
    QuotaExceeded,

    #[error("response blocked by the provider: {0}")]
    Blocked(String),

    #[error("model endpoint unreachable: {0}")]
    Unavailable(String),

    #[error("model API error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("unexpected response shape: {0}")]
    ResponseShape(String),
}

/// A vision-capable model: canonical JPEG bytes + prompt in, raw text out.
///
/// The only seam the pipeline depends on. Production implementation is
/// `GeminiClient`; tests use `MockVisionModel`.
pub trait VisionModel: Send + Sync {
    fn generate(&self, image_jpeg: &[u8], prompt: &str) -> Result<String, UpstreamError>;

    fn model_name(&self) -> &str;
}

/// Gemini REST client (`generateContent`), blocking.
pub struct GeminiClient {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl GeminiClient {
    /// Create a client for a specific model.
    pub fn new(api_key: &str, model: &str, timeout_secs: u64) -> Result<Self, UpstreamError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| UpstreamError::Unavailable(e.to_string()))?;

        Ok(Self {
            base_url: config::GEMINI_BASE_URL.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            client,
            timeout_secs,
        })
    }

    /// Build from the environment, defaulting to the most-preferred model.
    ///
    /// Call `resolve_model()` afterwards to reconcile against what the
    /// account can actually serve.
    pub fn from_env() -> Result<Self, UpstreamError> {
        let api_key = std::env::var(config::GEMINI_API_KEY_ENV)
            .map_err(|_| UpstreamError::MissingApiKey(config::GEMINI_API_KEY_ENV))?;
        Self::new(&api_key, config::GEMINI_MODELS[0], config::GEMINI_TIMEOUT_SECS)
    }

    /// Point at a different base URL (tests, proxies).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Find the best available model from the ordered preference list.
    pub fn resolve_model(&self) -> Result<String, UpstreamError> {
        let available = self.list_models()?;
        for preferred in config::GEMINI_MODELS {
            if available.iter().any(|m| model_matches(m, preferred)) {
                return Ok(preferred.to_string());
            }
        }
        Err(UpstreamError::NoModelAvailable)
    }

    /// Switch to a (resolved) model name.
    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    /// List model names visible to this API key.
    pub fn list_models(&self) -> Result<Vec<String>, UpstreamError> {
        let url = format!("{}/models?key={}", self.base_url, self.api_key);

        let response = self.client.get(&url).send().map_err(map_transport_error)?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(UpstreamError::QuotaExceeded);
        }
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(UpstreamError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ModelListResponse = response
            .json()
            .map_err(|e| UpstreamError::ResponseShape(e.to_string()))?;

        Ok(parsed
            .models
            .unwrap_or_default()
            .into_iter()
            .map(|m| m.name)
            .collect())
    }
}

/// The listing returns fully-qualified names (`models/gemini-2.5-flash`).
fn model_matches(listed: &str, preferred: &str) -> bool {
    listed
        .rsplit('/')
        .next()
        .map(|name| name.starts_with(preferred))
        .unwrap_or(false)
}

fn map_transport_error(e: reqwest::Error) -> UpstreamError {
    if e.is_connect() {
        UpstreamError::Unavailable(format!("connection failed: {e}"))
    } else if e.is_timeout() {
        UpstreamError::Unavailable("request timed out".to_string())
    } else {
        UpstreamError::Unavailable(e.to_string())
    }
}

// ──────────────────────────────────────────────
// Wire types (generateContent REST)
// ──────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum RequestPart<'a> {
    Text {
        text: &'a str,
    },
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: &'static str,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Option<Vec<CandidatePart>>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct ModelListResponse {
    models: Option<Vec<ListedModel>>,
}

#[derive(Deserialize)]
struct ListedModel {
    name: String,
}

impl VisionModel for GeminiClient {
    fn generate(&self, image_jpeg: &[u8], prompt: &str) -> Result<String, UpstreamError> {
        let _span = tracing::info_span!(
            "gemini_generate",
            model = %self.model,
            image_size = image_jpeg.len(),
        )
        .entered();
        let start = std::time::Instant::now();

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let body = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![
                    RequestPart::Text { text: prompt },
                    RequestPart::Inline {
                        inline_data: InlineData {
                            mime_type: "image/jpeg",
                            data: base64::engine::general_purpose::STANDARD.encode(image_jpeg),
                        },
                    },
                ],
            }],
            generation_config: GenerationConfig {
                // Low temperature for focused, parseable answers.
                temperature: 0.1,
                max_output_tokens: 1024,
            },
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    UpstreamError::Unavailable(format!(
                        "request timed out after {}s",
                        self.timeout_secs
                    ))
                } else {
                    map_transport_error(e)
                }
            })?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(UpstreamError::QuotaExceeded);
        }
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(UpstreamError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .map_err(|e| UpstreamError::ResponseShape(e.to_string()))?;

        if let Some(feedback) = &parsed.prompt_feedback {
            if let Some(reason) = &feedback.block_reason {
                return Err(UpstreamError::Blocked(reason.clone()));
            }
        }

        let text = first_candidate_text(&parsed)
            .ok_or_else(|| UpstreamError::Blocked("empty response from model".to_string()))?;

        tracing::info!(
            model = %self.model,
            elapsed_ms = %start.elapsed().as_millis(),
            text_len = text.len(),
            "Vision classification call complete"
        );

        Ok(text)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Concatenated text of the first candidate, `None` if empty.
fn first_candidate_text(response: &GenerateResponse) -> Option<String> {
    let parts = response
        .candidates
        .as_ref()?
        .first()?
        .content
        .as_ref()?
        .parts
        .as_ref()?;

    let text: String = parts
        .iter()
        .filter_map(|p| p.text.as_deref())
        .collect::<Vec<_>>()
        .join("");

    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

// ──────────────────────────────────────────────
// Mock (testing)
// ──────────────────────────────────────────────

/// Mock vision model — returns a configurable response or failure.
pub struct MockVisionModel {
    response: String,
    failure: Option<MockFailure>,
}

#[derive(Clone, Copy)]
enum MockFailure {
    Quota,
    Blocked,
    Unavailable,
}

impl MockVisionModel {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            failure: None,
        }
    }

    pub fn failing_quota() -> Self {
        Self {
            response: String::new(),
            failure: Some(MockFailure::Quota),
        }
    }

    pub fn failing_blocked() -> Self {
        Self {
            response: String::new(),
            failure: Some(MockFailure::Blocked),
        }
    }

    pub fn failing_unavailable() -> Self {
        Self {
            response: String::new(),
            failure: Some(MockFailure::Unavailable),
        }
    }
}

impl VisionModel for MockVisionModel {
    fn generate(&self, _image_jpeg: &[u8], _prompt: &str) -> Result<String, UpstreamError> {
        match self.failure {
            Some(MockFailure::Quota) => Err(UpstreamError::QuotaExceeded),
            Some(MockFailure::Blocked) => {
                Err(UpstreamError::Blocked("SAFETY".to_string()))
            }
            Some(MockFailure::Unavailable) => {
                Err(UpstreamError::Unavailable("mock outage".to_string()))
            }
            None => Ok(self.response.clone()),
        }
    }

    fn model_name(&self) -> &str {
        "mock-vision-model"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_returns_configured_response() {
        let model = MockVisionModel::new("raw text");
        let result = model.generate(&[0xFF], "prompt").unwrap();
        assert_eq!(result, "raw text");
        assert_eq!(model.model_name(), "mock-vision-model");
    }

    #[test]
    fn mock_failure_variants_map_to_taxonomy() {
        let quota = MockVisionModel::failing_quota().generate(&[], "p");
        assert!(matches!(quota, Err(UpstreamError::QuotaExceeded)));

        let blocked = MockVisionModel::failing_blocked().generate(&[], "p");
        assert!(matches!(blocked, Err(UpstreamError::Blocked(_))));

        let down = MockVisionModel::failing_unavailable().generate(&[], "p");
        assert!(matches!(down, Err(UpstreamError::Unavailable(_))));
    }

    #[test]
    fn model_matches_fully_qualified_names() {
        assert!(model_matches("models/gemini-2.5-flash", "gemini-2.5-flash"));
        assert!(model_matches(
            "models/gemini-2.0-flash-001",
            "gemini-2.0-flash"
        ));
        assert!(!model_matches("models/gemini-2.5-flash", "gemini-pro-vision"));
        assert!(model_matches("gemini-pro-vision", "gemini-pro-vision"));
    }

    #[test]
    fn request_serializes_camel_case_wire_format() {
        let body = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![
                    RequestPart::Text { text: "classify" },
                    RequestPart::Inline {
                        inline_data: InlineData {
                            mime_type: "image/jpeg",
                            data: "AAAA".to_string(),
                        },
                    },
                ],
            }],
            generation_config: GenerationConfig {
                temperature: 0.1,
                max_output_tokens: 1024,
            },
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"generationConfig\""));
        assert!(json.contains("\"maxOutputTokens\":1024"));
        assert!(json.contains("\"inlineData\""));
        assert!(json.contains("\"mimeType\":\"image/jpeg\""));
    }

    #[test]
    fn response_text_extracted_from_first_candidate() {
        let raw = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "part one "}, {"text": "part two"}]}}
            ]
        }"#;
        let parsed: GenerateResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(
            first_candidate_text(&parsed).unwrap(),
            "part one part two"
        );
    }

    #[test]
    fn empty_candidates_read_as_blocked() {
        let raw = r#"{"candidates": []}"#;
        let parsed: GenerateResponse = serde_json::from_str(raw).unwrap();
        assert!(first_candidate_text(&parsed).is_none());
    }

    #[test]
    fn block_reason_deserializes() {
        let raw = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        let parsed: GenerateResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(
            parsed.prompt_feedback.unwrap().block_reason.as_deref(),
            Some("SAFETY")
        );
    }
}
