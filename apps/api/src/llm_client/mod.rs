//! LLM Client — the single point of entry for all Gemini API calls.
//!
//! ARCHITECTURAL RULE: No other module may call the Gemini API directly.
//! All LLM interactions MUST go through this module.
//!
//! The client supports two modes: plain text completion (legacy skill
//! extraction) and schema-constrained JSON completion (`responseMimeType` +
//! `responseSchema`), which is what guarantees every field of the structured
//! outputs exists without defensive parsing downstream.

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// The model used for all LLM calls.
pub const MODEL: &str = "gemini-1.5-flash";

/// Per-call timeout. A hanging upstream call surfaces as an error rather
/// than stalling the request indefinitely. No automatic retries: a failed
/// call is surfaced immediately and the caller retries the whole request.
const CALL_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(90);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// The language-model seam. Handlers build a `GeminiClient` per request (the
/// key is per-user); tests inject a deterministic stub.
#[async_trait]
pub trait TextModel: Send + Sync {
    /// Plain text completion.
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;

    /// JSON-mode completion. When `schema` is provided the model output is
    /// constrained server-side to conform to it. Returns the raw JSON text.
    async fn complete_structured(
        &self,
        prompt: &str,
        schema: Option<&Value>,
        max_output_tokens: Option<u32>,
    ) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig<'a> {
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'a str,
    #[serde(rename = "responseSchema", skip_serializing_if = "Option::is_none")]
    response_schema: Option<&'a Value>,
    #[serde(rename = "maxOutputTokens", skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GeminiResponse {
    fn text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().find_map(|p| p.text))
    }
}

#[derive(Debug, Deserialize)]
struct GeminiApiError {
    error: GeminiApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiApiErrorBody {
    message: String,
}

/// Gemini REST client. The base URL and the per-user key are fixed at
/// construction; the underlying `reqwest::Client` is shared across requests.
#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    api_base: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(http: Client, api_base: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            api_base: api_base.into(),
            api_key: api_key.into(),
        }
    }

    async fn generate(&self, request: &GeminiRequest<'_>) -> Result<String, LlmError> {
        let url = format!("{}/{}:generateContent", self.api_base, MODEL);

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .timeout(CALL_TIMEOUT)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GeminiResponse = response.json().await?;
        let text = parsed.text().ok_or(LlmError::EmptyContent)?;
        debug!("LLM call succeeded ({} chars returned)", text.len());
        Ok(text)
    }
}

#[async_trait]
impl TextModel for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt }],
            }],
            generation_config: None,
        };
        self.generate(&request).await
    }

    async fn complete_structured(
        &self,
        prompt: &str,
        schema: Option<&Value>,
        max_output_tokens: Option<u32>,
    ) -> Result<String, LlmError> {
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt }],
            }],
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json",
                response_schema: schema,
                max_output_tokens,
            }),
        };
        self.generate(&request).await
    }
}

/// Deserializes LLM output as JSON after stripping any markdown fences the
/// model may have wrapped it in.
pub fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T, LlmError> {
    serde_json::from_str(strip_json_fences(text)).map_err(LlmError::Parse)
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_parse_json_into_vec() {
        let skills: Vec<String> = parse_json("```json\n[\"Rust\", \"SQL\"]\n```").unwrap();
        assert_eq!(skills, vec!["Rust".to_string(), "SQL".to_string()]);
    }

    #[test]
    fn test_gemini_response_text_takes_first_part() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"text":"hello"}]}}]}"#;
        let response: GeminiResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.text().as_deref(), Some("hello"));
    }

    #[test]
    fn test_gemini_response_empty_candidates() {
        let raw = r#"{"candidates":[]}"#;
        let response: GeminiResponse = serde_json::from_str(raw).unwrap();
        assert!(response.text().is_none());
    }
}
