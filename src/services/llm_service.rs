use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::{ConfigError, LlmError};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 1024;

/// Configuration for the language model client
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub max_output_tokens: u32,
}

impl LlmConfig {
    /// Reads `GEMINI_API_KEY` (required), `GEMINI_MODEL`, `GEMINI_BASE_URL`
    /// and `LLM_MAX_OUTPUT_TOKENS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingVar("GEMINI_API_KEY"))?;

        let max_output_tokens = match std::env::var("LLM_MAX_OUTPUT_TOKENS") {
            Ok(value) => value.parse().map_err(|_| ConfigError::InvalidVar {
                name: "LLM_MAX_OUTPUT_TOKENS",
                value,
            })?,
            Err(_) => DEFAULT_MAX_OUTPUT_TOKENS,
        };

        Ok(Self {
            api_key,
            model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string()),
            base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_BASE_URL.to_string()),
            max_output_tokens,
        })
    }
}

/// Sampling settings sent with every completion request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub max_output_tokens: u32,
    pub temperature: f32,
}

/// Trait for LLM providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a completion from a prompt
    async fn generate_completion(
        &self,
        prompt: String,
        params: GenerationParams,
    ) -> Result<String, LlmError>;
}

/// Generative Language API request/response structures
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    usage_metadata: Option<GeminiUsage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

/// Extract the reply text of the first candidate, or `EmptyResponse` when the
/// model produced nothing usable (blocked prompt, no candidates, blank text).
fn extract_text(response: GeminiResponse) -> Result<String, LlmError> {
    let candidate = response.candidates
        .into_iter()
        .next()
        .ok_or(LlmError::EmptyResponse)?;

    let text: String = candidate.content
        .map(|content| {
            content.parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        if let Some(reason) = candidate.finish_reason {
            warn!("Model returned no text (finish reason: {})", reason);
        }
        return Err(LlmError::EmptyResponse);
    }

    Ok(text)
}

/// Google Generative Language API provider
pub struct GeminiProvider {
    api_key: String,
    model: String,
    base_url: String,
    client: Client,
}

impl GeminiProvider {
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| LlmError::NetworkError(e.to_string()))?;

        Ok(Self {
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn call_gemini(&self, request: &GeminiRequest) -> Result<GeminiResponse, LlmError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let response = self.client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout
                } else {
                    LlmError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();

        if status == 429 {
            return Err(LlmError::RateLimited);
        }

        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::ApiError(format!("HTTP {}: {}", status, error_text)));
        }

        response.json::<GeminiResponse>()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn generate_completion(
        &self,
        prompt: String,
        params: GenerationParams,
    ) -> Result<String, LlmError> {
        info!(
            "Generating LLM completion (model: {}, max_output_tokens: {}, temperature: {})",
            self.model, params.max_output_tokens, params.temperature
        );

        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: Some(prompt) }],
            }],
            generation_config: GeminiGenerationConfig {
                max_output_tokens: params.max_output_tokens,
                temperature: params.temperature,
            },
        };

        let mut response = self.call_gemini(&request).await?;

        if let Some(usage) = response.usage_metadata.take() {
            info!("LLM completion generated. Tokens: {} prompt + {} completion = {} total",
                  usage.prompt_token_count, usage.candidates_token_count, usage.total_token_count);
        }

        extract_text(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(json: serde_json::Value) -> GeminiResponse {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_request_serializes_to_generate_content_shape() {
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: Some("hello".to_string()) }],
            }],
            generation_config: GeminiGenerationConfig {
                max_output_tokens: 256,
                temperature: 0.5,
            },
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 256);
        assert_eq!(value["generationConfig"]["temperature"], 0.5);
    }

    #[test]
    fn test_extract_text_joins_parts_of_first_candidate() {
        let resp = response(serde_json::json!({
            "candidates": [
                { "content": { "parts": [{ "text": "Buy " }, { "text": "index funds." }] }, "finishReason": "STOP" },
                { "content": { "parts": [{ "text": "ignored" }] } }
            ],
            "usageMetadata": { "promptTokenCount": 10, "candidatesTokenCount": 4, "totalTokenCount": 14 }
        }));

        assert_eq!(extract_text(resp).unwrap(), "Buy index funds.");
    }

    #[test]
    fn test_extract_text_without_candidates_is_empty_response() {
        let resp = response(serde_json::json!({ "promptFeedback": { "blockReason": "SAFETY" } }));
        assert!(matches!(extract_text(resp), Err(LlmError::EmptyResponse)));
    }

    #[test]
    fn test_extract_text_blank_is_empty_response() {
        let resp = response(serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": "  " }] }, "finishReason": "MAX_TOKENS" }]
        }));
        assert!(matches!(extract_text(resp), Err(LlmError::EmptyResponse)));

        let resp = response(serde_json::json!({
            "candidates": [{ "finishReason": "SAFETY" }]
        }));
        assert!(matches!(extract_text(resp), Err(LlmError::EmptyResponse)));
    }
}
