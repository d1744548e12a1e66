use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::external::price_provider::PriceProviderError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Chat(#[from] ChatError),
}

/// Failures of the generative-language provider.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("request to language model timed out")]
    Timeout,
    #[error("network error: {0}")]
    NetworkError(String),
    #[error("rate limited by language model provider")]
    RateLimited,
    #[error("language model API error: {0}")]
    ApiError(String),
    #[error("invalid response from language model: {0}")]
    InvalidResponse(String),
    #[error("language model returned no text")]
    EmptyResponse,
}

/// Errors of the chat dispatchers.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("{0}")]
    MissingInput(&'static str),
    #[error("Empty response from the model.")]
    EmptyModelResponse,
    #[error("{0}")]
    ModelCall(LlmError),
}

impl From<LlmError> for ChatError {
    fn from(value: LlmError) -> Self {
        match value {
            LlmError::EmptyResponse => ChatError::EmptyModelResponse,
            other => ChatError::ModelCall(other),
        }
    }
}

/// Errors while computing the Market Mood Index. These are reported to the
/// caller inside a 200 response, never as a transport failure.
#[derive(Debug, Error)]
pub enum MoodError {
    #[error("No data found for the given symbol and date range.")]
    NoData,
    #[error("Not enough data points to compute daily changes.")]
    InsufficientData,
    #[error("Invalid date '{0}', expected YYYY-MM-DD.")]
    InvalidDate(String),
    #[error("start_date must be before end_date.")]
    InvalidRange,
    #[error(transparent)]
    Provider(#[from] PriceProviderError),
}

/// Startup configuration problems.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
    #[error("invalid value for {name}: {value}")]
    InvalidVar { name: &'static str, value: String },
}

pub fn error_body(message: impl std::fmt::Display) -> Json<serde_json::Value> {
    Json(json!({ "error": message.to_string() }))
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, error_body(msg)).into_response(),
            AppError::Chat(ChatError::MissingInput(msg)) => {
                (StatusCode::BAD_REQUEST, error_body(msg)).into_response()
            }
            AppError::Chat(err) => (StatusCode::INTERNAL_SERVER_ERROR, error_body(err)).into_response(),
        }
    }
}

impl From<String> for AppError {
    fn from(value: String) -> Self {
        AppError::Validation(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_llm_response_maps_to_empty_model_response() {
        let err: ChatError = LlmError::EmptyResponse.into();
        assert!(matches!(err, ChatError::EmptyModelResponse));
    }

    #[test]
    fn test_other_llm_errors_keep_message() {
        let err: ChatError = LlmError::ApiError("HTTP 403: denied".to_string()).into();
        assert!(matches!(err, ChatError::ModelCall(_)));
        assert_eq!(err.to_string(), "language model API error: HTTP 403: denied");
    }

    #[test]
    fn test_status_codes() {
        let missing = AppError::Chat(ChatError::MissingInput("missing")).into_response();
        assert_eq!(missing.status(), StatusCode::BAD_REQUEST);

        let failed = AppError::Chat(ChatError::EmptyModelResponse).into_response();
        assert_eq!(failed.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let invalid = AppError::Validation("bad body".to_string()).into_response();
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
    }
}
