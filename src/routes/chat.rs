use axum::extract::rejection::JsonRejection;
use axum::body::Bytes;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::models::{
    session_key, GenerateRequest, GenerateResponse, RawGenerateRequest, ResetRequest,
    ResetResponse,
};
use crate::state::AppState;

pub const RESET_MESSAGE: &str = "Conversation history reset.";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/generate", post(generate))
        .route("/reset", post(reset))
        .route("/aayush-generate", post(raw_generate))
}

/// POST /generate
///
/// Request body:
/// {
///   "user_input": "Where should I invest?",
///   "budget_amt": 100000 (optional),
///   "budget_type": "Medium" (optional),
///   "risk_apetite": "High" (optional),
///   "session_id": "..." (optional)
/// }
pub async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::from(e.body_text()))?;
    let session_id = session_key(request.session_id.as_deref());
    info!("POST /generate - session {}", session_id);

    let response = state
        .chat
        .generate_advice(session_id, request.user_input.as_deref(), &request.advisory_params())
        .await
        .map_err(|e| {
            error!("Failed to generate advice for session {}: {}", session_id, e);
            e
        })?;

    Ok(Json(GenerateResponse { response }))
}

/// POST /reset
///
/// Clears the transcript of the given session (or the default one). The body
/// is optional; when present it must be a valid `ResetRequest`.
pub async fn reset(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ResetResponse>, AppError> {
    let request = parse_reset_body(&body)?;
    let session_id = session_key(request.session_id.as_deref());
    info!("POST /reset - session {}", session_id);

    state.chat.reset(session_id).await;

    Ok(Json(ResetResponse {
        message: RESET_MESSAGE.to_string(),
    }))
}

fn parse_reset_body(body: &[u8]) -> Result<ResetRequest, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ResetRequest::default());
    }
    serde_json::from_slice(body).map_err(|e| {
        warn!("Rejected /reset body: {}", e);
        AppError::Validation(format!("Invalid reset request: {}", e))
    })
}

/// POST /aayush-generate
///
/// Sends the raw transcript, without the advisory instruction.
/// Request body: { "input": "...", "session_id": "..." (optional) }
pub async fn raw_generate(
    State(state): State<AppState>,
    payload: Result<Json<RawGenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::from(e.body_text()))?;
    let session_id = session_key(request.session_id.as_deref());
    info!("POST /aayush-generate - session {}", session_id);

    let response = state
        .chat
        .generate_raw(session_id, request.input.as_deref())
        .await
        .map_err(|e| {
            error!("Failed to generate raw reply for session {}: {}", session_id, e);
            e
        })?;

    Ok(Json(GenerateResponse { response }))
}
