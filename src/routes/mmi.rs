use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use tracing::{error, info};

use crate::errors::{error_body, AppError};
use crate::models::MoodIndexRequest;
use crate::services::mood_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/mmi", post(post_market_mood_index))
}

/// POST /mmi
///
/// Request body:
/// {
///   "symbol": "^BSESN" (optional),
///   "start_date": "2024-01-01",
///   "end_date": "2024-03-31"
/// }
///
/// Returns the share of positive/negative/neutral days in percent. Failures
/// while fetching or computing come back as `{"error": ...}` with status 200.
pub async fn post_market_mood_index(
    State(state): State<AppState>,
    payload: Result<Json<MoodIndexRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload.map_err(|e| AppError::from(e.body_text()))?;

    let (Some(start_date), Some(end_date)) = (
        request.start_date.as_deref().filter(|d| !d.is_empty()),
        request.end_date.as_deref().filter(|d| !d.is_empty()),
    ) else {
        return Err(AppError::Validation(
            "Please provide both start_date and end_date in the JSON body.".to_string(),
        ));
    };

    info!("POST /mmi - {} from {} to {}", request.symbol, start_date, end_date);

    let result = mood_service::calculate_market_mood_index(
        state.price_provider.as_ref(),
        &request.symbol,
        start_date,
        end_date,
    )
    .await;

    match result {
        Ok(distribution) => Ok(Json(distribution).into_response()),
        Err(e) => {
            error!("Failed to compute mood index for {}: {}", request.symbol, e);
            Ok(error_body(e).into_response())
        }
    }
}
