use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};

use greenroom_types::api::{Claims, SubmitFeedbackRequest};

use crate::AppState;
use crate::bookings::join_error;
use crate::error::ApiError;
use crate::middleware::require_hr;

/// Upsert feedback for a booking; the first submission also completes it.
pub async fn submit_feedback(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<SubmitFeedbackRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_hr(&claims)?;

    let scheduler = state.scheduler.clone();
    let feedback = tokio::task::spawn_blocking(move || scheduler.submit_feedback(claims.sub, req))
        .await
        .map_err(join_error)??;

    Ok((StatusCode::CREATED, Json(feedback)))
}
