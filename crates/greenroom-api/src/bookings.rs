use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::error;
use uuid::Uuid;

use greenroom_types::api::{Claims, CreateBookingRequest, UpdateBookingRequest};

use crate::AppState;
use crate::error::ApiError;
use crate::middleware::require_hr;

/// HR sees every booking; everyone else only those they participate in.
pub async fn list_bookings(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let scheduler = state.scheduler.clone();
    let bookings = tokio::task::spawn_blocking(move || scheduler.list_for(claims.sub, claims.role))
        .await
        .map_err(join_error)??;

    Ok(Json(bookings))
}

pub async fn create_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_hr(&claims)?;

    let scheduler = state.scheduler.clone();
    let booking = tokio::task::spawn_blocking(move || scheduler.create(claims.sub, req))
        .await
        .map_err(join_error)??;

    Ok((StatusCode::CREATED, Json(booking)))
}

pub async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let scheduler = state.scheduler.clone();
    let booking = tokio::task::spawn_blocking(move || scheduler.get(id, claims.sub, claims.role))
        .await
        .map_err(join_error)??;

    Ok(Json(booking))
}

/// Resolve a booking by its room token, the lookup the interview room UI
/// does before connecting to the gateway.
pub async fn get_booking_by_room(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let scheduler = state.scheduler.clone();
    let booking =
        tokio::task::spawn_blocking(move || scheduler.get_by_room(&room_id, claims.sub, claims.role))
            .await
            .map_err(join_error)??;

    Ok(Json(booking))
}

pub async fn update_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<UpdateBookingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_hr(&claims)?;

    let scheduler = state.scheduler.clone();
    let booking = tokio::task::spawn_blocking(move || scheduler.update(id, req))
        .await
        .map_err(join_error)??;

    Ok(Json(booking))
}

/// DELETE never removes the row; it transitions the booking to cancelled.
pub async fn cancel_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    require_hr(&claims)?;

    let scheduler = state.scheduler.clone();
    let booking = tokio::task::spawn_blocking(move || scheduler.cancel(id))
        .await
        .map_err(join_error)??;

    Ok(Json(booking))
}

pub(crate) fn join_error(e: tokio::task::JoinError) -> ApiError {
    error!("spawn_blocking join error: {e}");
    ApiError::Internal
}
