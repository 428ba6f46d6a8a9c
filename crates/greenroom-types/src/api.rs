use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{BookingStatus, Recommendation, Role, Scores};

// -- JWT Claims --

/// Claims shared by the REST middleware and the WebSocket handshake.
/// Canonical definition lives here so both sides decode the same shape.
/// Token issuance belongs to the surrounding portal; we only verify.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: Role,
    pub exp: usize,
}

// -- Bookings --

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateBookingRequest {
    pub title: String,
    pub candidate_id: Uuid,
    pub interviewer_ids: Vec<Uuid>,
    pub scheduled_at: DateTime<Utc>,
    #[serde(default = "default_duration")]
    pub duration_minutes: i64,
    #[serde(default)]
    pub notes: String,
}

fn default_duration() -> i64 {
    60
}

/// Partial update: absent fields keep their stored values.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateBookingRequest {
    pub title: Option<String>,
    pub candidate_id: Option<Uuid>,
    pub interviewer_ids: Option<Vec<Uuid>>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i64>,
    pub status: Option<BookingStatus>,
    pub notes: Option<String>,
}

// -- Feedback --

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubmitFeedbackRequest {
    pub booking_id: Uuid,
    #[serde(default)]
    pub scores: Scores,
    #[serde(default)]
    pub recommendation: Recommendation,
    #[serde(default)]
    pub summary: String,
}

// -- Errors --

/// Stable reason codes surfaced on every failed request or rejected
/// handshake.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}
