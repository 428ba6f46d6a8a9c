use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use greenroom_schedule::ScheduleError;
use greenroom_types::api::ErrorBody;

/// HTTP-facing error. Every variant maps to a stable reason code; nothing
/// here is fatal to the process.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error("internal error")]
    Internal,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "unauthorized"),
            ApiError::Forbidden(_) => (StatusCode::FORBIDDEN, "forbidden"),
            ApiError::Schedule(e) => {
                let status = match e {
                    ScheduleError::Validation(_) => StatusCode::BAD_REQUEST,
                    ScheduleError::Conflict => StatusCode::CONFLICT,
                    ScheduleError::NotFound => StatusCode::NOT_FOUND,
                    ScheduleError::Forbidden => StatusCode::FORBIDDEN,
                    ScheduleError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, e.code())
            }
            ApiError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("request failed: {self}");
            "internal error".to_string()
        } else {
            self.to_string()
        };

        (
            status,
            Json(ErrorBody {
                error: code,
                message,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_errors_map_to_stable_codes() {
        let cases = [
            (
                ApiError::from(ScheduleError::validation("bad")),
                StatusCode::BAD_REQUEST,
                "validation",
            ),
            (
                ApiError::from(ScheduleError::Conflict),
                StatusCode::CONFLICT,
                "conflict",
            ),
            (
                ApiError::from(ScheduleError::NotFound),
                StatusCode::NOT_FOUND,
                "not_found",
            ),
            (
                ApiError::from(ScheduleError::Forbidden),
                StatusCode::FORBIDDEN,
                "forbidden",
            ),
            (
                ApiError::Unauthorized("no token".into()),
                StatusCode::UNAUTHORIZED,
                "unauthorized",
            ),
        ];

        for (err, status, code) in cases {
            assert_eq!(err.status_and_code(), (status, code));
        }
    }
}
