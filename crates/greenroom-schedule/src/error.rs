use thiserror::Error;

/// Failure taxonomy for scheduling operations. All variants are local to a
/// single request and recoverable by the caller; only `Internal` indicates
/// a storage fault.
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("{0}")]
    Validation(String),

    #[error("time slot overlaps an existing booking for a participant")]
    Conflict,

    #[error("booking not found")]
    NotFound,

    #[error("not a participant of this booking")]
    Forbidden,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ScheduleError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ScheduleError::Validation(msg.into())
    }

    /// Stable reason code surfaced to callers.
    pub fn code(&self) -> &'static str {
        match self {
            ScheduleError::Validation(_) => "validation",
            ScheduleError::Conflict => "conflict",
            ScheduleError::NotFound => "not_found",
            ScheduleError::Forbidden => "forbidden",
            ScheduleError::Internal(_) => "internal",
        }
    }
}
