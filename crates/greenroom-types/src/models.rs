use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Directory roles. The service never stores users; the role arrives
/// inside the bearer token and is trusted as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Admin,
    #[serde(rename = "HR")]
    Hr,
    Employee,
    Candidate,
}

impl Role {
    /// HR is the scheduling role: it sees every booking and may join any room.
    pub fn is_privileged(&self) -> bool {
        matches!(self, Role::Hr)
    }
}

/// Booking lifecycle. `Completed` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }

    /// Only non-terminal bookings count for conflict detection.
    pub fn blocks_slot(&self) -> bool {
        matches!(self, BookingStatus::Scheduled | BookingStatus::InProgress)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Scheduled => "scheduled",
            BookingStatus::InProgress => "in_progress",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(BookingStatus::Scheduled),
            "in_progress" => Ok(BookingStatus::InProgress),
            "completed" => Ok(BookingStatus::Completed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(format!("unknown booking status '{other}'")),
        }
    }
}

/// A scheduled interview. `room_id` is minted once at creation and is the
/// sole key the signaling gateway authorizes against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub title: String,
    pub candidate_id: Uuid,
    pub interviewer_ids: Vec<Uuid>,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: i64,
    pub status: BookingStatus,
    pub room_id: String,
    pub notes: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Every identity the booking binds: the candidate plus all interviewers.
    pub fn participants(&self) -> impl Iterator<Item = Uuid> + '_ {
        std::iter::once(self.candidate_id).chain(self.interviewer_ids.iter().copied())
    }

    pub fn is_participant(&self, user_id: Uuid) -> bool {
        self.candidate_id == user_id || self.interviewer_ids.contains(&user_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Hire,
    NoHire,
    Hold,
}

impl Default for Recommendation {
    fn default() -> Self {
        Recommendation::Hold
    }
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::Hire => "hire",
            Recommendation::NoHire => "no_hire",
            Recommendation::Hold => "hold",
        }
    }
}

impl std::str::FromStr for Recommendation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hire" => Ok(Recommendation::Hire),
            "no_hire" => Ok(Recommendation::NoHire),
            "hold" => Ok(Recommendation::Hold),
            other => Err(format!("unknown recommendation '{other}'")),
        }
    }
}

/// Score axes are individually optional and bounded 0..=10.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scores {
    pub technical: Option<u8>,
    pub communication: Option<u8>,
    pub problem_solving: Option<u8>,
    pub culture_fit: Option<u8>,
}

impl Scores {
    pub const MAX: u8 = 10;

    pub fn axes(&self) -> [(&'static str, Option<u8>); 4] {
        [
            ("technical", self.technical),
            ("communication", self.communication),
            ("problem_solving", self.problem_solving),
            ("culture_fit", self.culture_fit),
        ]
    }
}

/// One feedback record per (booking, submitter); resubmission overwrites.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub submitted_by: Uuid,
    pub scores: Scores,
    pub recommendation: Recommendation,
    pub summary: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
