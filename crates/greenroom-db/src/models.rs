/// Database row types that map directly to SQLite rows.
/// Distinct from greenroom-types domain models to keep the DB layer independent.

pub struct BookingRow {
    pub id: String,
    pub title: String,
    pub candidate_id: String,
    pub interviewer_ids: Vec<String>,
    pub scheduled_at: String,
    pub duration_minutes: i64,
    pub status: String,
    pub room_id: String,
    pub notes: String,
    pub created_by: String,
    pub created_at: String,
    pub updated_at: String,
}

pub struct FeedbackRow {
    pub id: String,
    pub booking_id: String,
    pub submitted_by: String,
    pub technical: Option<i64>,
    pub communication: Option<i64>,
    pub problem_solving: Option<i64>,
    pub culture_fit: Option<i64>,
    pub recommendation: String,
    pub summary: String,
    pub created_at: String,
    pub updated_at: String,
}
