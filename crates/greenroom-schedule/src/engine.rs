use std::sync::Arc;

use rand::Rng;
use rand::distr::Alphanumeric;
use tracing::info;
use uuid::Uuid;

use greenroom_db::models::{BookingRow, FeedbackRow};
use greenroom_db::{Database, format_ts, parse_ts};
use greenroom_types::api::{CreateBookingRequest, SubmitFeedbackRequest, UpdateBookingRequest};
use greenroom_types::models::{Booking, BookingStatus, Feedback, Role, Scores};

use crate::conflict;
use crate::error::ScheduleError;
use crate::slot::Slot;

/// Orchestrates booking create/update/cancel and feedback submission.
///
/// All methods are synchronous over the store's own write ordering; callers
/// on the async runtime go through `spawn_blocking`. Conflicting creates
/// racing through the check are accepted at interview-scheduling
/// concurrency; nothing here tries to be linearizable.
/// Longest bookable slot. Durations beyond this are data-entry errors, and
/// absurd values would overflow the interval arithmetic.
const MAX_DURATION_MINUTES: i64 = 24 * 60;

#[derive(Clone)]
pub struct Scheduler {
    db: Arc<Database>,
}

impl Scheduler {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn create(&self, created_by: Uuid, req: CreateBookingRequest) -> Result<Booking, ScheduleError> {
        if req.title.trim().is_empty() {
            return Err(ScheduleError::validation("title must not be empty"));
        }
        if req.interviewer_ids.is_empty() {
            return Err(ScheduleError::validation(
                "interviewer_ids must be a non-empty list",
            ));
        }
        if req.duration_minutes <= 0 || req.duration_minutes > MAX_DURATION_MINUTES {
            return Err(ScheduleError::validation(format!(
                "duration_minutes must be between 1 and {MAX_DURATION_MINUTES}"
            )));
        }

        // The store keeps one row per (booking, interviewer); a repeated id
        // means the single interviewer it names.
        let interviewer_ids = dedupe_interviewers(&req.interviewer_ids);

        let slot = Slot::new(req.scheduled_at, req.duration_minutes);
        let participants = participant_set(req.candidate_id, &interviewer_ids);
        if conflict::has_conflict(&self.db, &participants, &slot, None)? {
            return Err(ScheduleError::Conflict);
        }

        // Nothing persisted and no room token minted unless the slot is free.
        let id = Uuid::new_v4();
        let room_id = mint_room_token();
        let row = BookingRow {
            id: id.to_string(),
            title: req.title,
            candidate_id: req.candidate_id.to_string(),
            interviewer_ids: interviewer_ids.iter().map(Uuid::to_string).collect(),
            scheduled_at: format_ts(req.scheduled_at),
            duration_minutes: req.duration_minutes,
            status: BookingStatus::Scheduled.as_str().to_string(),
            room_id,
            notes: req.notes,
            created_by: created_by.to_string(),
            created_at: String::new(),
            updated_at: String::new(),
        };
        self.db.insert_booking(&row)?;

        info!(booking_id = %id, scheduled_at = %row.scheduled_at, "booking created");
        self.fetch(id)
    }

    /// Merge `patch` over the stored booking and persist if the merged slot
    /// is still free (checked with the booking itself excluded, else every
    /// reschedule would conflict with its own row).
    pub fn update(&self, id: Uuid, patch: UpdateBookingRequest) -> Result<Booking, ScheduleError> {
        let existing = self.fetch(id)?;

        if let Some(title) = &patch.title {
            if title.trim().is_empty() {
                return Err(ScheduleError::validation("title must not be empty"));
            }
        }
        if let Some(ids) = &patch.interviewer_ids {
            if ids.is_empty() {
                return Err(ScheduleError::validation(
                    "interviewer_ids must be a non-empty list",
                ));
            }
        }
        if let Some(duration) = patch.duration_minutes {
            if duration <= 0 || duration > MAX_DURATION_MINUTES {
                return Err(ScheduleError::validation(format!(
                    "duration_minutes must be between 1 and {MAX_DURATION_MINUTES}"
                )));
            }
        }
        if let Some(status) = patch.status {
            if existing.status.is_terminal() && status != existing.status {
                return Err(ScheduleError::validation(format!(
                    "booking is {} and cannot change status",
                    existing.status.as_str()
                )));
            }
        }

        let merged = Booking {
            title: patch.title.unwrap_or(existing.title),
            candidate_id: patch.candidate_id.unwrap_or(existing.candidate_id),
            interviewer_ids: patch
                .interviewer_ids
                .map(|ids| dedupe_interviewers(&ids))
                .unwrap_or(existing.interviewer_ids),
            scheduled_at: patch.scheduled_at.unwrap_or(existing.scheduled_at),
            duration_minutes: patch.duration_minutes.unwrap_or(existing.duration_minutes),
            status: patch.status.unwrap_or(existing.status),
            notes: patch.notes.unwrap_or(existing.notes),
            ..existing
        };

        // A booking moving into a terminal state stops occupying its slot,
        // so only re-check while the merged status still blocks.
        if merged.status.blocks_slot() {
            let slot = Slot::new(merged.scheduled_at, merged.duration_minutes);
            let participants = participant_set(merged.candidate_id, &merged.interviewer_ids);
            if conflict::has_conflict(&self.db, &participants, &slot, Some(id))? {
                return Err(ScheduleError::Conflict);
            }
        }

        let row = BookingRow {
            id: merged.id.to_string(),
            title: merged.title.clone(),
            candidate_id: merged.candidate_id.to_string(),
            interviewer_ids: merged.interviewer_ids.iter().map(Uuid::to_string).collect(),
            scheduled_at: format_ts(merged.scheduled_at),
            duration_minutes: merged.duration_minutes,
            status: merged.status.as_str().to_string(),
            room_id: merged.room_id.clone(),
            notes: merged.notes.clone(),
            created_by: merged.created_by.to_string(),
            created_at: String::new(),
            updated_at: String::new(),
        };
        self.db.update_booking(&row)?;

        info!(booking_id = %id, "booking updated");
        self.fetch(id)
    }

    /// Idempotent: cancelling a cancelled booking is a no-op. The room token
    /// is never reused.
    pub fn cancel(&self, id: Uuid) -> Result<Booking, ScheduleError> {
        let existing = self.fetch(id)?;
        if existing.status != BookingStatus::Cancelled {
            self.db
                .set_booking_status(&id.to_string(), BookingStatus::Cancelled.as_str())?;
            info!(booking_id = %id, "booking cancelled");
        }
        self.fetch(id)
    }

    /// HR sees every booking; everyone else sees only bookings where they
    /// are the candidate or an interviewer. Soonest first.
    pub fn list_for(&self, requester: Uuid, role: Role) -> Result<Vec<Booking>, ScheduleError> {
        let rows = if role.is_privileged() {
            self.db.list_bookings()?
        } else {
            self.db.list_bookings_for(&requester.to_string())?
        };
        rows.iter().map(booking_from_row).collect()
    }

    pub fn get(&self, id: Uuid, requester: Uuid, role: Role) -> Result<Booking, ScheduleError> {
        let booking = self.fetch(id)?;
        authorize_access(&booking, requester, role)?;
        Ok(booking)
    }

    pub fn get_by_room(
        &self,
        room_id: &str,
        requester: Uuid,
        role: Role,
    ) -> Result<Booking, ScheduleError> {
        let row = self
            .db
            .get_booking_by_room(room_id)?
            .ok_or(ScheduleError::NotFound)?;
        let booking = booking_from_row(&row)?;
        authorize_access(&booking, requester, role)?;
        Ok(booking)
    }

    /// Upsert one feedback record per (booking, submitter) and drive the
    /// booking to `completed`. Monotonic: a completed booking never moves
    /// backward, later submissions only overwrite feedback content.
    pub fn submit_feedback(
        &self,
        submitted_by: Uuid,
        req: SubmitFeedbackRequest,
    ) -> Result<Feedback, ScheduleError> {
        validate_scores(&req.scores)?;

        let booking = self.fetch(req.booking_id)?;

        let row = FeedbackRow {
            id: Uuid::new_v4().to_string(),
            booking_id: req.booking_id.to_string(),
            submitted_by: submitted_by.to_string(),
            technical: req.scores.technical.map(i64::from),
            communication: req.scores.communication.map(i64::from),
            problem_solving: req.scores.problem_solving.map(i64::from),
            culture_fit: req.scores.culture_fit.map(i64::from),
            recommendation: req.recommendation.as_str().to_string(),
            summary: req.summary,
            created_at: String::new(),
            updated_at: String::new(),
        };
        let stored = self.db.upsert_feedback(&row)?;

        if !booking.status.is_terminal() {
            self.db.set_booking_status(
                &booking.id.to_string(),
                BookingStatus::Completed.as_str(),
            )?;
            info!(booking_id = %booking.id, "booking completed via feedback");
        }

        feedback_from_row(&stored)
    }

    fn fetch(&self, id: Uuid) -> Result<Booking, ScheduleError> {
        let row = self
            .db
            .get_booking(&id.to_string())?
            .ok_or(ScheduleError::NotFound)?;
        booking_from_row(&row)
    }
}

fn authorize_access(booking: &Booking, requester: Uuid, role: Role) -> Result<(), ScheduleError> {
    if role.is_privileged() || booking.is_participant(requester) {
        Ok(())
    } else {
        Err(ScheduleError::Forbidden)
    }
}

fn dedupe_interviewers(ids: &[Uuid]) -> Vec<Uuid> {
    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(id) {
            out.push(*id);
        }
    }
    out
}

fn participant_set(candidate_id: Uuid, interviewer_ids: &[Uuid]) -> Vec<Uuid> {
    let mut ids = Vec::with_capacity(interviewer_ids.len() + 1);
    ids.push(candidate_id);
    for id in interviewer_ids {
        if !ids.contains(id) {
            ids.push(*id);
        }
    }
    ids
}

fn validate_scores(scores: &Scores) -> Result<(), ScheduleError> {
    for (axis, value) in scores.axes() {
        if let Some(v) = value {
            if v > Scores::MAX {
                return Err(ScheduleError::validation(format!(
                    "score '{axis}' must be between 0 and {}",
                    Scores::MAX
                )));
            }
        }
    }
    Ok(())
}

fn mint_room_token() -> String {
    let token: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(20)
        .map(char::from)
        .collect();
    format!("room_{token}")
}

fn booking_from_row(row: &BookingRow) -> Result<Booking, ScheduleError> {
    let parse_uuid = |s: &str, field: &str| {
        s.parse::<Uuid>()
            .map_err(|e| anyhow::anyhow!("corrupt {field} '{s}': {e}"))
    };

    Ok(Booking {
        id: parse_uuid(&row.id, "booking id")?,
        title: row.title.clone(),
        candidate_id: parse_uuid(&row.candidate_id, "candidate_id")?,
        interviewer_ids: row
            .interviewer_ids
            .iter()
            .map(|s| parse_uuid(s, "interviewer_id"))
            .collect::<Result<Vec<_>, _>>()?,
        scheduled_at: parse_ts(&row.scheduled_at).map_err(ScheduleError::Internal)?,
        duration_minutes: row.duration_minutes,
        status: row
            .status
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))?,
        room_id: row.room_id.clone(),
        notes: row.notes.clone(),
        created_by: parse_uuid(&row.created_by, "created_by")?,
        created_at: parse_ts(&row.created_at).map_err(ScheduleError::Internal)?,
        updated_at: parse_ts(&row.updated_at).map_err(ScheduleError::Internal)?,
    })
}

fn feedback_from_row(row: &FeedbackRow) -> Result<Feedback, ScheduleError> {
    let to_score = |v: Option<i64>| v.map(|n| n.clamp(0, i64::from(Scores::MAX)) as u8);

    Ok(Feedback {
        id: row
            .id
            .parse()
            .map_err(|e| anyhow::anyhow!("corrupt feedback id '{}': {e}", row.id))?,
        booking_id: row
            .booking_id
            .parse()
            .map_err(|e| anyhow::anyhow!("corrupt booking_id '{}': {e}", row.booking_id))?,
        submitted_by: row
            .submitted_by
            .parse()
            .map_err(|e| anyhow::anyhow!("corrupt submitted_by '{}': {e}", row.submitted_by))?,
        scores: Scores {
            technical: to_score(row.technical),
            communication: to_score(row.communication),
            problem_solving: to_score(row.problem_solving),
            culture_fit: to_score(row.culture_fit),
        },
        recommendation: row
            .recommendation
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))?,
        summary: row.summary.clone(),
        created_at: parse_ts(&row.created_at).map_err(ScheduleError::Internal)?,
        updated_at: parse_ts(&row.updated_at).map_err(ScheduleError::Internal)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn scheduler() -> Scheduler {
        Scheduler::new(Arc::new(Database::open_in_memory().unwrap()))
    }

    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, hour, min, 0).unwrap()
    }

    fn request(
        candidate: Uuid,
        interviewers: &[Uuid],
        start: DateTime<Utc>,
        duration: i64,
    ) -> CreateBookingRequest {
        CreateBookingRequest {
            title: "Backend screen".into(),
            candidate_id: candidate,
            interviewer_ids: interviewers.to_vec(),
            scheduled_at: start,
            duration_minutes: duration,
            notes: String::new(),
        }
    }

    fn feedback_request(booking_id: Uuid) -> SubmitFeedbackRequest {
        SubmitFeedbackRequest {
            booking_id,
            scores: Scores {
                technical: Some(7),
                communication: Some(8),
                problem_solving: None,
                culture_fit: None,
            },
            recommendation: greenroom_types::models::Recommendation::Hire,
            summary: "strong".into(),
        }
    }

    #[test]
    fn create_rejects_overlap_for_shared_interviewer() {
        let s = scheduler();
        let hr = Uuid::new_v4();
        let interviewer = Uuid::new_v4();

        // A: 10:00-11:00 with interviewer X
        s.create(hr, request(Uuid::new_v4(), &[interviewer], at(10, 0), 60))
            .unwrap();

        // B: 10:30-11:30 with the same interviewer
        let err = s
            .create(hr, request(Uuid::new_v4(), &[interviewer], at(10, 30), 60))
            .unwrap_err();
        assert!(matches!(err, ScheduleError::Conflict));

        // C: 11:00-12:00 is boundary-adjacent and must succeed
        s.create(hr, request(Uuid::new_v4(), &[interviewer], at(11, 0), 60))
            .unwrap();
    }

    #[test]
    fn create_rejects_overlap_for_shared_candidate() {
        let s = scheduler();
        let hr = Uuid::new_v4();
        let candidate = Uuid::new_v4();

        s.create(hr, request(candidate, &[Uuid::new_v4()], at(14, 0), 60))
            .unwrap();

        let err = s
            .create(hr, request(candidate, &[Uuid::new_v4()], at(14, 45), 30))
            .unwrap_err();
        assert!(matches!(err, ScheduleError::Conflict));
    }

    #[test]
    fn disjoint_participants_may_overlap_in_time() {
        let s = scheduler();
        let hr = Uuid::new_v4();

        s.create(hr, request(Uuid::new_v4(), &[Uuid::new_v4()], at(10, 0), 60))
            .unwrap();
        s.create(hr, request(Uuid::new_v4(), &[Uuid::new_v4()], at(10, 0), 60))
            .unwrap();
    }

    #[test]
    fn cancelled_bookings_never_block() {
        let s = scheduler();
        let hr = Uuid::new_v4();
        let interviewer = Uuid::new_v4();

        let booking = s
            .create(hr, request(Uuid::new_v4(), &[interviewer], at(10, 0), 60))
            .unwrap();
        s.cancel(booking.id).unwrap();

        // Identical slot and participant set must now succeed.
        s.create(hr, request(Uuid::new_v4(), &[interviewer], at(10, 0), 60))
            .unwrap();
    }

    #[test]
    fn cancel_is_idempotent() {
        let s = scheduler();
        let hr = Uuid::new_v4();
        let booking = s
            .create(hr, request(Uuid::new_v4(), &[Uuid::new_v4()], at(10, 0), 60))
            .unwrap();

        let first = s.cancel(booking.id).unwrap();
        let second = s.cancel(booking.id).unwrap();
        assert_eq!(first.status, BookingStatus::Cancelled);
        assert_eq!(second.status, BookingStatus::Cancelled);
        assert_eq!(first.room_id, second.room_id);
    }

    #[test]
    fn update_does_not_conflict_with_itself() {
        let s = scheduler();
        let hr = Uuid::new_v4();
        let interviewer = Uuid::new_v4();
        let booking = s
            .create(hr, request(Uuid::new_v4(), &[interviewer], at(10, 0), 60))
            .unwrap();

        // Shift by 15 minutes, still overlapping its own old window.
        let updated = s
            .update(
                booking.id,
                UpdateBookingRequest {
                    scheduled_at: Some(at(10, 15)),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.scheduled_at, at(10, 15));
    }

    #[test]
    fn update_conflicting_with_other_booking_fails() {
        let s = scheduler();
        let hr = Uuid::new_v4();
        let interviewer = Uuid::new_v4();

        s.create(hr, request(Uuid::new_v4(), &[interviewer], at(10, 0), 60))
            .unwrap();
        let other = s
            .create(hr, request(Uuid::new_v4(), &[interviewer], at(13, 0), 60))
            .unwrap();

        let err = s
            .update(
                other.id,
                UpdateBookingRequest {
                    scheduled_at: Some(at(10, 30)),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, ScheduleError::Conflict));
    }

    #[test]
    fn update_keeps_unspecified_fields() {
        let s = scheduler();
        let hr = Uuid::new_v4();
        let booking = s
            .create(hr, request(Uuid::new_v4(), &[Uuid::new_v4()], at(10, 0), 60))
            .unwrap();

        let updated = s
            .update(
                booking.id,
                UpdateBookingRequest {
                    notes: Some("bring whiteboard".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.title, booking.title);
        assert_eq!(updated.scheduled_at, booking.scheduled_at);
        assert_eq!(updated.room_id, booking.room_id);
        assert_eq!(updated.notes, "bring whiteboard");
    }

    #[test]
    fn update_cannot_leave_terminal_state() {
        let s = scheduler();
        let hr = Uuid::new_v4();
        let booking = s
            .create(hr, request(Uuid::new_v4(), &[Uuid::new_v4()], at(10, 0), 60))
            .unwrap();
        s.cancel(booking.id).unwrap();

        let err = s
            .update(
                booking.id,
                UpdateBookingRequest {
                    status: Some(BookingStatus::Scheduled),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, ScheduleError::Validation(_)));
    }

    #[test]
    fn create_validates_input() {
        let s = scheduler();
        let hr = Uuid::new_v4();

        let no_interviewers = request(Uuid::new_v4(), &[], at(10, 0), 60);
        assert!(matches!(
            s.create(hr, no_interviewers).unwrap_err(),
            ScheduleError::Validation(_)
        ));

        let zero_duration = request(Uuid::new_v4(), &[Uuid::new_v4()], at(10, 0), 0);
        assert!(matches!(
            s.create(hr, zero_duration).unwrap_err(),
            ScheduleError::Validation(_)
        ));

        let mut blank_title = request(Uuid::new_v4(), &[Uuid::new_v4()], at(10, 0), 60);
        blank_title.title = "  ".into();
        assert!(matches!(
            s.create(hr, blank_title).unwrap_err(),
            ScheduleError::Validation(_)
        ));

        let absurd_duration = request(Uuid::new_v4(), &[Uuid::new_v4()], at(10, 0), i64::MAX);
        assert!(matches!(
            s.create(hr, absurd_duration).unwrap_err(),
            ScheduleError::Validation(_)
        ));
    }

    #[test]
    fn repeated_interviewer_ids_collapse_to_one() {
        let s = scheduler();
        let hr = Uuid::new_v4();
        let interviewer = Uuid::new_v4();

        let booking = s
            .create(
                hr,
                request(Uuid::new_v4(), &[interviewer, interviewer], at(10, 0), 60),
            )
            .unwrap();
        assert_eq!(booking.interviewer_ids, vec![interviewer]);

        let other = Uuid::new_v4();
        let updated = s
            .update(
                booking.id,
                UpdateBookingRequest {
                    interviewer_ids: Some(vec![other, interviewer, other]),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.interviewer_ids, vec![other, interviewer]);
    }

    #[test]
    fn feedback_upserts_and_completes() {
        let s = scheduler();
        let hr = Uuid::new_v4();
        let booking = s
            .create(hr, request(Uuid::new_v4(), &[Uuid::new_v4()], at(10, 0), 60))
            .unwrap();

        let first = s.submit_feedback(hr, feedback_request(booking.id)).unwrap();
        assert_eq!(
            s.get(booking.id, hr, Role::Hr).unwrap().status,
            BookingStatus::Completed
        );

        // Resubmission by the same submitter updates in place.
        let mut resubmit = feedback_request(booking.id);
        resubmit.summary = "revised after debrief".into();
        let second = s.submit_feedback(hr, resubmit).unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.summary, "revised after debrief");
        assert_eq!(
            s.get(booking.id, hr, Role::Hr).unwrap().status,
            BookingStatus::Completed
        );
    }

    #[test]
    fn feedback_from_two_submitters_creates_two_records() {
        let s = scheduler();
        let hr = Uuid::new_v4();
        let other_hr = Uuid::new_v4();
        let booking = s
            .create(hr, request(Uuid::new_v4(), &[Uuid::new_v4()], at(10, 0), 60))
            .unwrap();

        let a = s.submit_feedback(hr, feedback_request(booking.id)).unwrap();
        let b = s
            .submit_feedback(other_hr, feedback_request(booking.id))
            .unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn feedback_rejects_unknown_booking_and_bad_scores() {
        let s = scheduler();
        let hr = Uuid::new_v4();

        assert!(matches!(
            s.submit_feedback(hr, feedback_request(Uuid::new_v4()))
                .unwrap_err(),
            ScheduleError::NotFound
        ));

        let booking = s
            .create(hr, request(Uuid::new_v4(), &[Uuid::new_v4()], at(10, 0), 60))
            .unwrap();
        let mut bad = feedback_request(booking.id);
        bad.scores.technical = Some(11);
        assert!(matches!(
            s.submit_feedback(hr, bad).unwrap_err(),
            ScheduleError::Validation(_)
        ));
    }

    #[test]
    fn feedback_does_not_resurrect_cancelled_booking() {
        let s = scheduler();
        let hr = Uuid::new_v4();
        let booking = s
            .create(hr, request(Uuid::new_v4(), &[Uuid::new_v4()], at(10, 0), 60))
            .unwrap();
        s.cancel(booking.id).unwrap();

        s.submit_feedback(hr, feedback_request(booking.id)).unwrap();
        assert_eq!(
            s.get(booking.id, hr, Role::Hr).unwrap().status,
            BookingStatus::Cancelled
        );
    }

    #[test]
    fn listing_is_scoped_by_role() {
        let s = scheduler();
        let hr = Uuid::new_v4();
        let interviewer = Uuid::new_v4();
        let candidate = Uuid::new_v4();

        s.create(hr, request(candidate, &[interviewer], at(10, 0), 60))
            .unwrap();
        s.create(hr, request(Uuid::new_v4(), &[Uuid::new_v4()], at(12, 0), 60))
            .unwrap();

        assert_eq!(s.list_for(hr, Role::Hr).unwrap().len(), 2);
        assert_eq!(s.list_for(interviewer, Role::Employee).unwrap().len(), 1);
        assert_eq!(s.list_for(candidate, Role::Candidate).unwrap().len(), 1);
        assert_eq!(s.list_for(Uuid::new_v4(), Role::Employee).unwrap().len(), 0);
    }

    #[test]
    fn room_lookup_enforces_participation() {
        let s = scheduler();
        let hr = Uuid::new_v4();
        let candidate = Uuid::new_v4();
        let booking = s
            .create(hr, request(candidate, &[Uuid::new_v4()], at(10, 0), 60))
            .unwrap();

        assert!(
            s.get_by_room(&booking.room_id, candidate, Role::Candidate)
                .is_ok()
        );
        assert!(s.get_by_room(&booking.room_id, hr, Role::Hr).is_ok());

        assert!(matches!(
            s.get_by_room(&booking.room_id, Uuid::new_v4(), Role::Employee)
                .unwrap_err(),
            ScheduleError::Forbidden
        ));
        assert!(matches!(
            s.get_by_room("room_missing", hr, Role::Hr).unwrap_err(),
            ScheduleError::NotFound
        ));
    }

    #[test]
    fn room_tokens_are_unique_and_prefixed() {
        let s = scheduler();
        let hr = Uuid::new_v4();
        let a = s
            .create(hr, request(Uuid::new_v4(), &[Uuid::new_v4()], at(10, 0), 60))
            .unwrap();
        let b = s
            .create(hr, request(Uuid::new_v4(), &[Uuid::new_v4()], at(12, 0), 60))
            .unwrap();

        assert!(a.room_id.starts_with("room_"));
        assert_ne!(a.room_id, b.room_id);
    }
}
