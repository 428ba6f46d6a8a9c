use uuid::Uuid;

use greenroom_db::{Database, format_ts, parse_ts};

use crate::error::ScheduleError;
use crate::slot::Slot;

/// Returns true if any non-terminal booking involving any of `participants`
/// overlaps `proposed`.
///
/// Two-phase: the store runs a coarse pre-filter (participant match,
/// starts before the proposed end, so it only bounds one side of the
/// interval), and the exact half-open intersection test decides here. The
/// query is never authoritative on its own.
pub fn has_conflict(
    db: &Database,
    participants: &[Uuid],
    proposed: &Slot,
    exclude: Option<Uuid>,
) -> Result<bool, ScheduleError> {
    let ids: Vec<String> = participants.iter().map(|id| id.to_string()).collect();
    let before_end = format_ts(proposed.end());
    let exclude = exclude.map(|id| id.to_string());

    let candidates = db.find_overlap_candidates(&ids, &before_end, exclude.as_deref())?;

    for row in &candidates {
        let start = parse_ts(&row.scheduled_at)?;
        let existing = Slot::new(start, row.duration_minutes);
        if existing.overlaps(proposed) {
            tracing::debug!(
                booking_id = %row.id,
                scheduled_at = %row.scheduled_at,
                "slot conflict"
            );
            return Ok(true);
        }
    }

    Ok(false)
}
