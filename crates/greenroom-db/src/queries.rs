use crate::Database;
use crate::models::{BookingRow, FeedbackRow};
use anyhow::Result;
use rusqlite::Connection;

const BOOKING_COLS: &str = "id, title, candidate_id, scheduled_at, duration_minutes, status, \
                            room_id, notes, created_by, created_at, updated_at";

impl Database {
    // -- Bookings --

    pub fn insert_booking(&self, row: &BookingRow) -> Result<()> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO bookings (id, title, candidate_id, scheduled_at, duration_minutes,
                                       status, room_id, notes, created_by)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                rusqlite::params![
                    row.id,
                    row.title,
                    row.candidate_id,
                    row.scheduled_at,
                    row.duration_minutes,
                    row.status,
                    row.room_id,
                    row.notes,
                    row.created_by,
                ],
            )?;
            for interviewer_id in &row.interviewer_ids {
                tx.execute(
                    "INSERT INTO booking_interviewers (booking_id, interviewer_id) VALUES (?1, ?2)",
                    rusqlite::params![row.id, interviewer_id],
                )?;
            }
            tx.commit()?;
            Ok(())
        })
    }

    /// Rewrites all mutable columns and replaces the interviewer set in one
    /// transaction.
    pub fn update_booking(&self, row: &BookingRow) -> Result<()> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "UPDATE bookings
                 SET title = ?2, candidate_id = ?3, scheduled_at = ?4, duration_minutes = ?5,
                     status = ?6, notes = ?7, updated_at = datetime('now')
                 WHERE id = ?1",
                rusqlite::params![
                    row.id,
                    row.title,
                    row.candidate_id,
                    row.scheduled_at,
                    row.duration_minutes,
                    row.status,
                    row.notes,
                ],
            )?;
            tx.execute(
                "DELETE FROM booking_interviewers WHERE booking_id = ?1",
                [&row.id],
            )?;
            for interviewer_id in &row.interviewer_ids {
                tx.execute(
                    "INSERT INTO booking_interviewers (booking_id, interviewer_id) VALUES (?1, ?2)",
                    rusqlite::params![row.id, interviewer_id],
                )?;
            }
            tx.commit()?;
            Ok(())
        })
    }

    pub fn set_booking_status(&self, id: &str, status: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE bookings SET status = ?2, updated_at = datetime('now') WHERE id = ?1",
                rusqlite::params![id, status],
            )?;
            Ok(changed > 0)
        })
    }

    pub fn get_booking(&self, id: &str) -> Result<Option<BookingRow>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {BOOKING_COLS} FROM bookings WHERE id = ?1");
            query_booking(conn, &sql, [id])
        })
    }

    pub fn get_booking_by_room(&self, room_id: &str) -> Result<Option<BookingRow>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {BOOKING_COLS} FROM bookings WHERE room_id = ?1");
            query_booking(conn, &sql, [room_id])
        })
    }

    /// All bookings, soonest first. HR view.
    pub fn list_bookings(&self) -> Result<Vec<BookingRow>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {BOOKING_COLS} FROM bookings ORDER BY scheduled_at ASC");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([], map_booking)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            attach_interviewers(conn, rows)
        })
    }

    /// Bookings where the user is the candidate or an interviewer, soonest first.
    pub fn list_bookings_for(&self, user_id: &str) -> Result<Vec<BookingRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {BOOKING_COLS} FROM bookings
                 WHERE candidate_id = ?1
                    OR id IN (SELECT booking_id FROM booking_interviewers WHERE interviewer_id = ?1)
                 ORDER BY scheduled_at ASC"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([user_id], map_booking)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            attach_interviewers(conn, rows)
        })
    }

    /// Coarse overlap pre-filter: non-terminal bookings that involve any of
    /// `participants` and start before `before_end`. This bounds only one
    /// side of the interval; the caller must still run the exact
    /// intersection test on every returned row.
    pub fn find_overlap_candidates(
        &self,
        participants: &[String],
        before_end: &str,
        exclude: Option<&str>,
    ) -> Result<Vec<BookingRow>> {
        if participants.is_empty() {
            return Ok(vec![]);
        }

        self.with_conn(|conn| {
            // ?1 = before_end, ?2 = exclude id, ?3.. = participant ids
            let placeholders: Vec<String> = (0..participants.len())
                .map(|i| format!("?{}", i + 3))
                .collect();
            let in_list = placeholders.join(", ");
            let sql = format!(
                "SELECT {BOOKING_COLS} FROM bookings
                 WHERE status IN ('scheduled', 'in_progress')
                   AND scheduled_at < ?1
                   AND (?2 IS NULL OR id != ?2)
                   AND (candidate_id IN ({in_list})
                        OR id IN (SELECT booking_id FROM booking_interviewers
                                  WHERE interviewer_id IN ({in_list})))"
            );

            let mut params: Vec<&dyn rusqlite::types::ToSql> = vec![&before_end, &exclude];
            for id in participants {
                params.push(id as &dyn rusqlite::types::ToSql);
            }

            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params.as_slice(), map_booking)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            attach_interviewers(conn, rows)
        })
    }

    // -- Feedback --

    /// Upsert keyed by (booking_id, submitted_by): the first submission
    /// inserts, later ones overwrite content but keep the original id and
    /// created_at. Returns the stored row.
    pub fn upsert_feedback(&self, row: &FeedbackRow) -> Result<FeedbackRow> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO feedback (id, booking_id, submitted_by, technical, communication,
                                       problem_solving, culture_fit, recommendation, summary)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                 ON CONFLICT(booking_id, submitted_by) DO UPDATE SET
                     technical = excluded.technical,
                     communication = excluded.communication,
                     problem_solving = excluded.problem_solving,
                     culture_fit = excluded.culture_fit,
                     recommendation = excluded.recommendation,
                     summary = excluded.summary,
                     updated_at = datetime('now')",
                rusqlite::params![
                    row.id,
                    row.booking_id,
                    row.submitted_by,
                    row.technical,
                    row.communication,
                    row.problem_solving,
                    row.culture_fit,
                    row.recommendation,
                    row.summary,
                ],
            )?;

            query_feedback(conn, &row.booking_id, &row.submitted_by)?
                .ok_or_else(|| anyhow::anyhow!("feedback upsert did not persist"))
        })
    }

    pub fn get_feedback(&self, booking_id: &str, submitted_by: &str) -> Result<Option<FeedbackRow>> {
        self.with_conn(|conn| query_feedback(conn, booking_id, submitted_by))
    }
}

fn map_booking(row: &rusqlite::Row<'_>) -> rusqlite::Result<BookingRow> {
    Ok(BookingRow {
        id: row.get(0)?,
        title: row.get(1)?,
        candidate_id: row.get(2)?,
        interviewer_ids: Vec::new(),
        scheduled_at: row.get(3)?,
        duration_minutes: row.get(4)?,
        status: row.get(5)?,
        room_id: row.get(6)?,
        notes: row.get(7)?,
        created_by: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

fn query_booking<P: rusqlite::Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<Option<BookingRow>> {
    let mut stmt = conn.prepare(sql)?;
    let row = stmt.query_row(params, map_booking).optional()?;
    match row {
        Some(mut booking) => {
            booking.interviewer_ids = query_interviewers(conn, &booking.id)?;
            Ok(Some(booking))
        }
        None => Ok(None),
    }
}

fn query_interviewers(conn: &Connection, booking_id: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT interviewer_id FROM booking_interviewers WHERE booking_id = ?1 ORDER BY rowid",
    )?;
    let ids = stmt
        .query_map([booking_id], |row| row.get(0))?
        .collect::<std::result::Result<Vec<String>, _>>()?;
    Ok(ids)
}

fn attach_interviewers(conn: &Connection, mut rows: Vec<BookingRow>) -> Result<Vec<BookingRow>> {
    for row in &mut rows {
        row.interviewer_ids = query_interviewers(conn, &row.id)?;
    }
    Ok(rows)
}

fn query_feedback(
    conn: &Connection,
    booking_id: &str,
    submitted_by: &str,
) -> Result<Option<FeedbackRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, booking_id, submitted_by, technical, communication, problem_solving,
                culture_fit, recommendation, summary, created_at, updated_at
         FROM feedback WHERE booking_id = ?1 AND submitted_by = ?2",
    )?;
    let row = stmt
        .query_row([booking_id, submitted_by], |row| {
            Ok(FeedbackRow {
                id: row.get(0)?,
                booking_id: row.get(1)?,
                submitted_by: row.get(2)?,
                technical: row.get(3)?,
                communication: row.get(4)?,
                problem_solving: row.get(5)?,
                culture_fit: row.get(6)?,
                recommendation: row.get(7)?,
                summary: row.get(8)?,
                created_at: row.get(9)?,
                updated_at: row.get(10)?,
            })
        })
        .optional()?;
    Ok(row)
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
