use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS bookings (
            id                TEXT PRIMARY KEY,
            title             TEXT NOT NULL,
            candidate_id      TEXT NOT NULL,
            scheduled_at      TEXT NOT NULL,
            duration_minutes  INTEGER NOT NULL DEFAULT 60,
            status            TEXT NOT NULL DEFAULT 'scheduled',
            room_id           TEXT NOT NULL UNIQUE,
            notes             TEXT NOT NULL DEFAULT '',
            created_by        TEXT NOT NULL,
            created_at        TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at        TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_bookings_candidate
            ON bookings(candidate_id, scheduled_at);

        CREATE INDEX IF NOT EXISTS idx_bookings_room
            ON bookings(room_id);

        CREATE TABLE IF NOT EXISTS booking_interviewers (
            booking_id      TEXT NOT NULL REFERENCES bookings(id),
            interviewer_id  TEXT NOT NULL,
            UNIQUE(booking_id, interviewer_id)
        );

        CREATE INDEX IF NOT EXISTS idx_interviewers_user
            ON booking_interviewers(interviewer_id);

        CREATE TABLE IF NOT EXISTS feedback (
            id              TEXT PRIMARY KEY,
            booking_id      TEXT NOT NULL REFERENCES bookings(id),
            submitted_by    TEXT NOT NULL,
            technical       INTEGER,
            communication   INTEGER,
            problem_solving INTEGER,
            culture_fit     INTEGER,
            recommendation  TEXT NOT NULL DEFAULT 'hold',
            summary         TEXT NOT NULL DEFAULT '',
            created_at      TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at      TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE(booking_id, submitted_by)
        );

        CREATE INDEX IF NOT EXISTS idx_feedback_booking
            ON feedback(booking_id);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
