use std::sync::Arc;

use jsonwebtoken::{DecodingKey, Validation, decode};
use tracing::warn;
use uuid::Uuid;

use greenroom_db::Database;
use greenroom_types::api::Claims;
use greenroom_types::models::Role;

/// Why a connection attempt was refused. Stable reason codes, surfaced in
/// the HTTP response before any upgrade happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    Unauthorized,
    RoomNotFound,
    Forbidden,
    /// The lookup itself failed; says nothing about whether the room exists.
    Internal,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::Unauthorized => "unauthorized",
            RejectReason::RoomNotFound => "room_not_found",
            RejectReason::Forbidden => "forbidden",
            RejectReason::Internal => "internal",
        }
    }
}

/// Proof that a connection may be bound to a room. Issued once at connect
/// time; messages on an accepted connection are not re-authorized (the
/// trust boundary is the connection itself).
#[derive(Debug, Clone)]
pub struct RoomTicket {
    pub user_id: Uuid,
    pub role: Role,
    pub room_id: String,
}

/// Authorize a connection attempt against a room, before the WebSocket
/// upgrade: bearer token must verify, the room must resolve to a booking,
/// and the identity must be the candidate, an interviewer, or HR.
pub async fn authorize(
    db: Arc<Database>,
    jwt_secret: &str,
    token: Option<&str>,
    room_id: &str,
) -> Result<RoomTicket, RejectReason> {
    let token = token.ok_or(RejectReason::Unauthorized)?;

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        warn!(%room_id, "handshake token rejected: {e}");
        RejectReason::Unauthorized
    })?
    .claims;

    let room = room_id.to_string();
    let booking = tokio::task::spawn_blocking(move || db.get_booking_by_room(&room))
        .await
        .map_err(|e| {
            warn!("handshake lookup join error: {e}");
            RejectReason::Internal
        })?
        .map_err(|e| {
            warn!("handshake lookup failed: {e}");
            RejectReason::Internal
        })?
        .ok_or(RejectReason::RoomNotFound)?;

    let user_id = claims.sub.to_string();
    let is_participant =
        booking.candidate_id == user_id || booking.interviewer_ids.contains(&user_id);

    if !is_participant && !claims.role.is_privileged() {
        return Err(RejectReason::Forbidden);
    }

    Ok(RoomTicket {
        user_id: claims.sub,
        role: claims.role,
        room_id: room_id.to_string(),
    })
}
