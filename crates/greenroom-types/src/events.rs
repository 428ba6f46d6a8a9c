use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Events sent server -> client inside an interview room.
///
/// Signaling payloads (`description`, `candidate`) are opaque to the relay;
/// they are forwarded verbatim with a server-stamped sender id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum RoomEvent {
    /// Server confirms the connection is bound to the room.
    #[serde(rename = "ready")]
    Ready { user_id: Uuid, room_id: String },

    /// Another participant joined. Never delivered to the joiner itself,
    /// so only the already-present side starts an offer.
    #[serde(rename = "participant:joined")]
    ParticipantJoined { user_id: Uuid },

    /// A participant disconnected.
    #[serde(rename = "participant:left")]
    ParticipantLeft { user_id: Uuid },

    #[serde(rename = "signal:offer")]
    Offer {
        from: Uuid,
        description: serde_json::Value,
    },

    #[serde(rename = "signal:answer")]
    Answer {
        from: Uuid,
        description: serde_json::Value,
    },

    #[serde(rename = "signal:candidate")]
    Candidate {
        from: Uuid,
        candidate: serde_json::Value,
    },

    /// Chat is echoed to the whole room including the sender, with a
    /// server-assigned timestamp for a shared transcript order.
    #[serde(rename = "chat:message")]
    Chat {
        from: Uuid,
        text: String,
        ts: DateTime<Utc>,
    },

    /// Advisory: receivers are expected to leave, nobody is force-dropped.
    #[serde(rename = "meeting:ended")]
    Ended,
}

/// Commands sent client -> server inside an interview room.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum RoomCommand {
    #[serde(rename = "signal:offer")]
    Offer { description: serde_json::Value },

    #[serde(rename = "signal:answer")]
    Answer { description: serde_json::Value },

    #[serde(rename = "signal:candidate")]
    Candidate { candidate: serde_json::Value },

    #[serde(rename = "chat:message")]
    Chat { text: String },

    #[serde(rename = "meeting:end")]
    End,
}
