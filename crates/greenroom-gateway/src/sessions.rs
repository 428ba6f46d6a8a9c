use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, mpsc};
use tracing::debug;
use uuid::Uuid;

use greenroom_types::events::RoomEvent;

struct Member {
    user_id: Uuid,
    tx: mpsc::UnboundedSender<RoomEvent>,
}

/// The per-room member registry. This is the only mutable shared state in
/// the relay subsystem, and `join`/`leave` are its only mutators. A room
/// entry exists exactly while at least one connection is bound to it;
/// nothing is persisted.
#[derive(Clone)]
pub struct RoomSessions {
    inner: Arc<RwLock<HashMap<String, HashMap<Uuid, Member>>>>,
}

impl Default for RoomSessions {
    fn default() -> Self {
        Self::new()
    }
}

impl RoomSessions {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Bind a connection to a room. Returns the connection id and the
    /// receiving end this connection's events are delivered on.
    pub async fn join(
        &self,
        room_id: &str,
        user_id: Uuid,
    ) -> (Uuid, mpsc::UnboundedReceiver<RoomEvent>) {
        let conn_id = Uuid::new_v4();
        let (tx, rx) = mpsc::unbounded_channel();

        let mut rooms = self.inner.write().await;
        rooms
            .entry(room_id.to_string())
            .or_default()
            .insert(conn_id, Member { user_id, tx });

        debug!(%room_id, %user_id, %conn_id, "connection joined room");
        (conn_id, rx)
    }

    /// Unbind a connection. Discards the room entry when the last member
    /// leaves. Returns the user id that was bound, if any.
    pub async fn leave(&self, room_id: &str, conn_id: Uuid) -> Option<Uuid> {
        let mut rooms = self.inner.write().await;
        let members = rooms.get_mut(room_id)?;
        let removed = members.remove(&conn_id).map(|m| m.user_id);

        if members.is_empty() {
            rooms.remove(room_id);
            debug!(%room_id, "room session discarded");
        }
        removed
    }

    /// Deliver an event to every member of the room except `sender_conn`.
    /// Best effort: members whose connection is already gone are skipped.
    pub async fn broadcast_others(&self, room_id: &str, sender_conn: Uuid, event: RoomEvent) {
        let rooms = self.inner.read().await;
        if let Some(members) = rooms.get(room_id) {
            for (conn_id, member) in members.iter() {
                if *conn_id != sender_conn {
                    let _ = member.tx.send(event.clone());
                }
            }
        }
    }

    /// Deliver an event to every member of the room, sender included.
    pub async fn broadcast_all(&self, room_id: &str, event: RoomEvent) {
        let rooms = self.inner.read().await;
        if let Some(members) = rooms.get(room_id) {
            for member in members.values() {
                let _ = member.tx.send(event.clone());
            }
        }
    }

    pub async fn member_count(&self, room_id: &str) -> usize {
        self.inner
            .read()
            .await
            .get(room_id)
            .map_or(0, HashMap::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined(user_id: Uuid) -> RoomEvent {
        RoomEvent::ParticipantJoined { user_id }
    }

    #[tokio::test]
    async fn first_join_has_nobody_to_notify() {
        let sessions = RoomSessions::new();
        let alice = Uuid::new_v4();

        let (conn, mut rx) = sessions.join("room_a", alice).await;
        sessions
            .broadcast_others("room_a", conn, joined(alice))
            .await;

        // Nothing delivered to the joiner itself.
        assert!(rx.try_recv().is_err());
        assert_eq!(sessions.member_count("room_a").await, 1);
    }

    #[tokio::test]
    async fn second_join_notifies_only_the_first() {
        let sessions = RoomSessions::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let (_conn_a, mut rx_a) = sessions.join("room_a", alice).await;
        let (conn_b, mut rx_b) = sessions.join("room_a", bob).await;

        sessions
            .broadcast_others("room_a", conn_b, joined(bob))
            .await;

        match rx_a.try_recv().unwrap() {
            RoomEvent::ParticipantJoined { user_id } => assert_eq!(user_id, bob),
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(rx_a.try_recv().is_err());
        assert!(rx_b.try_recv().is_err());
    }

    #[tokio::test]
    async fn broadcast_all_includes_sender() {
        let sessions = RoomSessions::new();
        let (conn_a, mut rx_a) = sessions.join("room_a", Uuid::new_v4()).await;
        let (_conn_b, mut rx_b) = sessions.join("room_a", Uuid::new_v4()).await;

        let _ = conn_a;
        sessions.broadcast_all("room_a", RoomEvent::Ended).await;

        assert!(matches!(rx_a.try_recv().unwrap(), RoomEvent::Ended));
        assert!(matches!(rx_b.try_recv().unwrap(), RoomEvent::Ended));
    }

    #[tokio::test]
    async fn rooms_are_isolated() {
        let sessions = RoomSessions::new();
        let (_a, mut rx_a) = sessions.join("room_a", Uuid::new_v4()).await;
        let (conn_b, mut rx_b) = sessions.join("room_b", Uuid::new_v4()).await;

        sessions
            .broadcast_others("room_a", conn_b, RoomEvent::Ended)
            .await;
        sessions.broadcast_all("room_a", RoomEvent::Ended).await;

        assert!(rx_a.try_recv().is_ok());
        assert!(rx_b.try_recv().is_err());
    }

    #[tokio::test]
    async fn last_leave_discards_room_state() {
        let sessions = RoomSessions::new();
        let alice = Uuid::new_v4();
        let (conn_a, _rx_a) = sessions.join("room_a", alice).await;
        let (conn_b, _rx_b) = sessions.join("room_a", Uuid::new_v4()).await;

        assert_eq!(sessions.leave("room_a", conn_a).await, Some(alice));
        assert_eq!(sessions.member_count("room_a").await, 1);

        sessions.leave("room_a", conn_b).await;
        assert_eq!(sessions.member_count("room_a").await, 0);

        // Leaving an already-discarded room is harmless.
        assert_eq!(sessions.leave("room_a", conn_b).await, None);
    }
}
