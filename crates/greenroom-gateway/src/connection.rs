use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tracing::{info, trace, warn};
use uuid::Uuid;

use greenroom_types::events::{RoomCommand, RoomEvent};

use crate::handshake::RoomTicket;
use crate::sessions::RoomSessions;

/// Heartbeat interval: server sends a Ping every 15 seconds.
/// If 2 consecutive Pongs are missed (~30s), the connection is dropped.
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(15);

/// Drive one accepted WebSocket connection for its whole life. The ticket
/// was issued at the HTTP upgrade layer, so the connection is already bound
/// to its room; it is never re-bound and messages are not re-authorized.
pub async fn handle_connection(socket: WebSocket, sessions: RoomSessions, ticket: RoomTicket) {
    let RoomTicket {
        user_id, room_id, ..
    } = ticket;

    let (mut sender, mut receiver) = socket.split();

    info!(%user_id, %room_id, "participant connected");

    let (conn_id, mut room_rx) = sessions.join(&room_id, user_id).await;

    // Confirm the binding to the joiner, then announce to everyone already
    // present. Never to the joiner itself: the first join of an empty room
    // announces nothing, so only the existing side starts an offer.
    let ready = RoomEvent::Ready {
        user_id,
        room_id: room_id.clone(),
    };
    let ready_json = match serde_json::to_string(&ready) {
        Ok(json) => json,
        Err(e) => {
            warn!(%user_id, "failed to encode ready event: {e}");
            sessions.leave(&room_id, conn_id).await;
            return;
        }
    };
    if sender.send(Message::Text(ready_json.into())).await.is_err() {
        sessions.leave(&room_id, conn_id).await;
        return;
    }
    sessions
        .broadcast_others(&room_id, conn_id, RoomEvent::ParticipantJoined { user_id })
        .await;

    // Shared flag for heartbeat
    let pong_received = Arc::new(AtomicBool::new(true));
    let pong_flag_send = pong_received.clone();
    let pong_flag_recv = pong_received.clone();

    // Forward room events -> client, with heartbeat
    let mut send_task = tokio::spawn(async move {
        let mut heartbeat = tokio::time::interval(HEARTBEAT_INTERVAL);
        heartbeat.tick().await;
        let mut missed_heartbeats: u8 = 0;

        loop {
            tokio::select! {
                result = room_rx.recv() => {
                    let event = match result {
                        Some(event) => event,
                        None => break,
                    };
                    let text = match serde_json::to_string(&event) {
                        Ok(text) => text,
                        Err(e) => {
                            warn!("failed to encode room event: {e}");
                            continue;
                        }
                    };
                    if sender.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                _ = heartbeat.tick() => {
                    if pong_flag_send.swap(false, Ordering::Acquire) {
                        missed_heartbeats = 0;
                    } else {
                        missed_heartbeats += 1;
                        if missed_heartbeats >= 2 {
                            warn!("heartbeat timeout (missed {} pongs), dropping connection", missed_heartbeats);
                            break;
                        }
                    }
                    if sender.send(Message::Ping(vec![].into())).await.is_err() {
                        break;
                    }
                }
            }
        }
    });

    // Read commands from the client
    let sessions_recv = sessions.clone();
    let room_id_recv = room_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => match serde_json::from_str::<RoomCommand>(&text) {
                    Ok(cmd) => {
                        handle_command(&sessions_recv, &room_id_recv, conn_id, user_id, cmd).await;
                    }
                    Err(e) => {
                        warn!(
                            %user_id,
                            "bad room command: {} -- raw: {}",
                            e,
                            &text[..text.len().min(200)]
                        );
                    }
                },
                Message::Pong(_) => {
                    pong_flag_recv.store(true, Ordering::Release);
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    // Wait for either task to finish
    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    // Closing for any reason removes the member and tells the remainder.
    sessions.leave(&room_id, conn_id).await;
    sessions
        .broadcast_all(&room_id, RoomEvent::ParticipantLeft { user_id })
        .await;
    info!(%user_id, %room_id, "participant disconnected");
}

/// Relay one client command. Signaling payloads pass through verbatim with
/// the sender stamped server-side; the relay never interprets them.
async fn handle_command(
    sessions: &RoomSessions,
    room_id: &str,
    conn_id: Uuid,
    user_id: Uuid,
    cmd: RoomCommand,
) {
    match cmd {
        RoomCommand::Offer { description } => {
            trace!(%user_id, %room_id, "relaying offer");
            sessions
                .broadcast_others(
                    room_id,
                    conn_id,
                    RoomEvent::Offer {
                        from: user_id,
                        description,
                    },
                )
                .await;
        }

        RoomCommand::Answer { description } => {
            trace!(%user_id, %room_id, "relaying answer");
            sessions
                .broadcast_others(
                    room_id,
                    conn_id,
                    RoomEvent::Answer {
                        from: user_id,
                        description,
                    },
                )
                .await;
        }

        RoomCommand::Candidate { candidate } => {
            trace!(%user_id, %room_id, "relaying candidate");
            sessions
                .broadcast_others(
                    room_id,
                    conn_id,
                    RoomEvent::Candidate {
                        from: user_id,
                        candidate,
                    },
                )
                .await;
        }

        // Chat goes to the whole room, sender included, so every side sees
        // the same server-stamped transcript order.
        RoomCommand::Chat { text } => {
            sessions
                .broadcast_all(
                    room_id,
                    RoomEvent::Chat {
                        from: user_id,
                        text,
                        ts: chrono::Utc::now(),
                    },
                )
                .await;
        }

        // Advisory: everyone is told, nobody is force-disconnected.
        RoomCommand::End => {
            info!(%user_id, %room_id, "meeting ended");
            sessions.broadcast_all(room_id, RoomEvent::Ended).await;
        }
    }
}
