//! Per-connection handler: identity, outbound writer, and message routing.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Assign a fresh `PlayerId` and spawn the writer task
//!   2. Loop: receive frames → decode `ClientAction` → dispatch
//!   3. On exit, leave whatever room the player was in

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uno_engine::{PlayerId, Rejection};
use uno_protocol::{ClientAction, Codec, ROOM_UNAVAILABLE, ServerMessage};
use uno_room::{PlayerSender, RoomError, RoomHandle};
use uno_transport::{Connection, WebSocketConnection};

use crate::ServerError;
use crate::server::ServerState;

/// Sent when a join targets a room that has no free seat.
pub(crate) const ROOM_FULL: &str = "Room is full.";

/// Counter for handing out player ids. One id per connection.
static NEXT_PLAYER_ID: AtomicU64 = AtomicU64::new(1);

/// Drop guard that takes the player out of their room when the handler
/// exits, and stops the writer task.
///
/// Since `Drop` is synchronous, the leave runs in a fire-and-forget task.
struct ConnectionGuard {
    player_id: PlayerId,
    state: Arc<ServerState>,
    writer: JoinHandle<()>,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.writer.abort();

        let player_id = self.player_id;
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            match state.rooms.leave_room(player_id).await {
                Ok(_) | Err(RoomError::NotInRoom(_)) => {}
                Err(e) => tracing::debug!(%player_id, error = %e, "leave on disconnect failed"),
            }
        });
    }
}

/// The per-connection view of where the player is.
struct Session {
    player_id: PlayerId,
    sender: PlayerSender,
    /// The room the player is in. Game actions go straight to its actor
    /// without a registry lookup.
    room: Option<RoomHandle>,
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection(
    conn: WebSocketConnection,
    state: Arc<ServerState>,
) -> Result<(), ServerError> {
    let conn = Arc::new(conn);
    let player_id = PlayerId(NEXT_PLAYER_ID.fetch_add(1, Ordering::Relaxed));
    tracing::info!(peer = %conn.peer_addr(), %player_id, "player connected");

    let (tx, rx) = mpsc::unbounded_channel();
    let writer = tokio::spawn(write_outbound(Arc::clone(&conn), rx, state.codec));
    let _guard = ConnectionGuard {
        player_id,
        state: Arc::clone(&state),
        writer,
    };

    let mut session = Session {
        player_id,
        sender: tx,
        room: None,
    };

    loop {
        let received = match state.idle_timeout {
            Some(limit) => match tokio::time::timeout(limit, conn.recv()).await {
                Ok(received) => received,
                Err(_) => {
                    tracing::info!(%player_id, "connection timed out");
                    break;
                }
            },
            None => conn.recv().await,
        };

        let text = match received {
            Ok(Some(text)) => text,
            Ok(None) => {
                tracing::info!(%player_id, "connection closed cleanly");
                break;
            }
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "recv error");
                break;
            }
        };

        let action: ClientAction = match state.codec.decode(&text) {
            Ok(action) => action,
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "dropping undecodable frame");
                continue;
            }
        };

        dispatch(&state, &mut session, action).await;
    }

    // _guard drops here → leave fires and the writer stops.
    conn.close().await?;
    Ok(())
}

/// Routes one decoded action.
async fn dispatch(state: &ServerState, session: &mut Session, action: ClientAction) {
    let player_id = session.player_id;
    let profile = action.profile().unwrap_or_default();

    match action {
        ClientAction::Create { .. } => {
            let created = state
                .rooms
                .create_room(player_id, profile, session.sender.clone())
                .await;
            match created {
                Ok(handle) => session.room = Some(handle),
                Err(e) => {
                    tracing::warn!(%player_id, error = %e, "create failed");
                    reply(session, ServerMessage::error(e.to_string()));
                }
            }
        }

        ClientAction::Join { ref room, .. } => {
            let joined = state
                .rooms
                .join_room(player_id, room, profile, session.sender.clone())
                .await;
            match joined {
                Ok(handle) => session.room = Some(handle),
                Err(e) => {
                    tracing::debug!(%player_id, room = %room, error = %e, "join refused");
                    reply(session, ServerMessage::error(join_failure_text(&e)));
                }
            }
        }

        ClientAction::UpdateProfile { .. }
        | ClientAction::StartGame
        | ClientAction::PlayCard { .. }
        | ClientAction::DrawCard
        | ClientAction::RestartGame => {
            let Some(room_action) = action.into_room_action() else {
                return;
            };
            let result = match &session.room {
                Some(handle) => handle.act(player_id, room_action).await,
                None => Err(RoomError::NotInRoom(player_id)),
            };
            match result {
                Ok(_) => {}
                Err(RoomError::Rejected(rejection)) => refuse(state, session, &rejection),
                Err(RoomError::NotInRoom(_)) => {
                    refuse(state, session, &Rejection::NotInRoom(player_id));
                }
                Err(e @ RoomError::Unavailable(_)) => {
                    tracing::warn!(%player_id, error = %e, "room went away");
                    session.room = None;
                }
                Err(e) => tracing::debug!(%player_id, error = %e, "action failed"),
            }
        }
    }
}

/// The text a failed join is answered with.
fn join_failure_text(error: &RoomError) -> &'static str {
    match error {
        RoomError::Rejected(Rejection::RoomFull(_)) => ROOM_FULL,
        _ => ROOM_UNAVAILABLE,
    }
}

fn refuse(state: &ServerState, session: &Session, rejection: &Rejection) {
    if let Some(msg) = state.policy.respond(session.player_id, rejection) {
        reply(session, msg);
    }
}

/// Queues a message behind anything the room has already sent this player.
fn reply(session: &Session, msg: ServerMessage) {
    let _ = session.sender.send(msg);
}

/// Drains the player's outbound channel onto the socket.
async fn write_outbound<C: Codec>(
    conn: Arc<WebSocketConnection>,
    mut rx: mpsc::UnboundedReceiver<ServerMessage>,
    codec: C,
) {
    while let Some(msg) = rx.recv().await {
        let text = match codec.encode(&msg) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(kind = msg.kind(), error = %e, "failed to encode outbound message");
                continue;
            }
        };
        if let Err(e) = conn.send(&text).await {
            tracing::debug!(peer = %conn.peer_addr(), error = %e, "send failed, stopping writer");
            break;
        }
    }
}
