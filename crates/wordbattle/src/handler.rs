//! Per-connection handler: decoding, routing, and event delivery.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The task waits on two things at once:
//!   1. Inbound frames → decode a `ClientAction` → hand it to the rooms
//!   2. Outbound events from the connection's channel → encode → send
//!
//! Everything the connection is told goes through that one channel: room
//! broadcasts, rejections, and the `WELCOME` after taking a seat. Events
//! therefore reach the client in the order they were produced.

use std::sync::Arc;

use tokio::sync::mpsc;
use wordbattle_protocol::{ClientAction, Codec, PlayerId, RejectReason, RoomId, ServerEvent};
use wordbattle_room::{PlayerSender, RejoinTarget, RoomAction};
use wordbattle_session::SessionError;
use wordbattle_transport::{Connection, TransportError, WebSocketConnection};

use crate::WordBattleError;
use crate::server::ServerState;

/// Drop guard that releases a player's seat subscription and starts the
/// session grace period when the handler exits.
///
/// This ensures cleanup happens even if the handler panics. Since `Drop`
/// is synchronous, we spawn a fire-and-forget task for the async locks.
struct SessionGuard<C: Codec> {
    player_id: PlayerId,
    state: Arc<ServerState<C>>,
}

impl<C: Codec> Drop for SessionGuard<C> {
    fn drop(&mut self) {
        let player_id = self.player_id;
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            // No session means the connection never took a seat, or its
            // seat was taken over by a newer connection.
            let _ = state.sessions.lock().await.disconnect(player_id);
            state.rooms.lock().await.disconnect(player_id).await;
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C: Codec>(
    conn: WebSocketConnection,
    state: Arc<ServerState<C>>,
) -> Result<(), WordBattleError> {
    let conn_id = conn.id();
    let player_id = PlayerId(conn_id.into_inner());
    tracing::debug!(%conn_id, %player_id, "handling new connection");

    let (outbound, mut events) = mpsc::unbounded_channel();
    let _guard = SessionGuard {
        player_id,
        state: Arc::clone(&state),
    };

    loop {
        tokio::select! {
            inbound = conn.recv() => {
                let data = match inbound {
                    Ok(Some(data)) => data,
                    Ok(None) => {
                        tracing::info!(%player_id, "connection closed cleanly");
                        break;
                    }
                    Err(e) => {
                        tracing::debug!(%player_id, error = %e, "recv error");
                        break;
                    }
                };
                handle_frame(&state, player_id, &outbound, &data).await;
            }
            Some(event) = events.recv() => {
                send_event(&conn, &state.codec, &event).await?;
            }
        }
    }

    // _guard drops here → disconnect fires.
    Ok(())
}

/// Decodes one inbound frame and acts on it.
async fn handle_frame<C: Codec>(
    state: &ServerState<C>,
    player_id: PlayerId,
    outbound: &PlayerSender,
    data: &[u8],
) {
    let action: ClientAction = match state.codec.decode(data) {
        Ok(action) => action,
        Err(e) => {
            tracing::debug!(%player_id, error = %e, "failed to decode action");
            reject(outbound, RejectReason::MalformedAction);
            return;
        }
    };

    match action {
        ClientAction::CreateRoom { player_name } => {
            let result = state
                .rooms
                .lock()
                .await
                .create_room(player_id, player_name, outbound.clone())
                .await;
            match result {
                Ok(room_id) => welcome(state, player_id, room_id, outbound).await,
                Err(e) => reject(outbound, e.reason()),
            }
        }

        ClientAction::JoinRoom {
            room_id,
            player_name,
        } => {
            let result = state
                .rooms
                .lock()
                .await
                .join_room(player_id, &room_id, player_name, outbound.clone())
                .await;
            match result {
                Ok(()) => welcome(state, player_id, room_id, outbound).await,
                Err(e) => reject(outbound, e.reason()),
            }
        }

        ClientAction::RejoinRoom {
            room_id,
            player_name,
            token,
        } => {
            let result = match token {
                Some(token) => {
                    rejoin_with_token(state, player_id, &room_id, &token, outbound).await
                }
                None => rejoin_by_name(state, player_id, &room_id, player_name, outbound).await,
            };
            // A rejoin that matches nothing is not answered.
            if let Err(e) = result {
                tracing::debug!(%player_id, %room_id, error = %e, "rejoin ignored");
            }
        }

        other => {
            let Some((room_id, action)) = into_room_action(other) else {
                return;
            };
            let result = state.rooms.lock().await.route(player_id, &room_id, action).await;
            if let Err(e) = result {
                tracing::debug!(%player_id, %room_id, error = %e, "action not routed");
                reject(outbound, e.reason());
            }
        }
    }
}

/// Splits an in-room client action into its room code and the action.
///
/// Returns `None` for the seat-taking actions, which are not routed.
fn into_room_action(action: ClientAction) -> Option<(RoomId, RoomAction)> {
    let room_id = action.room_id()?.clone();
    let routed = match action {
        ClientAction::StartGame { .. } => RoomAction::Start,
        ClientAction::PlaceLetter {
            row, col, letter, ..
        } => RoomAction::PlaceLetter { row, col, letter },
        ClientAction::AttemptWord { cells, .. } => RoomAction::AttemptWord { cells },
        ClientAction::PassTurn { .. } => RoomAction::PassTurn,
        ClientAction::ImBack { .. } => RoomAction::ImBack,
        ClientAction::ChatMessage { message, .. } => RoomAction::Chat { message },
        ClientAction::CreateRoom { .. }
        | ClientAction::JoinRoom { .. }
        | ClientAction::RejoinRoom { .. } => return None,
    };
    Some((room_id, routed))
}

/// Opens a session for a connection that just took a seat and tells the
/// client its rejoin token.
async fn welcome<C: Codec>(
    state: &ServerState<C>,
    player_id: PlayerId,
    room_id: RoomId,
    outbound: &PlayerSender,
) {
    let token = {
        let mut sessions = state.sessions.lock().await;
        let token = match sessions.create(player_id) {
            Ok(session) => session.reconnect_token.clone(),
            Err(e) => {
                tracing::warn!(%player_id, error = %e, "seated without a session");
                return;
            }
        };
        if let Err(e) = sessions.bind_room(player_id, room_id.clone()) {
            tracing::warn!(%player_id, error = %e, "session room not recorded");
        }
        token
    };

    let _ = outbound.send(ServerEvent::Welcome {
        room_id,
        player_id,
        token,
    });
}

/// Reclaims the seat a rejoin token was issued for.
///
/// A still-open connection holding the seat is taken over. The session
/// lock is held throughout, so the sweep cannot expire the session
/// between moving the seat and moving the session.
async fn rejoin_with_token<C: Codec>(
    state: &ServerState<C>,
    player_id: PlayerId,
    room_id: &RoomId,
    token: &str,
    outbound: &PlayerSender,
) -> Result<(), WordBattleError> {
    let mut sessions = state.sessions.lock().await;
    let previous = sessions.resolve(token)?.player_id;
    if sessions.room_of(&previous) != Some(room_id) {
        return Err(SessionError::InvalidToken.into());
    }
    sessions.check_transfer(previous, player_id)?;

    state
        .rooms
        .lock()
        .await
        .rejoin(player_id, room_id, RejoinTarget::Seat(previous), outbound.clone())
        .await?;

    if let Err(e) = sessions.transfer(previous, player_id) {
        tracing::warn!(
            %player_id,
            %previous,
            %room_id,
            error = %e,
            "seat moved but session did not"
        );
        return Ok(());
    }
    tracing::info!(%player_id, %previous, %room_id, "player rejoined with token");
    Ok(())
}

/// Reclaims an abandoned seat by display name.
///
/// The seat's session moves to this connection when it still exists;
/// otherwise a fresh one is opened. Either way the client is sent the
/// seat's token, since it evidently lost it.
async fn rejoin_by_name<C: Codec>(
    state: &ServerState<C>,
    player_id: PlayerId,
    room_id: &RoomId,
    name: String,
    outbound: &PlayerSender,
) -> Result<(), WordBattleError> {
    let previous = state
        .rooms
        .lock()
        .await
        .rejoin(player_id, room_id, RejoinTarget::Name(name), outbound.clone())
        .await?;
    tracing::info!(%player_id, %previous, %room_id, "player rejoined by name");

    let token = {
        let mut sessions = state.sessions.lock().await;
        match sessions.transfer(previous, player_id) {
            Ok(session) => Some(session.reconnect_token.clone()),
            Err(SessionError::NotFound(_) | SessionError::SessionExpired(_)) => None,
            Err(e) => return Err(e.into()),
        }
    };

    match token {
        Some(token) => {
            let _ = outbound.send(ServerEvent::Welcome {
                room_id: room_id.clone(),
                player_id,
                token,
            });
        }
        None => welcome(state, player_id, room_id.clone(), outbound).await,
    }
    Ok(())
}

/// Answers the sender with a rejection.
fn reject(outbound: &PlayerSender, reason: RejectReason) {
    let _ = outbound.send(ServerEvent::MoveRejected { reason });
}

/// Encodes an event and writes it to the connection.
async fn send_event(
    conn: &WebSocketConnection,
    codec: &impl Codec,
    event: &ServerEvent,
) -> Result<(), WordBattleError> {
    let bytes = codec.encode(event)?;
    if codec.is_text() {
        let text = std::str::from_utf8(&bytes).map_err(|_| TransportError::NotUtf8)?;
        conn.send_text(text).await?;
    } else {
        conn.send(&bytes).await?;
    }
    Ok(())
}
