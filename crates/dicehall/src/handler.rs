//! Per-connection handler: identity, receive loop and request routing.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Assign a player id and send `ServerJoin`
//!   2. Loop: receive messages → route to the lifecycle or gameplay
//!      coordinator
//!   3. On close or error, leave whatever room the player was in

use std::sync::Arc;

use dicehall_protocol::{Message, PlayerId, RoomId};
use dicehall_room::{Membership, PlayerConnection, PlayerHandle};

use crate::server::ServerState;

/// Drop guard that takes the player out of their room when the handler
/// exits, however it exits.
///
/// `Drop` is synchronous, so the leave runs as a fire-and-forget task.
struct MembershipGuard<C: PlayerConnection> {
    player_id: PlayerId,
    room: Option<RoomId>,
    state: Arc<ServerState<C>>,
}

impl<C: PlayerConnection> Drop for MembershipGuard<C> {
    fn drop(&mut self) {
        let Some(room_id) = self.room.take() else {
            return;
        };
        let player_id = self.player_id;
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            if let Err(e) = state.lifecycle.leave_room(&room_id, player_id).await {
                tracing::debug!(%room_id, %player_id, error = %e, "cleanup leave failed");
            }
        });
    }
}

/// Handles a single player connection from accept to close.
pub(crate) async fn handle_player<C: PlayerConnection>(
    connection: Arc<C>,
    state: Arc<ServerState<C>>,
) {
    let player_id = state.next_player_id();
    let player = PlayerHandle::new(player_id, format!("Player {}", player_id.0), connection);

    let greeting = Message::ServerJoin {
        player: player.info(),
    };
    if let Err(e) = player.connection.send(&greeting).await {
        tracing::debug!(%player_id, error = %e, "failed to greet player");
        return;
    }
    tracing::info!(%player_id, "player connected");

    let mut guard = MembershipGuard {
        player_id,
        room: None,
        state: Arc::clone(&state),
    };

    loop {
        let message = match player.connection.receive().await {
            Ok(Some(message)) => message,
            Ok(None) => {
                tracing::info!(%player_id, "connection closed");
                break;
            }
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "receive error");
                break;
            }
        };

        if message.is_room_request() {
            handle_room_request(&state, &player, &mut guard, message).await;
        } else if message.is_gameplay_request() {
            if let Err(e) = state.gameplay.handle(player_id, message).await {
                tracing::debug!(%player_id, error = %e, "gameplay request failed");
            }
        } else {
            tracing::debug!(%player_id, kind = message.kind(), "ignoring server-only message");
        }
    }

    let _ = player.connection.close().await;
    // guard drops here → leave fires.
}

/// Runs a room-management request and tracks the resulting membership.
///
/// A player sits in at most one room; create and join requests from a
/// seated player are dropped.
async fn handle_room_request<C: PlayerConnection>(
    state: &ServerState<C>,
    player: &PlayerHandle<C>,
    guard: &mut MembershipGuard<C>,
    message: Message,
) {
    let player_id = player.id;
    if let (Message::CreateRoom | Message::JoinRoom { .. }, Some(current)) = (&message, &guard.room)
    {
        tracing::debug!(%player_id, room_id = %current, kind = message.kind(), "already seated");
        return;
    }

    match state.lifecycle.handle(player, message).await {
        Ok(Membership::Entered(room_id)) => guard.room = Some(room_id),
        Ok(Membership::Left(room_id)) => {
            if guard.room.as_ref() == Some(&room_id) {
                guard.room = None;
            }
        }
        Ok(Membership::Unchanged) => {}
        Err(e) => {
            tracing::debug!(%player_id, error = %e, "room request failed");
        }
    }
}
