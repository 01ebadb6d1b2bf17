//! Room-management requests: create, join, leave and list.

use std::sync::Arc;

use dicehall_protocol::{Message, PlayerId, RoomId};
use rand::Rng;

use crate::connection::{PlayerConnection, deliver};
use crate::player::PlayerHandle;
use crate::registry::{Founding, RoomRegistry};
use crate::RoomError;

/// How a handled request changed the sender's room membership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Membership {
    Entered(RoomId),
    Left(RoomId),
    Unchanged,
}

/// Runs room-management requests against the registry and sends the
/// resulting notices.
pub struct RoomLifecycleCoordinator<C> {
    registry: Arc<RoomRegistry<C>>,
}

impl<C: PlayerConnection> RoomLifecycleCoordinator<C> {
    pub fn new(registry: Arc<RoomRegistry<C>>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<RoomRegistry<C>> {
        &self.registry
    }

    /// Dispatches one room-management request from `player`.
    ///
    /// Anything that isn't a room-management request is ignored.
    pub async fn handle(
        &self,
        player: &PlayerHandle<C>,
        message: Message,
    ) -> Result<Membership, RoomError> {
        match message {
            Message::CreateRoom => self.create_room(player).await.map(Membership::Entered),
            Message::JoinRoom { room_id } => {
                self.join_room(&room_id, player).await?;
                Ok(Membership::Entered(room_id))
            }
            Message::LeaveRoom { room_id } => {
                self.leave_room(&room_id, player.id).await?;
                Ok(Membership::Left(room_id))
            }
            Message::ListRooms => {
                self.list_rooms(&player.connection).await;
                Ok(Membership::Unchanged)
            }
            other => {
                tracing::debug!(kind = other.kind(), "not a room request");
                Ok(Membership::Unchanged)
            }
        }
    }

    /// Creates a room with a fresh id and seats `player` in it.
    ///
    /// The creator gets `RoomCreated` followed by the usual join notices.
    /// Nobody else can join until those have been sent.
    pub async fn create_room(&self, player: &PlayerHandle<C>) -> Result<RoomId, RoomError> {
        let room_id = generate_room_id();
        let Founding { room, deliveries } = self
            .registry
            .found_room(room_id.clone(), player.to_player())
            .await?;

        let created = Message::RoomCreated {
            room_id: room_id.clone(),
            player: player.info(),
        };
        if let Err(e) = player.connection.send(&created).await {
            tracing::warn!(
                %room_id,
                player_id = %player.id,
                error = %e,
                "failed to send RoomCreated"
            );
        }
        deliver(deliveries).await;
        drop(room);
        Ok(room_id)
    }

    pub async fn join_room(
        &self,
        room_id: &RoomId,
        player: &PlayerHandle<C>,
    ) -> Result<(), RoomError> {
        let deliveries = self.registry.join_room(room_id, player.to_player()).await?;
        deliver(deliveries).await;
        Ok(())
    }

    /// Removes a player, notifies everyone involved and destroys the room
    /// once it is empty.
    pub async fn leave_room(&self, room_id: &RoomId, player_id: PlayerId) -> Result<(), RoomError> {
        let departure = self.registry.leave_room(room_id, player_id).await?;

        let left = Message::RoomLeft {
            room_id: room_id.clone(),
            player: departure.player.info(),
        };
        if let Err(e) = departure.player.connection().send(&left).await {
            tracing::debug!(%room_id, %player_id, error = %e, "could not send RoomLeft");
        }
        deliver(departure.deliveries).await;

        if departure.room_empty {
            self.registry.destroy_room_if_empty(room_id).await;
        }
        Ok(())
    }

    /// Sends the ids of every room to `requester`.
    pub async fn list_rooms(&self, requester: &C) {
        let mut rooms = self.registry.room_ids().await;
        rooms.sort();
        let reply = Message::RoomList { rooms };
        if let Err(e) = requester.send(&reply).await {
            tracing::warn!(error = %e, "failed to send RoomList");
        }
    }
}

/// A random 128-bit room id as 32 lowercase hex characters.
fn generate_room_id() -> RoomId {
    let bytes: [u8; 16] = rand::rng().random();
    RoomId::new(bytes.iter().map(|b| format!("{b:02x}")).collect::<String>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockConnection, ScriptedDice};
    use crate::RoomConfig;

    fn coordinator() -> RoomLifecycleCoordinator<MockConnection> {
        let registry =
            RoomRegistry::with_dice(RoomConfig::default(), ScriptedDice::new([1]).factory());
        RoomLifecycleCoordinator::new(Arc::new(registry))
    }

    fn handle(id: u64) -> PlayerHandle<MockConnection> {
        PlayerHandle::new(PlayerId(id), format!("Player {id}"), Arc::new(MockConnection::new()))
    }

    #[test]
    fn test_generate_room_id_is_hex() {
        let id = generate_room_id();
        assert_eq!(id.as_str().len(), 32);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(generate_room_id(), id);
    }

    #[tokio::test]
    async fn test_create_room_joins_creator() {
        let lifecycle = coordinator();
        let alice = handle(1);

        let room_id = lifecycle.create_room(&alice).await.unwrap();

        assert_eq!(alice.connection.sent_kinds(), vec!["RoomCreated", "RoomJoined"]);
        let room = lifecycle.registry().get_room(&room_id).await.unwrap();
        assert!(room.lock().await.contains(PlayerId(1)));
    }

    #[tokio::test]
    async fn test_handle_join_reports_membership() {
        let lifecycle = coordinator();
        let alice = handle(1);
        let bob = handle(2);
        let room_id = lifecycle.create_room(&alice).await.unwrap();

        let change = lifecycle
            .handle(&bob, Message::JoinRoom { room_id: room_id.clone() })
            .await
            .unwrap();

        assert_eq!(change, Membership::Entered(room_id));
        assert_eq!(
            alice.connection.sent_kinds(),
            vec![
                "RoomCreated",
                "RoomJoined",
                "PlayerJoinedRoom",
                "GameStarted",
                "UpdateScorecard",
                "TurnStarted"
            ]
        );
        assert_eq!(
            bob.connection.sent_kinds(),
            vec!["RoomJoined", "GameStarted", "UpdateScorecard"]
        );
    }

    #[tokio::test]
    async fn test_leave_last_player_destroys_room() {
        let lifecycle = coordinator();
        let alice = handle(1);
        let room_id = lifecycle.create_room(&alice).await.unwrap();
        alice.connection.take_sent();

        let change = lifecycle
            .handle(&alice, Message::LeaveRoom { room_id: room_id.clone() })
            .await
            .unwrap();

        assert_eq!(change, Membership::Left(room_id.clone()));
        assert_eq!(alice.connection.sent_kinds(), vec!["RoomLeft"]);
        assert!(matches!(
            lifecycle.registry().get_room(&room_id).await,
            Err(RoomError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_leave_notifies_remaining_players() {
        let lifecycle = coordinator();
        let alice = handle(1);
        let bob = handle(2);
        let room_id = lifecycle.create_room(&alice).await.unwrap();
        lifecycle.join_room(&room_id, &bob).await.unwrap();
        alice.connection.take_sent();

        lifecycle.leave_room(&room_id, PlayerId(2)).await.unwrap();

        assert_eq!(alice.connection.sent_kinds(), vec!["PlayerLeftRoom", "GameOver"]);
        assert_eq!(lifecycle.registry().room_count().await, 1);
    }

    #[tokio::test]
    async fn test_join_unknown_room_fails() {
        let lifecycle = coordinator();
        let result = lifecycle
            .handle(&handle(1), Message::JoinRoom { room_id: RoomId::new("missing") })
            .await;
        assert!(matches!(result, Err(RoomError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_rooms_replies_to_requester() {
        let lifecycle = coordinator();
        let alice = handle(1);
        let room_id = lifecycle.create_room(&alice).await.unwrap();
        let bob = handle(2);

        let change = lifecycle.handle(&bob, Message::ListRooms).await.unwrap();

        assert_eq!(change, Membership::Unchanged);
        assert_eq!(bob.connection.sent(), vec![Message::RoomList { rooms: vec![room_id] }]);
    }
}
