//! Room registry: creates, tracks and destroys rooms.
//!
//! The registry map sits behind one `RwLock` and each room behind its own
//! `Mutex`. Locks are always taken registry first, then room, so two
//! operations on different rooms never wait on each other once the room
//! has been looked up.

use std::collections::HashMap;
use std::sync::Arc;

use dicehall_protocol::{PlayerId, RoomId};
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use crate::connection::{Delivery, PlayerConnection};
use crate::dice::{DiceFactory, random_dice};
use crate::player::Player;
use crate::room::{Room, RoomInfo};
use crate::{RoomConfig, RoomError};

/// A room shared between the registry and the coordinators.
pub type SharedRoom<C> = Arc<Mutex<Room<C>>>;

/// Result of a player leaving a room.
pub struct Departure<C> {
    /// The removed player, still holding their connection.
    pub player: Player<C>,
    /// Notices for the players who remain.
    pub deliveries: Vec<Delivery<C>>,
    /// Whether the room has no players left.
    pub room_empty: bool,
}

/// A room that has just been created with its first player seated.
///
/// The room stays locked until this is dropped, so no one else can join
/// before the creator's notices have gone out.
pub struct Founding<C> {
    pub room: OwnedMutexGuard<Room<C>>,
    /// Notices for the creator.
    pub deliveries: Vec<Delivery<C>>,
}

/// Every live room, keyed by id.
pub struct RoomRegistry<C> {
    rooms: RwLock<HashMap<RoomId, SharedRoom<C>>>,
    config: RoomConfig,
    dice: DiceFactory,
}

impl<C: PlayerConnection> RoomRegistry<C> {
    /// Creates an empty registry whose rooms roll real dice.
    pub fn new(config: RoomConfig) -> Self {
        Self::with_dice(config, random_dice())
    }

    /// Creates an empty registry that builds each room's dice source from
    /// `dice`.
    pub fn with_dice(config: RoomConfig, dice: DiceFactory) -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            config,
            dice,
        }
    }

    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    /// Creates an empty room under `room_id`.
    pub async fn create_room(&self, room_id: RoomId) -> Result<SharedRoom<C>, RoomError> {
        let mut rooms = self.rooms.write().await;
        if rooms.contains_key(&room_id) {
            return Err(RoomError::DuplicateRoom(room_id));
        }
        let room = Room::new(room_id.clone(), self.config.clone(), (self.dice)());
        let shared = Arc::new(Mutex::new(room));
        rooms.insert(room_id.clone(), Arc::clone(&shared));
        tracing::info!(%room_id, rooms = rooms.len(), "room created");
        Ok(shared)
    }

    /// Creates a room under `room_id` with `creator` already in it.
    ///
    /// The creator is seated before the room becomes visible, so they
    /// always hold the first turn slot.
    pub async fn found_room(
        &self,
        room_id: RoomId,
        creator: Player<C>,
    ) -> Result<Founding<C>, RoomError> {
        let mut rooms = self.rooms.write().await;
        if rooms.contains_key(&room_id) {
            return Err(RoomError::DuplicateRoom(room_id));
        }
        let mut room = Room::new(room_id.clone(), self.config.clone(), (self.dice)());
        let outbox = room.add_player(creator)?;
        let deliveries = room.address(outbox);

        let shared = Arc::new(Mutex::new(room));
        let guard = Arc::clone(&shared).lock_owned().await;
        rooms.insert(room_id.clone(), shared);
        tracing::info!(%room_id, rooms = rooms.len(), "room created");
        Ok(Founding {
            room: guard,
            deliveries,
        })
    }

    pub async fn get_room(&self, room_id: &RoomId) -> Result<SharedRoom<C>, RoomError> {
        self.rooms
            .read()
            .await
            .get(room_id)
            .cloned()
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))
    }

    /// Adds `player` to a room and resolves the resulting notices.
    pub async fn join_room(
        &self,
        room_id: &RoomId,
        player: Player<C>,
    ) -> Result<Vec<Delivery<C>>, RoomError> {
        let room = self.get_room(room_id).await?;
        let mut room = room.lock().await;
        let outbox = room.add_player(player)?;
        Ok(room.address(outbox))
    }

    /// Removes a player from a room.
    ///
    /// The room is left in place even if it is now empty; the caller
    /// decides whether to destroy it.
    pub async fn leave_room(
        &self,
        room_id: &RoomId,
        player_id: PlayerId,
    ) -> Result<Departure<C>, RoomError> {
        let room = self.get_room(room_id).await?;
        let mut room = room.lock().await;
        let (player, outbox) = room.remove_player(player_id)?;
        Ok(Departure {
            player,
            deliveries: room.address(outbox),
            room_empty: room.is_empty(),
        })
    }

    /// Removes a room unconditionally. Returns `false` if it didn't exist.
    pub async fn destroy_room(&self, room_id: &RoomId) -> bool {
        let mut rooms = self.rooms.write().await;
        let Some(room) = rooms.remove(room_id) else {
            return false;
        };
        room.lock().await.close();
        tracing::info!(%room_id, rooms = rooms.len(), "room destroyed");
        true
    }

    /// Removes a room only if it still has no players.
    ///
    /// Emptiness is re-checked under both locks, so a join that slipped in
    /// after the last leave keeps the room alive.
    pub async fn destroy_room_if_empty(&self, room_id: &RoomId) -> bool {
        let mut rooms = self.rooms.write().await;
        let Some(room) = rooms.get(room_id).cloned() else {
            return false;
        };
        let mut room = room.lock().await;
        if !room.is_empty() {
            return false;
        }
        room.close();
        rooms.remove(room_id);
        tracing::info!(%room_id, rooms = rooms.len(), "empty room destroyed");
        true
    }

    /// Summaries of every room.
    pub async fn list_rooms(&self) -> Vec<RoomInfo> {
        let rooms: Vec<SharedRoom<C>> = self.rooms.read().await.values().cloned().collect();
        let mut infos = Vec::with_capacity(rooms.len());
        for room in rooms {
            infos.push(room.lock().await.info());
        }
        infos
    }

    pub async fn room_ids(&self) -> Vec<RoomId> {
        self.rooms.read().await.keys().cloned().collect()
    }

    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }
}
