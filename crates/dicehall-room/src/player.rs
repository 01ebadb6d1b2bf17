//! Players and their per-connection identity.

use std::sync::Arc;

use dicehall_protocol::{PlayerId, PlayerInfo, Scorecard};

/// The identity a connection is given when it is accepted.
///
/// Cheap to clone. Each room a player enters gets its own [`Player`]
/// built from this handle, with a fresh scorecard.
pub struct PlayerHandle<C> {
    pub id: PlayerId,
    pub name: String,
    pub connection: Arc<C>,
}

impl<C> PlayerHandle<C> {
    pub fn new(id: PlayerId, name: impl Into<String>, connection: Arc<C>) -> Self {
        Self {
            id,
            name: name.into(),
            connection,
        }
    }

    /// A room member for this identity with an empty scorecard.
    pub fn to_player(&self) -> Player<C> {
        Player {
            id: self.id,
            name: self.name.clone(),
            scorecard: Scorecard::new(),
            connection: Arc::clone(&self.connection),
        }
    }

    /// Snapshot with an empty scorecard, for the server greeting.
    pub fn info(&self) -> PlayerInfo {
        PlayerInfo {
            id: self.id,
            name: self.name.clone(),
            scorecard: Scorecard::new(),
        }
    }
}

impl<C> Clone for PlayerHandle<C> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            name: self.name.clone(),
            connection: Arc::clone(&self.connection),
        }
    }
}

/// A member of one room.
pub struct Player<C> {
    id: PlayerId,
    name: String,
    scorecard: Scorecard,
    connection: Arc<C>,
}

impl<C> Player<C> {
    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scorecard(&self) -> &Scorecard {
        &self.scorecard
    }

    pub(crate) fn scorecard_mut(&mut self) -> &mut Scorecard {
        &mut self.scorecard
    }

    pub fn connection(&self) -> &Arc<C> {
        &self.connection
    }

    /// A detached snapshot for outbound messages.
    pub fn info(&self) -> PlayerInfo {
        PlayerInfo {
            id: self.id,
            name: self.name.clone(),
            scorecard: self.scorecard.clone(),
        }
    }
}
