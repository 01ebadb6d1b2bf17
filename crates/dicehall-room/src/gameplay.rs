//! Gameplay requests: turns, rolls and scoring.

use std::sync::Arc;

use dicehall_protocol::{Dice, Message, PlayerId, RoomId, ScoreCategory};

use crate::connection::{PlayerConnection, deliver};
use crate::registry::RoomRegistry;
use crate::room::{Outbox, Room};
use crate::{GameError, RoomError};

/// Applies gameplay requests to rooms and broadcasts the results.
///
/// Illegal actions (wrong player, roll cap reached, filled category and
/// so on) are logged and dropped. The sender gets no reply.
pub struct GameplayCoordinator<C> {
    registry: Arc<RoomRegistry<C>>,
}

impl<C: PlayerConnection> GameplayCoordinator<C> {
    pub fn new(registry: Arc<RoomRegistry<C>>) -> Self {
        Self { registry }
    }

    /// Dispatches one gameplay request from `actor`.
    pub async fn handle(&self, actor: PlayerId, message: Message) -> Result<(), RoomError> {
        match message {
            Message::StartTurn { room_id } => self.start_turn(&room_id, actor).await,
            Message::RollDice { room_id } => self.roll_dice(&room_id, actor).await,
            Message::RerollDice { room_id, dice } => {
                self.reroll_dice(&room_id, actor, &dice).await
            }
            Message::ChooseCategory { room_id, category } => {
                self.choose_category(&room_id, actor, category).await
            }
            other => {
                tracing::debug!(kind = other.kind(), "not a gameplay request");
                Ok(())
            }
        }
    }

    pub async fn start_turn(&self, room_id: &RoomId, actor: PlayerId) -> Result<(), RoomError> {
        self.apply(room_id, actor, "start_turn", |room| {
            room.start_turn(actor).map(|step| step.outbox)
        })
        .await
    }

    pub async fn roll_dice(&self, room_id: &RoomId, actor: PlayerId) -> Result<(), RoomError> {
        self.apply(room_id, actor, "roll_dice", |room| room.roll_dice(actor))
            .await
    }

    pub async fn reroll_dice(
        &self,
        room_id: &RoomId,
        actor: PlayerId,
        hint: &Dice,
    ) -> Result<(), RoomError> {
        self.apply(room_id, actor, "reroll_dice", |room| {
            room.reroll_dice(actor, hint)
        })
        .await
    }

    pub async fn choose_category(
        &self,
        room_id: &RoomId,
        actor: PlayerId,
        category: ScoreCategory,
    ) -> Result<(), RoomError> {
        self.apply(room_id, actor, "choose_category", |room| {
            room.choose_category(actor, category).map(|step| step.outbox)
        })
        .await
    }

    /// Runs `action` under the room lock, then delivers its outbox after
    /// the lock is released.
    async fn apply<F>(
        &self,
        room_id: &RoomId,
        actor: PlayerId,
        action: &'static str,
        f: F,
    ) -> Result<(), RoomError>
    where
        F: FnOnce(&mut Room<C>) -> Result<Outbox, GameError> + Send,
    {
        let room = self.registry.get_room(room_id).await?;
        let deliveries = {
            let mut room = room.lock().await;
            if !room.contains(actor) {
                return Err(RoomError::NotInRoom(actor, room_id.clone()));
            }
            match f(&mut *room) {
                Ok(outbox) => room.address(outbox),
                Err(reason) => {
                    tracing::debug!(
                        %room_id,
                        player_id = %actor,
                        action,
                        %reason,
                        "action ignored"
                    );
                    return Ok(());
                }
            }
        };
        deliver(deliveries).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::RoomLifecycleCoordinator;
    use crate::player::PlayerHandle;
    use crate::testing::{MockConnection, ScriptedDice};
    use crate::RoomConfig;

    struct Table {
        gameplay: GameplayCoordinator<MockConnection>,
        room_id: RoomId,
        alice: PlayerHandle<MockConnection>,
        bob: PlayerHandle<MockConnection>,
    }

    async fn table(faces: &[u8]) -> Table {
        let registry = Arc::new(RoomRegistry::with_dice(
            RoomConfig::default(),
            ScriptedDice::new(faces.iter().copied()).factory(),
        ));
        let lifecycle = RoomLifecycleCoordinator::new(Arc::clone(&registry));
        let alice = PlayerHandle::new(PlayerId(1), "Player 1", Arc::new(MockConnection::new()));
        let bob = PlayerHandle::new(PlayerId(2), "Player 2", Arc::new(MockConnection::new()));
        let room_id = lifecycle.create_room(&alice).await.unwrap();
        lifecycle.join_room(&room_id, &bob).await.unwrap();
        alice.connection.take_sent();
        bob.connection.take_sent();
        Table {
            gameplay: GameplayCoordinator::new(registry),
            room_id,
            alice,
            bob,
        }
    }

    #[tokio::test]
    async fn test_roll_dice_broadcasts_to_room() {
        let t = table(&[3, 3, 5, 5, 5]).await;
        t.gameplay
            .handle(PlayerId(1), Message::RollDice { room_id: t.room_id.clone() })
            .await
            .unwrap();

        assert_eq!(t.alice.connection.sent_kinds(), vec!["DiceRolled"]);
        assert_eq!(t.bob.connection.sent_kinds(), vec!["DiceRolled"]);
    }

    #[tokio::test]
    async fn test_illegal_action_is_silent() {
        let t = table(&[2]).await;
        t.gameplay.roll_dice(&t.room_id, PlayerId(2)).await.unwrap();
        t.gameplay
            .choose_category(&t.room_id, PlayerId(1), ScoreCategory::Chance)
            .await
            .unwrap();

        assert!(t.alice.connection.sent().is_empty());
        assert!(t.bob.connection.sent().is_empty());
    }

    #[tokio::test]
    async fn test_choose_category_passes_turn() {
        let t = table(&[2]).await;
        t.gameplay.roll_dice(&t.room_id, PlayerId(1)).await.unwrap();
        t.gameplay
            .choose_category(&t.room_id, PlayerId(1), ScoreCategory::Twos)
            .await
            .unwrap();

        assert_eq!(t.alice.connection.sent_kinds(), vec!["DiceRolled", "UpdateScorecard"]);
        assert_eq!(
            t.bob.connection.sent_kinds(),
            vec!["DiceRolled", "UpdateScorecard", "TurnStarted"]
        );
    }

    #[tokio::test]
    async fn test_start_turn_resends_scorecards() {
        let t = table(&[2]).await;
        t.gameplay.start_turn(&t.room_id, PlayerId(2)).await.unwrap();
        assert_eq!(t.alice.connection.sent_kinds(), vec!["UpdateScorecard"]);
        assert_eq!(t.bob.connection.sent_kinds(), vec!["UpdateScorecard"]);
    }

    #[tokio::test]
    async fn test_outsider_cannot_act() {
        let t = table(&[2]).await;
        let result = t.gameplay.start_turn(&t.room_id, PlayerId(9)).await;
        assert!(matches!(result, Err(RoomError::NotInRoom(..))));
        assert!(t.alice.connection.sent().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_room() {
        let t = table(&[2]).await;
        let result = t.gameplay.roll_dice(&RoomId::new("gone"), PlayerId(1)).await;
        assert!(matches!(result, Err(RoomError::NotFound(_))));
    }
}
