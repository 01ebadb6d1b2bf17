//! The per-room game state machine.
//!
//! A [`Room`] holds its players, the shared dice and the turn bookkeeping.
//! Every transition is synchronous and returns an [`Outbox`] of addressed
//! messages instead of sending anything itself. The caller resolves the
//! outbox to connections with [`Room::address`] while it still holds the
//! room lock, releases the lock, then delivers.

use std::sync::Arc;

use dicehall_protocol::{Dice, Message, PlayerId, PlayerInfo, Recipient, RoomId, ScoreCategory};

use crate::connection::Delivery;
use crate::dice::{self, DiceSource};
use crate::player::Player;
use crate::score::score;
use crate::{GameError, RoomConfig, RoomError, RoomState};

/// Messages produced by a transition, in send order.
pub type Outbox = Vec<(Recipient, Message)>;

/// What a call to [`Room::start_turn`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The player's turn began.
    Started(PlayerId),
    /// The caller isn't the current player. Only the scorecard broadcast
    /// went out.
    NotCurrentPlayer,
    /// The current player's turn is already underway.
    InProgress,
    /// Every turn has been played and the game is over.
    GameEnded,
}

/// A turn outcome plus the messages it produced.
#[derive(Debug)]
pub struct TurnStep {
    pub outcome: TurnOutcome,
    pub outbox: Outbox,
}

/// Summary of a room for listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomInfo {
    pub room_id: RoomId,
    pub state: RoomState,
    pub player_count: usize,
    pub max_players: usize,
}

pub struct Room<C> {
    id: RoomId,
    config: RoomConfig,
    state: RoomState,
    players: Vec<Player<C>>,
    dice: Dice,
    /// Turns started so far, across all players.
    game_turn_num: u32,
    /// Index into `players`. Valid whenever `players` is non-empty.
    current_player: usize,
    /// Rolls taken in the current turn.
    dice_rolls: u8,
    turn_in_progress: bool,
    dice_source: Box<dyn DiceSource>,
    closed: bool,
}

impl<C> Room<C> {
    pub fn new(id: RoomId, config: RoomConfig, dice_source: Box<dyn DiceSource>) -> Self {
        Self {
            id,
            config,
            state: RoomState::Waiting,
            players: Vec::new(),
            dice: Dice::default(),
            game_turn_num: 0,
            current_player: 0,
            dice_rolls: 0,
            turn_in_progress: false,
            dice_source,
            closed: false,
        }
    }

    // -- Accessors ---------------------------------------------------------

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    pub fn state(&self) -> RoomState {
        self.state
    }

    pub fn is_game_started(&self) -> bool {
        self.state.is_active()
    }

    pub fn players(&self) -> &[Player<C>] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player<C>> {
        self.players.iter().find(|p| p.id() == id)
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.player(id).is_some()
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn dice(&self) -> &Dice {
        &self.dice
    }

    pub fn dice_rolls(&self) -> u8 {
        self.dice_rolls
    }

    pub fn game_turn_num(&self) -> u32 {
        self.game_turn_num
    }

    pub fn current_player_index(&self) -> usize {
        self.current_player
    }

    pub fn current_player(&self) -> Option<&Player<C>> {
        self.players.get(self.current_player)
    }

    pub fn turn_in_progress(&self) -> bool {
        self.turn_in_progress
    }

    /// Returns `true` once the registry has removed this room.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub(crate) fn close(&mut self) {
        self.closed = true;
    }

    /// Snapshots of every player, in join order.
    pub fn player_infos(&self) -> Vec<PlayerInfo> {
        self.players.iter().map(Player::info).collect()
    }

    pub fn info(&self) -> RoomInfo {
        RoomInfo {
            room_id: self.id.clone(),
            state: self.state,
            player_count: self.players.len(),
            max_players: self.config.max_players,
        }
    }

    /// Resolves each outbox entry to the connections it addresses.
    pub fn address(&self, outbox: Outbox) -> Vec<Delivery<C>> {
        let mut deliveries = Vec::new();
        for (recipient, message) in outbox {
            for player in self.players.iter().filter(|p| recipient.includes(p.id())) {
                deliveries.push(Delivery {
                    player_id: player.id(),
                    connection: Arc::clone(player.connection()),
                    message: message.clone(),
                });
            }
        }
        deliveries
    }

    // -- Membership --------------------------------------------------------

    /// Adds a player to a waiting room.
    ///
    /// The joiner gets `RoomJoined`, everyone else `PlayerJoinedRoom`. If
    /// the join brings the room up to `min_players`, the game starts and
    /// its opening messages follow.
    pub fn add_player(&mut self, player: Player<C>) -> Result<Outbox, RoomError> {
        if self.closed {
            return Err(RoomError::NotFound(self.id.clone()));
        }
        if !self.state.is_joinable() {
            return Err(RoomError::InvalidState(format!(
                "cannot join room {} while {}",
                self.id, self.state
            )));
        }
        if self.contains(player.id()) {
            return Err(RoomError::AlreadyInRoom(player.id(), self.id.clone()));
        }
        if self.players.len() >= self.config.max_players {
            return Err(RoomError::RoomFull(self.id.clone()));
        }

        let id = player.id();
        let info = player.info();
        self.players.push(player);
        tracing::info!(
            room_id = %self.id,
            player_id = %id,
            players = self.players.len(),
            "player joined room"
        );

        let mut outbox = vec![
            (
                Recipient::Player(id),
                Message::RoomJoined {
                    room_id: self.id.clone(),
                    player: info.clone(),
                },
            ),
            (
                Recipient::AllExcept(id),
                Message::PlayerJoinedRoom {
                    room_id: self.id.clone(),
                    player: info,
                },
            ),
        ];

        if self.players.len() >= self.config.min_players {
            outbox.extend(self.start_game()?);
        }
        Ok(outbox)
    }

    /// Removes a player.
    ///
    /// Remaining members get `PlayerLeftRoom`. In a running game the turn
    /// cursor stays on the same player where possible and, if the current
    /// player left, the next player's turn starts. A multiplayer game with
    /// a single player left ends.
    pub fn remove_player(&mut self, id: PlayerId) -> Result<(Player<C>, Outbox), RoomError> {
        let index = self
            .players
            .iter()
            .position(|p| p.id() == id)
            .ok_or_else(|| RoomError::NotInRoom(id, self.id.clone()))?;

        let player = self.players.remove(index);
        tracing::info!(
            room_id = %self.id,
            player_id = %id,
            players = self.players.len(),
            "player left room"
        );

        let mut outbox = vec![(
            Recipient::All,
            Message::PlayerLeftRoom {
                room_id: self.id.clone(),
                player: player.info(),
            },
        )];

        if self.players.is_empty() {
            self.current_player = 0;
            self.turn_in_progress = false;
            if self.state.is_active() {
                self.transition(RoomState::Finished);
            }
            return Ok((player, outbox));
        }

        if self.state.is_active() {
            if self.players.len() < self.config.min_players.min(2) {
                outbox.extend(self.finish());
            } else if index < self.current_player {
                self.current_player -= 1;
            } else if index == self.current_player {
                self.current_player %= self.players.len();
                self.turn_in_progress = false;
                let next = self.players[self.current_player].id();
                if let Ok(step) = self.start_turn(next) {
                    outbox.extend(step.outbox);
                }
            }
        }

        if self.current_player >= self.players.len() {
            self.current_player = 0;
        }
        Ok((player, outbox))
    }

    // -- Game flow ---------------------------------------------------------

    /// Starts the game: `GameStarted` to everyone, then the first turn.
    pub fn start_game(&mut self) -> Result<Outbox, RoomError> {
        if self.state != RoomState::Waiting {
            return Err(RoomError::InvalidState(format!(
                "game in room {} already started",
                self.id
            )));
        }
        if self.players.len() < self.config.min_players {
            return Err(RoomError::InvalidState(format!(
                "need at least {} players to start",
                self.config.min_players
            )));
        }

        self.transition(RoomState::Active);
        self.current_player = if self.config.random_start {
            self.dice_source.pick_index(self.players.len())
        } else {
            0
        };
        self.game_turn_num = 0;
        self.dice_rolls = 0;
        self.dice = Dice::default();
        tracing::info!(room_id = %self.id, players = self.players.len(), "game started");

        let mut outbox = vec![(
            Recipient::All,
            Message::GameStarted {
                room_id: self.id.clone(),
            },
        )];
        let first = self.players[self.current_player].id();
        if let Ok(step) = self.start_turn(first) {
            outbox.extend(step.outbox);
        }
        Ok(outbox)
    }

    /// Attempts to begin `actor`'s turn.
    ///
    /// Always broadcasts every scorecard first. Then, if all turns have
    /// been played, the game ends. Otherwise the turn begins only if
    /// `actor` is the current player and their turn isn't already open.
    pub fn start_turn(&mut self, actor: PlayerId) -> Result<TurnStep, GameError> {
        self.ensure_active()?;

        let mut outbox = vec![(
            Recipient::All,
            Message::UpdateScorecard {
                room_id: self.id.clone(),
                players: self.player_infos(),
            },
        )];

        if self.game_turn_num >= self.config.total_turns(self.players.len()) {
            outbox.extend(self.finish());
            return Ok(TurnStep {
                outcome: TurnOutcome::GameEnded,
                outbox,
            });
        }

        let Some(current) = self.current_player() else {
            return Ok(TurnStep {
                outcome: TurnOutcome::NotCurrentPlayer,
                outbox,
            });
        };
        if current.id() != actor {
            return Ok(TurnStep {
                outcome: TurnOutcome::NotCurrentPlayer,
                outbox,
            });
        }
        if self.turn_in_progress {
            return Ok(TurnStep {
                outcome: TurnOutcome::InProgress,
                outbox,
            });
        }

        let info = current.info();
        self.game_turn_num += 1;
        self.dice_rolls = 0;
        self.turn_in_progress = true;
        dice::release_all(&mut self.dice);
        tracing::debug!(
            room_id = %self.id,
            player_id = %actor,
            turn = self.game_turn_num,
            "turn started"
        );

        outbox.push((
            Recipient::Player(actor),
            Message::TurnStarted {
                room_id: self.id.clone(),
                player: info,
            },
        ));
        Ok(TurnStep {
            outcome: TurnOutcome::Started(actor),
            outbox,
        })
    }

    /// Rolls every unheld die for the current player.
    pub fn roll_dice(&mut self, actor: PlayerId) -> Result<Outbox, GameError> {
        self.ensure_current(actor)?;
        if self.dice_rolls >= self.config.max_rolls {
            return Err(GameError::RollLimitReached(self.config.max_rolls));
        }

        self.dice_rolls += 1;
        dice::roll_unheld(&mut self.dice, self.dice_source.as_mut());
        tracing::debug!(
            room_id = %self.id,
            player_id = %actor,
            roll = self.dice_rolls,
            "dice rolled"
        );

        let player = self.player_info(actor);
        Ok(vec![(
            Recipient::All,
            Message::DiceRolled {
                room_id: self.id.clone(),
                player,
                dice: self.dice,
                dice_rolls: self.dice_rolls,
            },
        )])
    }

    /// Applies the held flags from `hint`, then rolls the rest.
    pub fn reroll_dice(&mut self, actor: PlayerId, hint: &Dice) -> Result<Outbox, GameError> {
        self.ensure_current(actor)?;
        if self.dice_rolls >= self.config.max_rolls {
            return Err(GameError::RollLimitReached(self.config.max_rolls));
        }
        dice::apply_holds(&mut self.dice, hint);
        self.roll_dice(actor)
    }

    /// Scores the current dice into `category` and passes the turn.
    pub fn choose_category(
        &mut self,
        actor: PlayerId,
        category: ScoreCategory,
    ) -> Result<TurnStep, GameError> {
        self.ensure_current(actor)?;
        if self.dice_rolls == 0 {
            return Err(GameError::NoDiceRolled);
        }

        let points = score(&self.dice, category);
        let index = self.current_player;
        if !self.players[index].scorecard_mut().record(category, points) {
            return Err(GameError::CategoryFilled(category));
        }
        tracing::info!(
            room_id = %self.id,
            player_id = %actor,
            %category,
            points,
            "category scored"
        );

        self.turn_in_progress = false;
        self.current_player = (index + 1) % self.players.len();
        let next = self.players[self.current_player].id();
        self.start_turn(next)
    }

    // -- Internals ---------------------------------------------------------

    /// Ends the game. Fires at most once per room.
    fn finish(&mut self) -> Outbox {
        if !self.state.is_active() {
            return Vec::new();
        }
        self.transition(RoomState::Finished);
        self.turn_in_progress = false;
        tracing::info!(room_id = %self.id, turns = self.game_turn_num, "game over");
        vec![(
            Recipient::All,
            Message::GameOver {
                room_id: self.id.clone(),
                players: self.player_infos(),
            },
        )]
    }

    fn transition(&mut self, target: RoomState) {
        if self.state.can_transition_to(target) {
            tracing::debug!(
                room_id = %self.id,
                from = %self.state,
                to = %target,
                "room state change"
            );
            self.state = target;
        } else {
            tracing::warn!(
                room_id = %self.id,
                from = %self.state,
                to = %target,
                "invalid room state change"
            );
        }
    }

    fn ensure_active(&self) -> Result<(), GameError> {
        if self.state.is_active() {
            Ok(())
        } else {
            Err(GameError::NotActive(self.state))
        }
    }

    fn ensure_current(&self, actor: PlayerId) -> Result<(), GameError> {
        self.ensure_active()?;
        match self.current_player() {
            Some(current) if current.id() == actor => Ok(()),
            _ => Err(GameError::NotCurrentPlayer(actor)),
        }
    }

    fn player_info(&self, id: PlayerId) -> PlayerInfo {
        match self.player(id) {
            Some(player) => player.info(),
            None => PlayerInfo {
                id,
                name: String::new(),
                scorecard: Default::default(),
            },
        }
    }
}
