//! The room model: membership, host privilege and the game lifecycle.
//!
//! A [`Room`] is plain synchronous state. It is owned by exactly one room
//! actor task, which is what serializes access to it; nothing here knows
//! about channels or connections.

use rand::Rng;

use crate::{Card, Color, DrawOutcome, Game, GameConfig, Phase, PlayOutcome, Player, PlayerId, Profile, Rejection, RoomCode};

/// A running game ends early once fewer than this many players remain.
const MIN_ACTIVE_PLAYERS: usize = 2;

/// Something a room member asks the room to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    UpdateProfile(Profile),
    StartGame,
    RestartGame,
    PlayCard {
        hand_index: usize,
        chosen_color: Option<Color>,
    },
    DrawCard,
}

/// What an accepted action changed, so the caller knows what to broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// Lobby-visible state changed.
    Lobby,
    /// Game state changed; every member needs a fresh projection.
    Game,
    /// A hand was emptied. The game is gone and the room is back in the
    /// lobby.
    Won { winner: PlayerId, name: String },
    /// Accepted, but nothing observable happened.
    Unchanged,
}

/// The result of a member leaving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Departure {
    /// Members left in the room. Zero means the room should be destroyed.
    pub remaining: usize,
    /// Set when the host left and someone else inherited the role.
    pub new_host: Option<PlayerId>,
    /// Set when the departure ended a running game.
    pub game_abandoned: bool,
}

/// One room and, while started, its game.
#[derive(Debug, Clone)]
pub struct Room {
    code: RoomCode,
    players: Vec<Player>,
    game: Option<Game>,
    config: GameConfig,
}

impl Room {
    /// Creates a room whose only member is its host.
    pub fn new(code: RoomCode, host: PlayerId, profile: Profile, config: GameConfig) -> Self {
        Self {
            code,
            players: vec![Player::from_profile(host, profile, true)],
            game: None,
            config,
        }
    }

    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    /// Members in turn order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.player(id).is_some()
    }

    pub fn host(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.is_host)
    }

    pub fn game(&self) -> Option<&Game> {
        self.game.as_ref()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn phase(&self) -> Phase {
        if self.game.is_some() {
            Phase::Playing
        } else {
            Phase::Lobby
        }
    }

    fn seat_ids(&self) -> Vec<PlayerId> {
        self.players.iter().map(|p| p.id).collect()
    }

    // -- Membership -------------------------------------------------------

    /// Adds `id` to the room, or refreshes its profile if already present.
    ///
    /// A rejoin keeps the member's seat and host flag.
    pub fn join(&mut self, id: PlayerId, profile: Profile) -> Result<(), Rejection> {
        if !self.phase().is_joinable() {
            return Err(Rejection::AlreadyStarted);
        }
        if let Some(existing) = self.players.iter_mut().find(|p| p.id == id) {
            let refreshed = Player::from_profile(id, profile, existing.is_host);
            existing.name = refreshed.name;
            existing.avatar = refreshed.avatar;
            return Ok(());
        }
        if self.players.len() >= self.config.max_players {
            return Err(Rejection::RoomFull(self.config.max_players));
        }
        self.players.push(Player::from_profile(id, profile, false));
        Ok(())
    }

    /// Removes `id` from the room.
    ///
    /// The host role passes to the first remaining member. Mid-game, the
    /// leaver's cards go back under the draw pile, or the game is dropped
    /// if too few players remain to continue it.
    pub fn leave(&mut self, id: PlayerId) -> Result<Departure, Rejection> {
        let seat = self
            .players
            .iter()
            .position(|p| p.id == id)
            .ok_or(Rejection::NotInRoom(id))?;
        let seats = self.seat_ids();
        let removed = self.players.remove(seat);

        let mut new_host = None;
        if removed.is_host {
            if let Some(first) = self.players.first_mut() {
                first.is_host = true;
                new_host = Some(first.id);
            }
        }

        let mut game_abandoned = false;
        if self.players.len() < MIN_ACTIVE_PLAYERS {
            game_abandoned = self.game.take().is_some();
        } else if let Some(game) = self.game.as_mut() {
            game.remove_seat(&seats, seat);
        }
        if game_abandoned {
            tracing::info!(room = %self.code, "game abandoned, too few players");
        }

        Ok(Departure {
            remaining: self.players.len(),
            new_host,
            game_abandoned,
        })
    }

    // -- Actions ----------------------------------------------------------

    /// Validates and applies `action` on behalf of `player`.
    pub fn apply<R: Rng + ?Sized>(
        &mut self,
        player: PlayerId,
        action: Action,
        rng: &mut R,
    ) -> Result<Applied, Rejection> {
        if !self.contains(player) {
            return Err(Rejection::NotInRoom(player));
        }
        match action {
            Action::UpdateProfile(profile) => Ok(self.update_profile(player, profile)),
            Action::StartGame => {
                self.check_can_deal(player, "start the game", true)?;
                let game = Game::deal(&self.seat_ids(), &self.config, rng)?;
                Ok(self.begin(game))
            }
            Action::RestartGame => {
                self.check_can_deal(player, "restart the game", self.config.restart_requires_host)?;
                let game = Game::deal(&self.seat_ids(), &self.config, rng)?;
                Ok(self.begin(game))
            }
            Action::PlayCard {
                hand_index,
                chosen_color,
            } => self.play_card(player, hand_index, chosen_color),
            Action::DrawCard => self.draw_card(player),
        }
    }

    /// Starts a game dealt from `deck` as given (end of the vector is the
    /// top) instead of a shuffled one. Same checks as a normal start.
    pub fn start_with_deck(
        &mut self,
        requester: PlayerId,
        deck: Vec<Card>,
    ) -> Result<Applied, Rejection> {
        if !self.contains(requester) {
            return Err(Rejection::NotInRoom(requester));
        }
        self.check_can_deal(requester, "start the game", true)?;
        let game = Game::from_deck(&self.seat_ids(), &self.config, deck)?;
        Ok(self.begin(game))
    }

    fn update_profile(&mut self, id: PlayerId, profile: Profile) -> Applied {
        if let Some(player) = self.players.iter_mut().find(|p| p.id == id) {
            player.apply_profile(profile);
        }
        match self.phase() {
            Phase::Playing => Applied::Game,
            _ => Applied::Lobby,
        }
    }

    fn check_can_deal(
        &self,
        requester: PlayerId,
        what: &'static str,
        host_only: bool,
    ) -> Result<(), Rejection> {
        if self.phase().is_active() {
            return Err(Rejection::AlreadyStarted);
        }
        let is_host = self.player(requester).is_some_and(|p| p.is_host);
        if host_only && !is_host {
            return Err(Rejection::NotHost(what));
        }
        if self.players.len() < self.config.min_players {
            return Err(Rejection::NotEnoughPlayers {
                needed: self.config.min_players,
                have: self.players.len(),
            });
        }
        Ok(())
    }

    fn begin(&mut self, game: Game) -> Applied {
        tracing::info!(
            room = %self.code,
            players = self.players.len(),
            top = %game.top_card(),
            "game started"
        );
        self.game = Some(game);
        Applied::Game
    }

    fn play_card(
        &mut self,
        player: PlayerId,
        hand_index: usize,
        chosen_color: Option<Color>,
    ) -> Result<Applied, Rejection> {
        let seats = self.seat_ids();
        let game = self.game.as_mut().ok_or(Rejection::NotStarted)?;
        match game.play_card(&seats, player, hand_index, chosen_color)? {
            PlayOutcome::Continued => Ok(Applied::Game),
            PlayOutcome::Won { winner } => {
                self.game = None;
                let name = self
                    .player(winner)
                    .map(|p| p.name.clone())
                    .unwrap_or_default();
                tracing::info!(room = %self.code, %winner, "game won");
                Ok(Applied::Won { winner, name })
            }
        }
    }

    fn draw_card(&mut self, player: PlayerId) -> Result<Applied, Rejection> {
        let seats = self.seat_ids();
        let game = self.game.as_mut().ok_or(Rejection::NotStarted)?;
        match game.draw_card(&seats, player)? {
            DrawOutcome::Drew { .. } => Ok(Applied::Game),
            DrawOutcome::PileEmpty => Ok(Applied::Unchanged),
        }
    }
}
